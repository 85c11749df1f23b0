//! Moving network locations out of the default database.
//!
//! Older deployments stored their network locations in the general-purpose
//! default database. They now live in a dedicated database, so on upgrade the
//! existing rows are copied over in one batch and the old table is dropped.
//! A default database that never had the table (a fresh install), or whose
//! table was already dropped by an earlier run, is left alone.
use tracing::{debug, info};

use crate::{
    Result, StoreError,
    location::{Entity, LocationRecord},
    store::{RecordStore, SchemaAdmin},
};

/// Whether the locations still need to be moved out of the default database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    /// The location table still exists in the default database
    Pending,
    /// The location table is absent from the default database
    Done,
}

/// Report whether a location table still exists in the database administered
/// by `admin`
pub async fn migration_state(admin: &dyn SchemaAdmin) -> Result<MigrationState> {
    match admin.table_exists(LocationRecord::table_name()).await? {
        true => Ok(MigrationState::Pending),
        false => Ok(MigrationState::Done),
    }
}

/// The number of records still waiting in `source` to be moved
pub async fn pending_count(source: &dyn RecordStore, admin: &dyn SchemaAdmin) -> Result<usize> {
    if migration_state(admin).await? == MigrationState::Done {
        return Ok(0);
    }
    match source.count().await {
        Err(StoreError::TableNotFound(_)) => Ok(0),
        res => Ok(res?),
    }
}

/// Moves every [LocationRecord] from the default database into the network
/// location database.
pub struct LocationMigrator<'a> {
    source: &'a dyn RecordStore,
    source_admin: &'a dyn SchemaAdmin,
    target: &'a dyn RecordStore,
}

impl<'a> LocationMigrator<'a> {
    /// `source` and `source_admin` must both refer to the default database,
    /// `target` to the network location database.
    pub fn new(
        source: &'a dyn RecordStore,
        source_admin: &'a dyn SchemaAdmin,
        target: &'a dyn RecordStore,
    ) -> Self {
        Self {
            source,
            source_admin,
            target,
        }
    }

    /// Report whether the default database still holds a location table
    pub async fn state(&self) -> Result<MigrationState> {
        migration_state(self.source_admin).await
    }

    /// The number of records that [LocationMigrator::migrate()] would move
    pub async fn pending_count(&self) -> Result<usize> {
        pending_count(self.source, self.source_admin).await
    }

    /// Copy all locations into the network location database and drop the
    /// location table from the default database.
    ///
    /// Only a missing location table in the default database is treated as
    /// "nothing to do"; any other failure is returned to the caller, in which
    /// case the default database still holds every location.
    pub async fn migrate(&self) -> Result<()> {
        let table = LocationRecord::table_name();
        if self.state().await? == MigrationState::Done {
            debug!("no '{table}' table in the default database, nothing to migrate");
            return Ok(());
        }

        let records = match self.source.read_all().await {
            Err(StoreError::TableNotFound(_)) => {
                debug!("'{table}' disappeared before it could be read, nothing to migrate");
                return Ok(());
            }
            res => res?,
        };
        debug!("read {} locations from the default database", records.len());

        self.target.bulk_write(&records).await?;

        match self.source_admin.drop_table(table).await {
            Err(StoreError::TableNotFound(_)) => {
                debug!("'{table}' was already dropped from the default database")
            }
            res => res?,
        }
        info!(
            "moved {} network locations out of '{table}' in the default database",
            records.len()
        );
        Ok(())
    }
}
