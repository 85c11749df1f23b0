use async_trait::async_trait;
use sqlx::{
    Pool, QueryBuilder, Sqlite, SqlitePool, migrate::Migrator, sqlite::SqliteConnectOptions,
};
use std::path::Path;
use tracing::{debug, trace};

use crate::{
    StoreError,
    location::{Entity, LocationRecord},
    store::{RecordStore, SchemaAdmin},
};

/// Schema migrations for the dedicated network location database
pub static NETWORK_LOCATION_MIGRATOR: Migrator = sqlx::migrate!("../db/migrations");

// SQLITE_MAX_VARIABLE_NUMBER for sqlite >= 3.32
const SQLITE_MAX_VARIABLES: usize = 32766;

/// An object that represents a connection to a sqlite database
#[derive(Clone, Debug)]
pub struct Database(Pool<Sqlite>);

impl From<Pool<Sqlite>> for Database {
    /// **WARNING**: This is primarily intended for tests. For the network
    /// location database you should probably use
    /// [Database::open_network_location()] instead, since it will create the
    /// schema automatically.
    fn from(value: Pool<Sqlite>) -> Self {
        Self(value)
    }
}

impl Database {
    /// Open a connection to an existing database without changing its schema.
    pub async fn connect<P: AsRef<Path>>(db: P) -> Result<Self, StoreError> {
        debug!("connecting to database {:?}", db.as_ref());
        let dbpool = SqlitePool::connect_with(SqliteConnectOptions::new().filename(db)).await?;
        Ok(Database(dbpool))
    }

    /// Open a connection to the network location database, creating it if
    /// necessary. This will also perform any necessary sql migrations to
    /// ensure that the location table exists.
    pub async fn open_network_location<P: AsRef<Path>>(db: P) -> Result<Self, StoreError> {
        debug!("opening network location database {:?}", db.as_ref());
        let dbpool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(db)
                .create_if_missing(true),
        )
        .await?;
        trace!("Running database migrations");
        NETWORK_LOCATION_MIGRATOR.run(&dbpool).await?;
        Ok(Database(dbpool))
    }

    /// gets a reference to the underlying sqlx connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.0
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.0.close().await
    }
}

#[async_trait]
impl RecordStore for Database {
    async fn read_all(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let records = sqlx::query_as(&format!(
            "SELECT {} FROM {}",
            LocationRecord::columns().join(", "),
            LocationRecord::table_name()
        ))
        .fetch_all(&self.0)
        .await?;
        Ok(records)
    }

    async fn bulk_write(&self, records: &[LocationRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let columns = LocationRecord::columns();
        let batch_size = SQLITE_MAX_VARIABLES / columns.len();
        let mut tx = self.0.begin().await?;
        for batch in records.chunks(batch_size) {
            trace!("inserting batch of {} locations", batch.len());
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "INSERT INTO {} ({}) ",
                LocationRecord::table_name(),
                columns.join(", ")
            ));
            qb.push_values(batch, |mut b, record| {
                b.push_bind(&record.id)
                    .push_bind(&record.base_url)
                    .push_bind(&record.nickname)
                    .push_bind(&record.application)
                    .push_bind(&record.kolibri_version)
                    .push_bind(&record.instance_id)
                    .push_bind(&record.device_name)
                    .push_bind(&record.operating_system)
                    .push_bind(&record.subset_of_users_device)
                    .push_bind(&record.connection_status)
                    .push_bind(&record.location_type)
                    .push_bind(&record.added)
                    .push_bind(&record.last_accessed);
            });
            qb.build().execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {}",
            LocationRecord::table_name()
        ))
        .fetch_one(&self.0)
        .await?;
        Ok(n.try_into().unwrap_or_default())
    }
}

#[async_trait]
impl SchemaAdmin for Database {
    async fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        let n: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_schema WHERE type='table' AND name=?")
                .bind(table)
                .fetch_one(&self.0)
                .await?;
        Ok(n > 0)
    }

    async fn execute(&self, statement: &str) -> Result<(), StoreError> {
        trace!(statement, "executing");
        sqlx::query(statement).execute(&self.0).await?;
        Ok(())
    }
}

#[cfg(test)]
impl Database {
    /// A private in-memory network location database. The pool only holds a
    /// single connection since every sqlite memory connection is a separate
    /// database.
    pub(crate) async fn network_location_in_memory() -> Self {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open memory database");
        NETWORK_LOCATION_MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to migrate memory database");
        Database(pool)
    }
}
