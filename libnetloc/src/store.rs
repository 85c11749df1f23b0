//! Capabilities that the migrator needs from a database.
//!
//! These are implemented for SQLite by [crate::Database], and can be
//! implemented by in-memory fakes for testing.
use async_trait::async_trait;

use crate::{StoreError, location::LocationRecord};

/// A table of [LocationRecord]s bound to one database
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every record in the table. No ordering is guaranteed.
    async fn read_all(&self) -> Result<Vec<LocationRecord>, StoreError>;

    /// Write all of `records` to the table in a single batch
    async fn bulk_write(&self, records: &[LocationRecord]) -> Result<(), StoreError>;

    /// The number of records in the table
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read_all().await?.len())
    }
}

/// Schema administration for one database
#[async_trait]
pub trait SchemaAdmin: Send + Sync {
    /// Whether a table named `table` exists
    async fn table_exists(&self, table: &str) -> Result<bool, StoreError>;

    /// Execute a raw SQL statement
    async fn execute(&self, statement: &str) -> Result<(), StoreError>;

    /// Drop the table named `table`
    async fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        self.execute(&drop_table_statement(table)).await
    }
}

pub(crate) fn drop_table_statement(table: &str) -> String {
    format!("DROP TABLE {table}")
}
