//! This is a library that moves the network locations known to a learning
//! platform deployment out of its general-purpose database and into a
//! dedicated network location database.

pub mod database;
pub mod error;
pub mod location;
pub mod migrator;
pub mod store;
pub mod value;

pub use database::Database;
pub use error::{Error, Result, StoreError};
pub use location::{Entity, LocationRecord, LocationType};
pub use migrator::{LocationMigrator, MigrationState, migration_state, pending_count};
pub use store::{RecordStore, SchemaAdmin};
pub use value::ColumnValue;

/// The logical name of the dedicated network location database
pub const NETWORK_LOCATION: &str = "networklocation";
