//! Objects related to reporting errors from this library

/// Errors reported by a record store or its schema administration handle
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error(transparent)]
    Database(sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Whether this error means that the table being operated on is absent
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_))
    }
}

const NO_SUCH_TABLE: &str = "no such table: ";

impl std::convert::From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        let missing = match &value {
            sqlx::Error::Database(dberr) => dberr
                .message()
                .strip_prefix(NO_SUCH_TABLE)
                .map(|table| table.trim().to_string()),
            _ => None,
        };
        match missing {
            Some(table) => Self::TableNotFound(table),
            None => Self::Database(value),
        }
    }
}

/// A list of error types that can occur within this library
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("couldn't format timestamp: {0}")]
    TimestampFormat(#[from] time::error::Format),
}

/// A convenience type alias for a [Result] with [Error] as its error type
pub type Result<T, E = Error> = std::result::Result<T, E>;
