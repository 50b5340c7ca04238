//! Errors of the SQLite store.

use thiserror::Error;

/// Errors raised while reading or writing the SQLite store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The driver failed.
    #[error("sqlite: {0}")]
    Driver(#[from] sqlx::Error),

    /// A column holds a value that does not fit the record's field type.
    #[error("conversion: {0}")]
    MismatchedTypes(String),

    /// A column holds a value that cannot be parsed.
    #[error("data: {0}")]
    InvalidData(String),
}
