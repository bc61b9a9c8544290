//! Error types for the storage gateway.

use thiserror::Error;

/// Result type for gateway operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in gateway operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A table or column name that cannot be used as an identifier.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// An insert or update with no columns.
    #[error("no columns supplied for {0}")]
    EmptyRow(String),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("connection lock poisoned")]
    Poisoned,
}
