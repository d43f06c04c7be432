//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Items column held malformed JSON
    #[error("items column: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A column held a value outside its vocabulary
    #[error("invalid {field} value: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
