use thiserror::Error;

/// Storage-specific error types.
///
/// Persistence failures are never fatal to the daemon: the writer logs the
/// error, drops the record in flight, and keeps draining the channel.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
