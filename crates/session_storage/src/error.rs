//! Session storage error types

use thiserror::Error;

/// Errors that can occur while reading or writing session storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data is not valid JSON
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A writer panicked while holding the storage lock
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for session storage operations
pub type StorageResult<T> = Result<T, StorageError>;
