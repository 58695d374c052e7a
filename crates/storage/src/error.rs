//! Error types for storage operations

use thiserror::Error;

/// Errors that can occur when exporting stored results.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to serialize the storage summary
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
