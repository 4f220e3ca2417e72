//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while recording security events.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to initialize the logger.
    #[error("failed to initialize security log: {0}")]
    InitializationFailed(String),

    /// Storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
