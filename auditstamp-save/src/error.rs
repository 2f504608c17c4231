//! Error types for the save pipeline

use thiserror::Error;

/// Result type for save pipeline operations
pub type Result<T> = std::result::Result<T, SaveError>;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SaveError {
    /// Record not found
    #[error("{record_type} not found: {id}")]
    NotFound { record_type: String, id: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
