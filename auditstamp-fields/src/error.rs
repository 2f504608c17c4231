//! Error types for the field registry

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur when registering audited fields
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Owner type identifier was empty
    #[error("owner type must not be empty (field: {field})")]
    EmptyOwnerType { field: String },

    /// Field name was empty
    #[error("field name must not be empty (owner type: {owner})")]
    EmptyFieldName { owner: String },
}
