//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Unknown class level (expected S1-S4)
    #[error("Invalid class level: {0}")]
    InvalidClassLevel(String),

    /// Unknown detail level (expected concise or detailed)
    #[error("Invalid detail level: {0}")]
    InvalidDetailLevel(String),

    /// Key does not belong to the note cache namespace
    #[error("Invalid note key: {0}")]
    InvalidNoteKey(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}
