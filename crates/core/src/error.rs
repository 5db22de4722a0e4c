use std::result::Result as StdResult;

use thiserror::Error;

/// Domain-level failures shared by every layer above the core.
///
/// The three variants map 1:1 onto the caller-facing taxonomy: malformed
/// input, a missing id under its expected parent, and an illegal state
/// transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Field-level validation failure.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Referenced entity does not exist under the expected parent.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Operation not permitted in the current lifecycle state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }
}

pub type Result<T> = StdResult<T, DomainError>;
