//! Typed error enum for the service layer.
//!
//! Folds domain rule violations and storage failures into the caller-facing
//! taxonomy so handlers match on variants instead of inspecting messages.

use liftlog_core::DomainError;
use liftlog_storage::{DuplicateKey, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected with field-level detail.
    #[error("invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Id absent under its expected parent.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Mutation not permitted in the current lifecycle state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage operation failed for reasons the caller cannot fix.
    #[error("storage: {0}")]
    Storage(#[source] StorageError),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_transient())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => Self::Validation { field, message },
            DomainError::NotFound { entity, id } => Self::NotFound { entity, id },
            DomainError::Conflict(message) => Self::Conflict(message),
        }
    }
}

/// Exercise and order collisions surface as validation failures on the
/// matching field; they only happen when a concurrent write took the same
/// slot. A primary-key collision is an internal fault.
impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => Self::NotFound { entity, id },
            StorageError::Conflict(message) => Self::Conflict(message),
            StorageError::Duplicate { key: DuplicateKey::Order, message } => {
                Self::Validation { field: "order", message }
            },
            StorageError::Duplicate { key: DuplicateKey::ExerciseId, message } => {
                Self::Validation { field: "exercise_id", message }
            },
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_selects_field() {
        // The message mentions neither field; only the key decides.
        let err = ServiceError::from(StorageError::duplicate(
            DuplicateKey::Order,
            "duplicate key value violates unique constraint",
        ));
        assert!(matches!(err, ServiceError::Validation { field: "order", .. }));

        let err = ServiceError::from(StorageError::duplicate(
            DuplicateKey::ExerciseId,
            "order of keys (routine_id, exercise_id) already exists",
        ));
        assert!(matches!(err, ServiceError::Validation { field: "exercise_id", .. }));

        let err = ServiceError::from(StorageError::duplicate(DuplicateKey::Id, "workout 'w1'"));
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn test_domain_errors_keep_their_kind() {
        assert!(ServiceError::from(DomainError::Conflict("done".into())).is_conflict());
        assert!(ServiceError::from(DomainError::not_found("set", "s1")).is_not_found());
        assert!(ServiceError::from(DomainError::validation("reps", "is required")).is_validation());
    }

    #[test]
    fn test_migration_failure_is_opaque_storage_error() {
        let err = ServiceError::from(StorageError::Migration("boom".into()));
        assert!(matches!(err, ServiceError::Storage(_)));
        assert!(!err.is_transient());
    }
}
