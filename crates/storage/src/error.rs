//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (not found, duplicate, finished
//! workout, transient DB errors) instead of downcasting opaque boxes.

use thiserror::Error;

use crate::pg_migrations::{ROUTINE_EXERCISE_UNIQUE, ROUTINE_ORDER_UNIQUE, WORKOUT_ORDER_UNIQUE};

/// Unique key a rejected write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKey {
    /// Primary key of the row itself.
    Id,
    /// Same exercise already prescribed in the routine.
    ExerciseId,
    /// Sibling order slot already taken.
    Order,
}

impl DuplicateKey {
    /// Key guarded by a PostgreSQL unique constraint or index.
    pub fn from_constraint(name: Option<&str>) -> Self {
        match name {
            Some(n) if n == ROUTINE_EXERCISE_UNIQUE => Self::ExerciseId,
            Some(n) if n == ROUTINE_ORDER_UNIQUE || n == WORKOUT_ORDER_UNIQUE => Self::Order,
            _ => Self::Id,
        }
    }
}

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unique constraint violation (exercise already in routine, order taken).
    #[error("duplicate: {message}")]
    Duplicate { key: DuplicateKey, message: String },

    /// Write rejected because the workout is already finished.
    #[error("conflict: {0}")]
    Conflict(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Row data could not be converted into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Migration failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    pub fn duplicate(key: DuplicateKey, message: impl Into<String>) -> Self {
        Self::Duplicate { key, message: message.into() }
    }

    pub(crate) fn finished(workout_id: &str) -> Self {
        Self::Conflict(format!("workout '{workout_id}' is already finished"))
    }

    /// Whether this error is likely transient (worth retrying by the caller).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)))
    }

    /// Whether this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Custom `From<sqlx::Error>`, not a blanket `#[from]`.
///
/// - `RowNotFound` → `NotFound` (generic; callers remap with entity context)
/// - SQLSTATE 23505 → `Duplicate`, keyed by the violated constraint name
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            sqlx::Error::Database(db_err) if db_err.code().is_some_and(|c| c == "23505") => {
                Self::duplicate(
                    DuplicateKey::from_constraint(db_err.constraint()),
                    db_err.message(),
                )
            },
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names_map_to_keys() {
        assert_eq!(
            DuplicateKey::from_constraint(Some("idx_routine_exercises_exercise")),
            DuplicateKey::ExerciseId
        );
        assert_eq!(
            DuplicateKey::from_constraint(Some("idx_routine_exercises_ord")),
            DuplicateKey::Order
        );
        assert_eq!(
            DuplicateKey::from_constraint(Some("idx_workout_exercises_ord")),
            DuplicateKey::Order
        );
        assert_eq!(DuplicateKey::from_constraint(Some("workouts_pkey")), DuplicateKey::Id);
        assert_eq!(DuplicateKey::from_constraint(None), DuplicateKey::Id);
    }
}
