use async_trait::async_trait;
use liftlog_core::{Routine, RoutineExercise};

use crate::error::StorageError;

/// Routine aggregate persistence.
///
/// Reads return routines with prescriptions sorted by `order` and exercise
/// references resolved against the catalog.
#[async_trait]
pub trait RoutineStore: Send + Sync {
    /// All routines of `owner`, newest first.
    async fn list_routines(&self, owner: &str) -> Result<Vec<Routine>, StorageError>;

    async fn get_routine(&self, owner: &str, id: &str) -> Result<Option<Routine>, StorageError>;

    /// Insert a new routine header (prescriptions are ignored).
    async fn insert_routine(&self, routine: &Routine) -> Result<(), StorageError>;

    /// Overwrite name, description, `is_active` and `updated_at`.
    async fn update_routine_header(&self, routine: &Routine) -> Result<(), StorageError>;

    /// Delete routine and its prescriptions. Returns `true` if a row was deleted.
    async fn delete_routine(&self, owner: &str, id: &str) -> Result<bool, StorageError>;

    /// Fails with `Duplicate` if the exercise or order is already used in the routine.
    async fn insert_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError>;

    async fn update_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError>;

    async fn delete_prescription(
        &self,
        routine_id: &str,
        prescription_id: &str,
    ) -> Result<(), StorageError>;

    async fn count_active_routines(&self, owner: &str) -> Result<usize, StorageError>;
}
