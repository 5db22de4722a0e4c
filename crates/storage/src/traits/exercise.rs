use async_trait::async_trait;
use liftlog_core::{Exercise, ExerciseFilter, ExerciseId};

use crate::error::StorageError;

/// Read contract of the exercise catalog, plus seeding.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Insert or replace a catalog entry.
    async fn save_exercise(&self, exercise: &Exercise) -> Result<(), StorageError>;

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, StorageError>;

    /// Entries matching `filter`, ordered by name.
    async fn search_exercises(&self, filter: &ExerciseFilter)
    -> Result<Vec<Exercise>, StorageError>;
}
