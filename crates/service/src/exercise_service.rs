use std::sync::Arc;

use liftlog_core::{Exercise, ExerciseFilter, ExerciseId, ExerciseSummary, builtin_exercises};
use liftlog_storage::StorageBackend;
use liftlog_storage::traits::ExerciseStore;

use crate::{Result, ServiceError};

/// Read access to the exercise catalog, plus seeding of the built-in library.
pub struct ExerciseService {
    storage: Arc<StorageBackend>,
}

impl ExerciseService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn search(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        Ok(self.storage.search_exercises(filter).await?)
    }

    pub async fn get(&self, id: ExerciseId) -> Result<Exercise> {
        self.storage.get_exercise(id).await?.ok_or_else(|| ServiceError::not_found("exercise", id))
    }

    pub async fn resolve(&self, id: ExerciseId) -> Result<ExerciseSummary> {
        resolve_exercise(&self.storage, id).await
    }

    /// Upsert the built-in global library. Returns the number of entries written.
    pub async fn seed_builtin(&self) -> Result<usize> {
        let library = builtin_exercises();
        for exercise in &library {
            self.storage.save_exercise(exercise).await?;
        }
        tracing::info!(count = library.len(), "seeded built-in exercise catalog");
        Ok(library.len())
    }
}

pub(crate) async fn resolve_exercise(
    storage: &StorageBackend,
    id: ExerciseId,
) -> Result<ExerciseSummary> {
    storage
        .get_exercise(id)
        .await?
        .map(|e| e.summary())
        .ok_or_else(|| ServiceError::not_found("exercise", id))
}
