use async_trait::async_trait;
use chrono::{DateTime, Utc};
use liftlog_core::{LoggedSet, Workout, WorkoutExercise};

use crate::error::StorageError;

/// Workout aggregate persistence.
///
/// Every structural write fails with `NotFound` when the workout, exercise or
/// set is missing under its parent, and with `Conflict` when the workout has
/// been finished. Both checks happen atomically with the write. Each write
/// also bumps the workout's `updated_at`.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// All workouts of `owner`, most recent date first.
    async fn list_workouts(&self, owner: &str) -> Result<Vec<Workout>, StorageError>;

    async fn get_workout(&self, owner: &str, id: &str) -> Result<Option<Workout>, StorageError>;

    /// Insert a workout together with any seeded exercises.
    async fn insert_workout(&self, workout: &Workout) -> Result<(), StorageError>;

    /// Overwrite `date`, `notes` and `updated_at`. Allowed on finished workouts.
    async fn update_workout_header(&self, workout: &Workout) -> Result<(), StorageError>;

    /// Delete workout with all children. Returns `true` if a row was deleted.
    async fn delete_workout(&self, owner: &str, id: &str) -> Result<bool, StorageError>;

    async fn insert_exercise(
        &self,
        workout_id: &str,
        exercise: &WorkoutExercise,
    ) -> Result<(), StorageError>;

    async fn delete_exercise(&self, workout_id: &str, exercise_id: &str)
    -> Result<(), StorageError>;

    async fn insert_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError>;

    async fn update_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError>;

    async fn delete_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<(), StorageError>;

    /// Stamp `end_time`. Fails with `Conflict` if already stamped.
    async fn finish_workout(
        &self,
        workout_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}
