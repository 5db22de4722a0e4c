//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use liftlog_core::{
    AppConfig, Exercise, ExerciseFilter, ExerciseId, LoggedSet, Routine, RoutineExercise, Workout,
    WorkoutExercise,
};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::pg_storage::PgStorage;
use crate::traits::{ExerciseStore, RoutineStore, WorkoutStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Postgres(s) => <PgStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    Postgres(PgStorage),
}

impl StorageBackend {
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgStorage::new(database_url).await?))
    }

    /// PostgreSQL when a database URL is configured, in-memory otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        match config.database_url.as_deref() {
            Some(url) => Self::new_postgres(url).await,
            None => {
                tracing::warn!("no database URL configured, using in-memory storage");
                Ok(Self::new_memory())
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

// ── ExerciseStore ────────────────────────────────────────────────

#[async_trait]
impl ExerciseStore for StorageBackend {
    async fn save_exercise(&self, exercise: &Exercise) -> Result<(), StorageError> {
        dispatch!(self, ExerciseStore, save_exercise(exercise))
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, StorageError> {
        dispatch!(self, ExerciseStore, get_exercise(id))
    }

    async fn search_exercises(
        &self,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, StorageError> {
        dispatch!(self, ExerciseStore, search_exercises(filter))
    }
}

// ── RoutineStore ─────────────────────────────────────────────────

#[async_trait]
impl RoutineStore for StorageBackend {
    async fn list_routines(&self, owner: &str) -> Result<Vec<Routine>, StorageError> {
        dispatch!(self, RoutineStore, list_routines(owner))
    }

    async fn get_routine(&self, owner: &str, id: &str) -> Result<Option<Routine>, StorageError> {
        dispatch!(self, RoutineStore, get_routine(owner, id))
    }

    async fn insert_routine(&self, routine: &Routine) -> Result<(), StorageError> {
        dispatch!(self, RoutineStore, insert_routine(routine))
    }

    async fn update_routine_header(&self, routine: &Routine) -> Result<(), StorageError> {
        dispatch!(self, RoutineStore, update_routine_header(routine))
    }

    async fn delete_routine(&self, owner: &str, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, RoutineStore, delete_routine(owner, id))
    }

    async fn insert_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError> {
        dispatch!(self, RoutineStore, insert_prescription(routine_id, prescription))
    }

    async fn update_prescription(
        &self,
        routine_id: &str,
        prescription: &RoutineExercise,
    ) -> Result<(), StorageError> {
        dispatch!(self, RoutineStore, update_prescription(routine_id, prescription))
    }

    async fn delete_prescription(
        &self,
        routine_id: &str,
        prescription_id: &str,
    ) -> Result<(), StorageError> {
        dispatch!(self, RoutineStore, delete_prescription(routine_id, prescription_id))
    }

    async fn count_active_routines(&self, owner: &str) -> Result<usize, StorageError> {
        dispatch!(self, RoutineStore, count_active_routines(owner))
    }
}

// ── WorkoutStore ─────────────────────────────────────────────────

#[async_trait]
impl WorkoutStore for StorageBackend {
    async fn list_workouts(&self, owner: &str) -> Result<Vec<Workout>, StorageError> {
        dispatch!(self, WorkoutStore, list_workouts(owner))
    }

    async fn get_workout(&self, owner: &str, id: &str) -> Result<Option<Workout>, StorageError> {
        dispatch!(self, WorkoutStore, get_workout(owner, id))
    }

    async fn insert_workout(&self, workout: &Workout) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, insert_workout(workout))
    }

    async fn update_workout_header(&self, workout: &Workout) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, update_workout_header(workout))
    }

    async fn delete_workout(&self, owner: &str, id: &str) -> Result<bool, StorageError> {
        dispatch!(self, WorkoutStore, delete_workout(owner, id))
    }

    async fn insert_exercise(
        &self,
        workout_id: &str,
        exercise: &WorkoutExercise,
    ) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, insert_exercise(workout_id, exercise))
    }

    async fn delete_exercise(
        &self,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, delete_exercise(workout_id, exercise_id))
    }

    async fn insert_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, insert_set(workout_id, exercise_id, set))
    }

    async fn update_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, update_set(workout_id, exercise_id, set))
    }

    async fn delete_set(
        &self,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, delete_set(workout_id, exercise_id, set_id))
    }

    async fn finish_workout(
        &self,
        workout_id: &str,
        end_time: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        dispatch!(self, WorkoutStore, finish_workout(workout_id, end_time))
    }
}
