//! Workout lifecycle and the delta-in, aggregate-out mutation protocol.
//!
//! Each mutator loads the owner's workout, lets the domain plan the delta
//! (validation, lifecycle and parent checks), hands the single delta to
//! storage, and returns the reloaded [`WorkoutDetail`]. Storage re-checks
//! existence and the open state atomically with the write, so a finish that
//! races an edit still yields a conflict rather than a partial apply.

use std::sync::Arc;

use chrono::Utc;
use liftlog_core::{
    NewSet, NewWorkout, NewWorkoutExercise, PaginatedResult, SetPatch, Workout, WorkoutDetail,
    WorkoutPatch, WorkoutSummary,
};
use liftlog_storage::StorageBackend;
use liftlog_storage::traits::{RoutineStore, WorkoutStore};

use crate::exercise_service::resolve_exercise;
use crate::{Result, ServiceError, new_id};

pub struct WorkoutService {
    storage: Arc<StorageBackend>,
}

impl WorkoutService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    async fn load(&self, owner: &str, id: &str) -> Result<Workout> {
        self.storage
            .get_workout(owner, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("workout", id))
    }

    async fn detail(&self, owner: &str, id: &str) -> Result<WorkoutDetail> {
        Ok(WorkoutDetail::from(&self.load(owner, id).await?))
    }

    pub async fn list_workouts(
        &self,
        owner: &str,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<PaginatedResult<WorkoutSummary>> {
        let workouts = self.storage.list_workouts(owner).await?;
        let summaries = workouts.iter().map(WorkoutSummary::from).collect();
        Ok(PaginatedResult::from_all(summaries, offset, limit))
    }

    pub async fn get_workout(&self, owner: &str, id: &str) -> Result<WorkoutDetail> {
        self.detail(owner, id).await
    }

    /// Free workout, or one seeded from `input.routine_id` when present.
    pub async fn create_workout(&self, owner: &str, input: NewWorkout) -> Result<WorkoutDetail> {
        let now = Utc::now();
        let workout = match input.routine_id.as_deref() {
            Some(routine_id) => {
                let routine = self
                    .storage
                    .get_routine(owner, routine_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("routine", routine_id))?;
                Workout::from_routine(new_id(), &routine, input.date, input.notes, now, new_id)
            },
            None => Workout::new(new_id(), owner.to_owned(), input.date, input.notes, now),
        };
        self.storage.insert_workout(&workout).await?;
        tracing::info!(
            workout_id = %workout.id,
            routine_id = ?workout.routine_id,
            exercises = workout.exercises.len(),
            "workout started"
        );
        self.detail(owner, &workout.id).await
    }

    /// Start a workout from a routine's prescriptions.
    pub async fn start_from_routine(
        &self,
        owner: &str,
        routine_id: &str,
        notes: Option<String>,
    ) -> Result<WorkoutDetail> {
        let input = NewWorkout { routine_id: Some(routine_id.to_owned()), date: None, notes };
        self.create_workout(owner, input).await
    }

    /// Header edit; allowed whether or not the workout is finished.
    pub async fn update_workout(
        &self,
        owner: &str,
        id: &str,
        patch: WorkoutPatch,
    ) -> Result<WorkoutDetail> {
        let current = self.load(owner, id).await?;
        self.storage.update_workout_header(&patch.apply(&current, Utc::now())).await?;
        tracing::debug!(workout_id = id, "workout header updated");
        self.detail(owner, id).await
    }

    pub async fn delete_workout(&self, owner: &str, id: &str) -> Result<()> {
        if !self.storage.delete_workout(owner, id).await? {
            return Err(ServiceError::not_found("workout", id));
        }
        tracing::info!(workout_id = id, "workout deleted");
        Ok(())
    }

    pub async fn add_exercise(
        &self,
        owner: &str,
        workout_id: &str,
        input: NewWorkoutExercise,
    ) -> Result<WorkoutDetail> {
        let workout = self.load(owner, workout_id).await?;
        workout.ensure_open()?;
        let exercise = resolve_exercise(&self.storage, input.exercise_id).await?;
        let planned = workout.plan_exercise(new_id(), &input, exercise, Utc::now())?;
        self.storage.insert_exercise(workout_id, &planned).await?;
        tracing::debug!(
            workout_id,
            workout_exercise_id = %planned.id,
            order = planned.order,
            "exercise added"
        );
        self.detail(owner, workout_id).await
    }

    pub async fn remove_exercise(
        &self,
        owner: &str,
        workout_id: &str,
        exercise_id: &str,
    ) -> Result<WorkoutDetail> {
        let workout = self.load(owner, workout_id).await?;
        workout.check_exercise_removal(exercise_id)?;
        self.storage.delete_exercise(workout_id, exercise_id).await?;
        tracing::debug!(workout_id, workout_exercise_id = exercise_id, "exercise removed");
        self.detail(owner, workout_id).await
    }

    pub async fn add_set(
        &self,
        owner: &str,
        workout_id: &str,
        exercise_id: &str,
        input: NewSet,
    ) -> Result<WorkoutDetail> {
        let workout = self.load(owner, workout_id).await?;
        let set = workout.plan_set(exercise_id, new_id(), &input, Utc::now())?;
        self.storage.insert_set(workout_id, exercise_id, &set).await?;
        tracing::debug!(
            workout_id,
            workout_exercise_id = exercise_id,
            set_id = %set.id,
            set_number = set.set_number,
            "set logged"
        );
        self.detail(owner, workout_id).await
    }

    pub async fn update_set(
        &self,
        owner: &str,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
        patch: SetPatch,
    ) -> Result<WorkoutDetail> {
        let workout = self.load(owner, workout_id).await?;
        let set = workout.plan_set_update(exercise_id, set_id, &patch)?;
        self.storage.update_set(workout_id, exercise_id, &set).await?;
        tracing::debug!(workout_id, workout_exercise_id = exercise_id, set_id, "set updated");
        self.detail(owner, workout_id).await
    }

    pub async fn remove_set(
        &self,
        owner: &str,
        workout_id: &str,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<WorkoutDetail> {
        let workout = self.load(owner, workout_id).await?;
        workout.check_set_removal(exercise_id, set_id)?;
        self.storage.delete_set(workout_id, exercise_id, set_id).await?;
        tracing::debug!(workout_id, workout_exercise_id = exercise_id, set_id, "set removed");
        self.detail(owner, workout_id).await
    }

    /// A second finish is a conflict; the stored end time is never moved.
    pub async fn finish_workout(&self, owner: &str, workout_id: &str) -> Result<WorkoutDetail> {
        let workout = self.load(owner, workout_id).await?;
        let end_time = workout.plan_finish(Utc::now())?;
        self.storage.finish_workout(workout_id, end_time).await?;
        let detail = self.detail(owner, workout_id).await?;
        tracing::info!(
            workout_id,
            total_sets = detail.total_sets,
            total_volume = detail.total_volume,
            duration = ?detail.duration,
            "workout finished"
        );
        Ok(detail)
    }
}
