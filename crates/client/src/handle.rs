//! Local copy of one workout, kept in lockstep with the server.
//!
//! Every mutation answers with the full aggregate, which replaces the local
//! copy wholesale. Nothing is merged or patched client-side.

use liftlog_core::{NewSet, NewWorkout, NewWorkoutExercise, SetPatch, WorkoutDetail, WorkoutPatch};

use crate::client::LiftlogClient;
use crate::error::ClientError;

/// A workout being edited through the API.
///
/// A handle turns stale when a mutation is sent and its outcome never
/// becomes known: a transport failure, a server-side (5xx) failure, an
/// undecodable success, or a future dropped before completion. A stale
/// handle refuses further mutations until [`WorkoutHandle::refresh`] reloads
/// the server copy.
#[derive(Debug)]
pub struct WorkoutHandle {
    client: LiftlogClient,
    workout: WorkoutDetail,
    stale: bool,
}

impl WorkoutHandle {
    /// Load an existing workout.
    pub async fn open(client: LiftlogClient, workout_id: &str) -> Result<Self, ClientError> {
        let workout = client.get_workout(workout_id).await?;
        Ok(Self { client, workout, stale: false })
    }

    pub async fn create(client: LiftlogClient, input: &NewWorkout) -> Result<Self, ClientError> {
        let workout = client.create_workout(input).await?;
        Ok(Self { client, workout, stale: false })
    }

    pub async fn start_from_routine(
        client: LiftlogClient,
        routine_id: &str,
        notes: Option<&str>,
    ) -> Result<Self, ClientError> {
        let workout = client.start_workout(routine_id, notes).await?;
        Ok(Self { client, workout, stale: false })
    }

    /// Last aggregate confirmed by the server.
    #[must_use]
    pub const fn workout(&self) -> &WorkoutDetail {
        &self.workout
    }

    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Reload from the server. Clears staleness only on success.
    pub async fn refresh(&mut self) -> Result<&WorkoutDetail, ClientError> {
        let workout = self.client.get_workout(&self.workout.id).await?;
        self.workout = workout;
        self.stale = false;
        Ok(&self.workout)
    }

    pub async fn update(&mut self, patch: &WorkoutPatch) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.update_workout(&self.workout.id, patch).await;
        self.settle(result)
    }

    pub async fn add_exercise(
        &mut self,
        input: &NewWorkoutExercise,
    ) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.add_exercise(&self.workout.id, input).await;
        self.settle(result)
    }

    pub async fn remove_exercise(
        &mut self,
        exercise_id: &str,
    ) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.remove_exercise(&self.workout.id, exercise_id).await;
        self.settle(result)
    }

    pub async fn add_set(
        &mut self,
        exercise_id: &str,
        input: &NewSet,
    ) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.add_set(&self.workout.id, exercise_id, input).await;
        self.settle(result)
    }

    pub async fn update_set(
        &mut self,
        exercise_id: &str,
        set_id: &str,
        patch: &SetPatch,
    ) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.update_set(&self.workout.id, exercise_id, set_id, patch).await;
        self.settle(result)
    }

    pub async fn remove_set(
        &mut self,
        exercise_id: &str,
        set_id: &str,
    ) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.remove_set(&self.workout.id, exercise_id, set_id).await;
        self.settle(result)
    }

    pub async fn finish(&mut self) -> Result<&WorkoutDetail, ClientError> {
        self.begin()?;
        let result = self.client.finish_workout(&self.workout.id).await;
        self.settle(result)
    }

    /// Marked before the request leaves so a dropped future stays stale.
    fn begin(&mut self) -> Result<(), ClientError> {
        if self.stale {
            return Err(ClientError::Stale(self.workout.id.clone()));
        }
        self.stale = true;
        Ok(())
    }

    fn settle(
        &mut self,
        result: Result<WorkoutDetail, ClientError>,
    ) -> Result<&WorkoutDetail, ClientError> {
        match result {
            Ok(workout) => {
                self.workout = workout;
                self.stale = false;
                Ok(&self.workout)
            },
            Err(err) => {
                if err.outcome_unknown() {
                    tracing::warn!(
                        workout_id = %self.workout.id,
                        error = %err,
                        "mutation outcome unknown; refresh required"
                    );
                } else {
                    self.stale = false;
                }
                Err(err)
            },
        }
    }
}
