//! Workout lifecycle: `Open` → `Finished`, one-way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::workout::Workout;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutState {
    Open,
    Finished,
}

impl WorkoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Finished => "finished",
        }
    }
}

impl Workout {
    pub fn state(&self) -> WorkoutState {
        if self.end_time.is_some() { WorkoutState::Finished } else { WorkoutState::Open }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == WorkoutState::Finished
    }

    /// Structural mutations are only legal while the workout is open.
    pub fn ensure_open(&self) -> Result<()> {
        match self.state() {
            WorkoutState::Open => Ok(()),
            WorkoutState::Finished => {
                Err(DomainError::Conflict(format!("workout '{}' is already finished", self.id)))
            },
        }
    }

    /// End time to stamp when finishing at `now`.
    ///
    /// A second finish is a conflict, never a silent no-op. The stamp is
    /// clamped to `start_time` so the duration can never go negative.
    pub fn plan_finish(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.ensure_open()?;
        Ok(match self.start_time {
            Some(start) if now < start => start,
            _ => now,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn workout_started_at(start: DateTime<Utc>) -> Workout {
        Workout::new("w".to_owned(), "o".to_owned(), None, None, start)
    }

    #[test]
    fn test_finish_stamps_now() {
        let start = Utc::now();
        let workout = workout_started_at(start);
        let end = start + Duration::minutes(45);
        assert_eq!(workout.plan_finish(end).unwrap(), end);
    }

    #[test]
    fn test_second_finish_is_conflict() {
        let start = Utc::now();
        let mut workout = workout_started_at(start);
        workout.end_time = Some(workout.plan_finish(start + Duration::minutes(1)).unwrap());
        assert_eq!(workout.state(), WorkoutState::Finished);
        assert!(matches!(workout.plan_finish(Utc::now()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_finish_before_start_is_clamped() {
        let start = Utc::now();
        let workout = workout_started_at(start);
        assert_eq!(workout.plan_finish(start - Duration::minutes(5)).unwrap(), start);
    }

    #[test]
    fn test_finished_workout_rejects_structural_plans() {
        let start = Utc::now();
        let mut workout = workout_started_at(start);
        workout.end_time = Some(start);
        let input = crate::NewWorkoutExercise { exercise_id: 1, order: None, notes: None };
        let summary = crate::ExerciseSummary::unresolved(1);
        let err = workout.plan_exercise("e".to_owned(), &input, summary, start);
        assert!(matches!(err, Err(DomainError::Conflict(_))));
        assert!(matches!(workout.check_exercise_removal("e"), Err(DomainError::Conflict(_))));
    }
}
