//! Workout aggregate: workout → exercises → logged sets.
//!
//! These are the stored fields only. Derived metrics live in [`crate::metrics`]
//! and are attached when an aggregate is projected into a
//! [`crate::WorkoutDetail`] or [`crate::WorkoutSummary`].
//!
//! The `plan_*` methods never modify `self`. They validate a single delta
//! against the current snapshot and return the child record the delta would
//! write, leaving persistence to the storage layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::exercise::{ExerciseId, ExerciseSummary};
use crate::json_utils::double_option;
use crate::ordering::{default_order, ensure_order_free};
use crate::routine::Routine;
use crate::validation::{
    validate_order, validate_reps, validate_rpe, validate_set_number, validate_weight,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub id: String,
    /// Display label, not a key. Duplicates are legal.
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: u32,
    pub completed: bool,
    pub rpe: Option<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    pub id: String,
    pub exercise: ExerciseSummary,
    pub order: u32,
    pub notes: String,
    /// Sets in logging order.
    pub sets: Vec<LoggedSet>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutExercise {
    pub fn set(&self, set_id: &str) -> Result<&LoggedSet> {
        self.sets
            .iter()
            .find(|s| s.id == set_id)
            .ok_or_else(|| DomainError::not_found("set", set_id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: String,
    pub owner: String,
    pub routine_id: Option<String>,
    /// Routine name at instantiation time; survives routine renames and deletion.
    pub routine_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub notes: String,
    /// Exercises sorted by `order`.
    pub exercises: Vec<WorkoutExercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    /// A free workout with no routine reference. `start_time` is stamped now.
    pub fn new(
        id: String,
        owner: String,
        date: Option<NaiveDate>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            routine_id: None,
            routine_name: None,
            date: date.unwrap_or_else(|| now.date_naive()),
            start_time: Some(now),
            end_time: None,
            notes: notes.unwrap_or_default(),
            exercises: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Seed a workout 1:1 from a routine's prescriptions.
    ///
    /// Exercise reference, order and notes are copied. Target sets/reps stay on
    /// the routine; every seeded exercise starts with no sets.
    pub fn from_routine<F>(
        id: String,
        routine: &Routine,
        date: Option<NaiveDate>,
        notes: Option<String>,
        now: DateTime<Utc>,
        mut next_id: F,
    ) -> Self
    where
        F: FnMut() -> String,
    {
        let mut workout = Self::new(id, routine.owner.clone(), date, notes, now);
        workout.routine_id = Some(routine.id.clone());
        workout.routine_name = Some(routine.name.clone());
        workout.exercises = routine
            .exercises
            .iter()
            .map(|p| WorkoutExercise {
                id: next_id(),
                exercise: p.exercise.clone(),
                order: p.order,
                notes: p.notes.clone(),
                sets: Vec::new(),
                created_at: now,
            })
            .collect();
        workout
    }

    pub fn exercise(&self, exercise_id: &str) -> Result<&WorkoutExercise> {
        self.exercises
            .iter()
            .find(|e| e.id == exercise_id)
            .ok_or_else(|| DomainError::not_found("workout exercise", exercise_id))
    }

    fn exercise_orders(&self) -> Vec<u32> {
        self.exercises.iter().map(|e| e.order).collect()
    }

    pub fn plan_exercise(
        &self,
        id: String,
        input: &NewWorkoutExercise,
        exercise: ExerciseSummary,
        now: DateTime<Utc>,
    ) -> Result<WorkoutExercise> {
        self.ensure_open()?;
        let siblings = self.exercise_orders();
        let order = match validate_order(input.order)? {
            Some(order) => {
                ensure_order_free(&siblings, order)?;
                order
            },
            None => default_order(&siblings),
        };
        Ok(WorkoutExercise {
            id,
            exercise,
            order,
            notes: input.notes.clone().unwrap_or_default(),
            sets: Vec::new(),
            created_at: now,
        })
    }

    pub fn check_exercise_removal(&self, exercise_id: &str) -> Result<()> {
        self.ensure_open()?;
        self.exercise(exercise_id).map(|_| ())
    }

    pub fn plan_set(
        &self,
        exercise_id: &str,
        id: String,
        input: &NewSet,
        now: DateTime<Utc>,
    ) -> Result<LoggedSet> {
        self.ensure_open()?;
        let exercise = self.exercise(exercise_id)?;
        let reps = validate_reps(input.reps)?;
        validate_weight(input.weight)?;
        let rpe = validate_rpe(input.rpe)?;
        let set_number = validate_set_number(input.set_number)?;
        let next_number = u32::try_from(exercise.sets.len()).unwrap_or(u32::MAX).saturating_add(1);
        Ok(LoggedSet {
            id,
            set_number: set_number.unwrap_or(next_number),
            weight: input.weight,
            reps,
            completed: input.completed.unwrap_or(true),
            rpe,
            created_at: now,
        })
    }

    pub fn plan_set_update(
        &self,
        exercise_id: &str,
        set_id: &str,
        patch: &SetPatch,
    ) -> Result<LoggedSet> {
        self.ensure_open()?;
        let current = self.exercise(exercise_id)?.set(set_id)?;
        let weight = patch.weight.unwrap_or(current.weight);
        let reps = match patch.reps {
            Some(reps) => validate_reps(Some(reps))?,
            None => current.reps,
        };
        validate_weight(weight)?;
        let rpe = match patch.rpe {
            Some(rpe) => validate_rpe(rpe)?,
            None => current.rpe,
        };
        let set_number = validate_set_number(patch.set_number)?;
        Ok(LoggedSet {
            set_number: set_number.unwrap_or(current.set_number),
            weight,
            reps,
            completed: patch.completed.unwrap_or(current.completed),
            rpe,
            ..current.clone()
        })
    }

    pub fn check_set_removal(&self, exercise_id: &str, set_id: &str) -> Result<()> {
        self.ensure_open()?;
        self.exercise(exercise_id)?.set(set_id).map(|_| ())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewWorkout {
    /// Seed exercises from this routine when present.
    #[serde(default)]
    pub routine_id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Non-structural header edits; permitted on finished workouts too.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WorkoutPatch {
    pub fn apply(&self, workout: &Workout, now: DateTime<Utc>) -> Workout {
        Workout {
            date: self.date.unwrap_or(workout.date),
            notes: self.notes.clone().unwrap_or_else(|| workout.notes.clone()),
            updated_at: now,
            ..workout.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewWorkoutExercise {
    pub exercise_id: ExerciseId,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to log a set. Counters are wide and `reps` is optional so that a
/// missing or out-of-range value surfaces as a field-level validation error
/// rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewSet {
    #[serde(default)]
    pub set_number: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub rpe: Option<i64>,
}

impl NewSet {
    pub fn new(reps: u32, weight: Option<f64>) -> Self {
        Self { reps: Some(i64::from(reps)), weight, ..Self::default() }
    }
}

/// Partial set update. `weight`/`rpe` accept explicit `null` to clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_number: Option<i64>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub weight: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub rpe: Option<Option<i64>>,
}
