//! Routine aggregate: an ordered template of exercise prescriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ESTIMATED_MINUTES_PER_SET;
use crate::error::{DomainError, Result};
use crate::exercise::{ExerciseId, ExerciseSummary};
use crate::ordering::{default_order, ensure_order_free};
use crate::validation::{validate_name, validate_order, validate_target};

/// One planned exercise within a routine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineExercise {
    pub id: String,
    pub exercise: ExerciseSummary,
    pub order: u32,
    pub target_sets: u32,
    pub target_reps: u32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Routine {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: String,
    /// Several routines may be active at once; nothing enforces exclusivity.
    pub is_active: bool,
    /// Prescriptions sorted by `order`.
    pub exercises: Vec<RoutineExercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-view projection of a routine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub exercise_count: usize,
    /// Minutes, estimated from the prescribed set count.
    pub estimated_duration: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Routine {
    pub fn new(id: String, owner: String, input: NewRoutine, now: DateTime<Utc>) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id,
            owner,
            name: input.name.trim().to_owned(),
            description: input.description,
            is_active: input.is_active.unwrap_or(true),
            exercises: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn prescription(&self, prescription_id: &str) -> Result<&RoutineExercise> {
        self.exercises
            .iter()
            .find(|p| p.id == prescription_id)
            .ok_or_else(|| DomainError::not_found("routine exercise", prescription_id))
    }

    pub fn contains_exercise(&self, exercise_id: ExerciseId) -> bool {
        self.exercises.iter().any(|p| p.exercise.id == exercise_id)
    }

    fn orders_except(&self, skip_id: Option<&str>) -> Vec<u32> {
        self.exercises
            .iter()
            .filter(|p| Some(p.id.as_str()) != skip_id)
            .map(|p| p.order)
            .collect()
    }

    pub fn estimated_duration(&self) -> u32 {
        self.exercises
            .iter()
            .map(|p| p.target_sets.saturating_mul(ESTIMATED_MINUTES_PER_SET))
            .fold(0_u32, u32::saturating_add)
    }

    pub fn summary(&self) -> RoutineSummary {
        RoutineSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
            exercise_count: self.exercises.len(),
            estimated_duration: self.estimated_duration(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Build the prescription `input` would add, rejecting duplicates.
    pub fn plan_prescription(
        &self,
        id: String,
        input: &NewPrescription,
        exercise: ExerciseSummary,
        now: DateTime<Utc>,
    ) -> Result<RoutineExercise> {
        let (target_sets, target_reps) = input.validated_targets()?;
        let requested_order = validate_order(input.order)?;
        if self.contains_exercise(input.exercise_id) {
            return Err(DomainError::validation(
                "exercise_id",
                format!("exercise {} is already part of this routine", input.exercise_id),
            ));
        }
        let siblings = self.orders_except(None);
        let order = match requested_order {
            Some(order) => {
                ensure_order_free(&siblings, order)?;
                order
            },
            None => default_order(&siblings),
        };
        Ok(RoutineExercise {
            id,
            exercise,
            order,
            target_sets,
            target_reps,
            notes: input.notes.clone().unwrap_or_default(),
            created_at: now,
        })
    }

    /// Build the updated prescription; the routine itself is not touched.
    pub fn plan_prescription_update(
        &self,
        prescription_id: &str,
        patch: &PrescriptionPatch,
    ) -> Result<RoutineExercise> {
        let current = self.prescription(prescription_id)?;
        let target_sets =
            patch.target_sets.map(|v| validate_target("target_sets", v)).transpose()?;
        let target_reps =
            patch.target_reps.map(|v| validate_target("target_reps", v)).transpose()?;
        let order = validate_order(patch.order)?;
        if let Some(order) = order {
            ensure_order_free(&self.orders_except(Some(prescription_id)), order)?;
        }
        Ok(RoutineExercise {
            order: order.unwrap_or(current.order),
            target_sets: target_sets.unwrap_or(current.target_sets),
            target_reps: target_reps.unwrap_or(current.target_reps),
            notes: patch.notes.clone().unwrap_or_else(|| current.notes.clone()),
            ..current.clone()
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRoutine {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewRoutine {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutinePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl RoutinePatch {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }

    /// Header fields after applying the patch.
    pub fn apply(&self, routine: &Routine, now: DateTime<Utc>) -> Result<Routine> {
        self.validate()?;
        Ok(Routine {
            name: self.name.as_deref().map_or_else(|| routine.name.clone(), |n| n.trim().to_owned()),
            description: self.description.clone().unwrap_or_else(|| routine.description.clone()),
            is_active: self.is_active.unwrap_or(routine.is_active),
            updated_at: now,
            ..routine.clone()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPrescription {
    pub exercise_id: ExerciseId,
    #[serde(default)]
    pub order: Option<i64>,
    pub target_sets: i64,
    pub target_reps: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPrescription {
    /// `(target_sets, target_reps)` narrowed to their stored width.
    pub fn validated_targets(&self) -> Result<(u32, u32)> {
        Ok((
            validate_target("target_sets", self.target_sets)?,
            validate_target("target_reps", self.target_reps)?,
        ))
    }

    pub fn validate(&self) -> Result<()> {
        self.validated_targets()?;
        validate_order(self.order).map(|_| ())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionPatch {
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub target_sets: Option<i64>,
    #[serde(default)]
    pub target_reps: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}
