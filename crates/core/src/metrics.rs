//! Derived workout metrics and the read projections that carry them.
//!
//! Every volume, count and duration a caller ever sees is computed here, from
//! the stored children of a [`Workout`] snapshot. Detail views, list summaries
//! and dashboard aggregates all go through [`WorkoutMetrics::compute`], so list
//! and detail can never disagree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::exercise::ExerciseSummary;
use crate::lifecycle::WorkoutState;
use crate::workout::{LoggedSet, Workout, WorkoutExercise};

/// weight × reps, or 0 for a weightless set.
pub fn set_volume(set: &LoggedSet) -> f64 {
    set.weight.map_or(0.0, |w| w * f64::from(set.reps))
}

pub fn exercise_volume(exercise: &WorkoutExercise) -> f64 {
    exercise.sets.iter().map(set_volume).sum()
}

/// Whole minutes between start and end, `None` unless both are present.
pub fn duration_minutes(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<i64> {
    match (start, end) {
        (Some(start), Some(end)) => Some((end - start).num_minutes().max(0)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorkoutMetrics {
    pub total_volume: f64,
    pub total_sets: usize,
    pub exercise_count: usize,
    pub duration: Option<i64>,
}

impl WorkoutMetrics {
    pub fn compute(workout: &Workout) -> Self {
        Self {
            total_volume: workout.exercises.iter().map(exercise_volume).sum(),
            total_sets: workout.exercises.iter().map(|e| e.sets.len()).sum(),
            exercise_count: workout.exercises.len(),
            duration: duration_minutes(workout.start_time, workout.end_time),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedSetDetail {
    pub id: String,
    pub set_number: u32,
    pub weight: Option<f64>,
    pub reps: u32,
    pub completed: bool,
    pub rpe: Option<u8>,
    pub volume: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExerciseDetail {
    pub id: String,
    pub exercise: ExerciseSummary,
    pub order: u32,
    pub notes: String,
    pub sets: Vec<LoggedSetDetail>,
    pub total_volume: f64,
    pub created_at: DateTime<Utc>,
}

/// The full aggregate as returned by every read and every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDetail {
    pub id: String,
    pub routine_id: Option<String>,
    pub routine_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub state: WorkoutState,
    pub notes: String,
    pub exercises: Vec<WorkoutExerciseDetail>,
    pub total_volume: f64,
    pub total_sets: usize,
    pub exercise_count: usize,
    pub duration: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-view projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSummary {
    pub id: String,
    pub routine_name: Option<String>,
    pub date: NaiveDate,
    pub state: WorkoutState,
    pub duration: Option<i64>,
    pub total_volume: f64,
    pub total_sets: usize,
    pub exercise_count: usize,
    pub created_at: DateTime<Utc>,
}

impl WorkoutDetail {
    pub fn exercise(&self, exercise_id: &str) -> Option<&WorkoutExerciseDetail> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    pub fn is_finished(&self) -> bool {
        self.state == WorkoutState::Finished
    }
}

impl From<&LoggedSet> for LoggedSetDetail {
    fn from(set: &LoggedSet) -> Self {
        Self {
            id: set.id.clone(),
            set_number: set.set_number,
            weight: set.weight,
            reps: set.reps,
            completed: set.completed,
            rpe: set.rpe,
            volume: set_volume(set),
            created_at: set.created_at,
        }
    }
}

impl From<&WorkoutExercise> for WorkoutExerciseDetail {
    fn from(exercise: &WorkoutExercise) -> Self {
        Self {
            id: exercise.id.clone(),
            exercise: exercise.exercise.clone(),
            order: exercise.order,
            notes: exercise.notes.clone(),
            sets: exercise.sets.iter().map(LoggedSetDetail::from).collect(),
            total_volume: exercise_volume(exercise),
            created_at: exercise.created_at,
        }
    }
}

impl From<&Workout> for WorkoutDetail {
    fn from(workout: &Workout) -> Self {
        let metrics = WorkoutMetrics::compute(workout);
        Self {
            id: workout.id.clone(),
            routine_id: workout.routine_id.clone(),
            routine_name: workout.routine_name.clone(),
            date: workout.date,
            start_time: workout.start_time,
            end_time: workout.end_time,
            state: workout.state(),
            notes: workout.notes.clone(),
            exercises: workout.exercises.iter().map(WorkoutExerciseDetail::from).collect(),
            total_volume: metrics.total_volume,
            total_sets: metrics.total_sets,
            exercise_count: metrics.exercise_count,
            duration: metrics.duration,
            created_at: workout.created_at,
            updated_at: workout.updated_at,
        }
    }
}

impl From<&Workout> for WorkoutSummary {
    fn from(workout: &Workout) -> Self {
        let metrics = WorkoutMetrics::compute(workout);
        Self {
            id: workout.id.clone(),
            routine_name: workout.routine_name.clone(),
            date: workout.date,
            state: workout.state(),
            duration: metrics.duration,
            total_volume: metrics.total_volume,
            total_sets: metrics.total_sets,
            exercise_count: metrics.exercise_count,
            created_at: workout.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::exercise::MuscleGroup;

    fn set(id: &str, reps: u32, weight: Option<f64>) -> LoggedSet {
        LoggedSet {
            id: id.to_owned(),
            set_number: 1,
            weight,
            reps,
            completed: true,
            rpe: None,
            created_at: Utc::now(),
        }
    }

    fn exercise(id: &str, sets: Vec<LoggedSet>) -> WorkoutExercise {
        WorkoutExercise {
            id: id.to_owned(),
            exercise: ExerciseSummary {
                id: 42,
                name: "Bench Press".to_owned(),
                muscle_group: MuscleGroup::Chest,
                is_global: true,
            },
            order: 0,
            notes: String::new(),
            sets,
            created_at: Utc::now(),
        }
    }

    fn workout(exercises: Vec<WorkoutExercise>) -> Workout {
        let mut workout = Workout::new("w".to_owned(), "o".to_owned(), None, None, Utc::now());
        workout.exercises = exercises;
        workout
    }

    #[test]
    fn test_two_sets_of_sixty() {
        let w = workout(vec![exercise(
            "e1",
            vec![set("s1", 10, Some(60.0)), set("s2", 8, Some(60.0))],
        )]);
        let detail = WorkoutDetail::from(&w);
        assert_eq!(detail.exercises[0].total_volume, 1080.0);
        assert_eq!(detail.total_volume, 1080.0);
        assert_eq!(detail.total_sets, 2);
        assert_eq!(detail.exercise_count, 1);
        assert_eq!(detail.exercises[0].sets[0].volume, 600.0);
    }

    #[test]
    fn test_weightless_sets_count_but_add_no_volume() {
        let w = workout(vec![
            exercise("e1", vec![set("s1", 12, None), set("s2", 5, Some(100.0))]),
            exercise("e2", vec![set("s3", 20, None)]),
            exercise("e3", vec![]),
        ]);
        let metrics = WorkoutMetrics::compute(&w);
        assert_eq!(metrics.total_sets, 3);
        assert_eq!(metrics.total_volume, 500.0);
        assert_eq!(metrics.exercise_count, 3);
    }

    #[test]
    fn test_duration_requires_both_timestamps() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(duration_minutes(Some(start), None), None);
        assert_eq!(duration_minutes(None, Some(start)), None);
        let end = start + Duration::seconds(61 * 60 + 59);
        assert_eq!(duration_minutes(Some(start), Some(end)), Some(61));
    }

    #[test]
    fn test_summary_and_detail_agree() {
        let mut w = workout(vec![exercise("e1", vec![set("s1", 3, Some(142.5))])]);
        w.end_time = w.start_time.map(|s| s + Duration::minutes(50));
        let detail = WorkoutDetail::from(&w);
        let summary = WorkoutSummary::from(&w);
        assert_eq!(detail.total_volume, summary.total_volume);
        assert_eq!(detail.total_sets, summary.total_sets);
        assert_eq!(detail.duration, Some(50));
        assert_eq!(summary.duration, Some(50));
        assert_eq!(summary.state, WorkoutState::Finished);
    }
}
