//! Test utilities and module declarations for storage tests.

use chrono::{NaiveDate, Utc};
use liftlog_core::{
    Exercise, LoggedSet, NewRoutine, Routine, RoutineExercise, Workout, WorkoutExercise,
    builtin_exercises,
};

use crate::MemoryStorage;
use crate::traits::ExerciseStore;

pub const OWNER: &str = "athlete";

pub async fn create_test_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    for exercise in builtin_exercises() {
        storage.save_exercise(&exercise).await.unwrap();
    }
    storage
}

pub fn catalog_entry(id: i64) -> Exercise {
    builtin_exercises().into_iter().find(|e| e.id == id).unwrap()
}

pub fn create_test_routine(id: &str) -> Routine {
    let input = NewRoutine {
        name: format!("Routine {id}"),
        description: String::new(),
        is_active: None,
    };
    Routine::new(id.to_owned(), OWNER.to_owned(), input, Utc::now()).unwrap()
}

pub fn create_test_prescription(id: &str, exercise_id: i64, order: u32) -> RoutineExercise {
    RoutineExercise {
        id: id.to_owned(),
        exercise: catalog_entry(exercise_id).summary(),
        order,
        target_sets: 3,
        target_reps: 10,
        notes: String::new(),
        created_at: Utc::now(),
    }
}

pub fn create_test_workout(id: &str) -> Workout {
    let date = NaiveDate::from_ymd_opt(2026, 3, 14);
    Workout::new(id.to_owned(), OWNER.to_owned(), date, None, Utc::now())
}

pub fn create_test_exercise(id: &str, exercise_id: i64, order: u32) -> WorkoutExercise {
    WorkoutExercise {
        id: id.to_owned(),
        exercise: catalog_entry(exercise_id).summary(),
        order,
        notes: String::new(),
        sets: Vec::new(),
        created_at: Utc::now(),
    }
}

pub fn create_test_set(id: &str, set_number: u32, reps: u32, weight: Option<f64>) -> LoggedSet {
    LoggedSet {
        id: id.to_owned(),
        set_number,
        weight,
        reps,
        completed: true,
        rpe: None,
        created_at: Utc::now(),
    }
}
