//! Service tests against the in-memory backend.

use std::sync::Arc;

use liftlog_core::{NewPrescription, NewRoutine, NewWorkout, NewWorkoutExercise, Routine, WorkoutDetail};
use liftlog_storage::StorageBackend;

use crate::{ExerciseService, RoutineService, StatsService, WorkoutService};

pub const OWNER: &str = "athlete";
pub const BENCH_PRESS: i64 = 1;
pub const DEADLIFT: i64 = 4;
pub const BACK_SQUAT: i64 = 8;

pub struct Services {
    pub exercises: ExerciseService,
    pub routines: RoutineService,
    pub workouts: WorkoutService,
    pub stats: StatsService,
}

pub async fn services() -> Services {
    let storage = Arc::new(StorageBackend::new_memory());
    let exercises = ExerciseService::new(Arc::clone(&storage));
    exercises.seed_builtin().await.unwrap();
    Services {
        exercises,
        routines: RoutineService::new(Arc::clone(&storage)),
        workouts: WorkoutService::new(Arc::clone(&storage)),
        stats: StatsService::new(storage),
    }
}

pub fn prescription(exercise_id: i64) -> NewPrescription {
    NewPrescription { exercise_id, order: None, target_sets: 3, target_reps: 8, notes: None }
}

pub fn exercise(exercise_id: i64) -> NewWorkoutExercise {
    NewWorkoutExercise { exercise_id, order: None, notes: None }
}

pub async fn routine_with(services: &Services, exercise_ids: &[i64]) -> Routine {
    let input = NewRoutine { name: "Full Body".to_owned(), ..Default::default() };
    let mut routine = services.routines.create_routine(OWNER, input).await.unwrap();
    for id in exercise_ids {
        routine =
            services.routines.add_prescription(OWNER, &routine.id, prescription(*id)).await.unwrap();
    }
    routine
}

pub async fn free_workout(services: &Services) -> WorkoutDetail {
    services.workouts.create_workout(OWNER, NewWorkout::default()).await.unwrap()
}

mod routine_tests;
mod stats_tests;
mod workout_tests;
