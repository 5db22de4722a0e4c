use liftlog_core::{NewSet, NewWorkout, NewWorkoutExercise, SetPatch, WorkoutPatch, WorkoutState};

use super::{BACK_SQUAT, BENCH_PRESS, DEADLIFT, OWNER, exercise, free_workout, routine_with, services};
use crate::ServiceError;

#[tokio::test]
async fn test_two_sets_volume_scenario() {
    let s = services().await;
    let workout = free_workout(&s).await;
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let ex = detail.exercises[0].id.clone();

    s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(10, Some(60.0))).await.unwrap();
    let detail = s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(8, Some(60.0))).await.unwrap();

    assert!((detail.exercises[0].total_volume - 1080.0).abs() < f64::EPSILON);
    assert!((detail.total_volume - 1080.0).abs() < f64::EPSILON);
    assert_eq!(detail.total_sets, 2);
    let numbers: Vec<u32> = detail.exercises[0].sets.iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_weightless_sets_count_without_volume() {
    let s = services().await;
    let workout = free_workout(&s).await;
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BENCH_PRESS)).await.unwrap();
    let ex = detail.exercises[0].id.clone();

    s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(12, None)).await.unwrap();
    let detail = s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(5, Some(80.0))).await.unwrap();

    assert_eq!(detail.total_sets, 2);
    assert!((detail.total_volume - 400.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_instantiate_copies_routine_in_order() {
    let s = services().await;
    let routine = routine_with(&s, &[DEADLIFT, BENCH_PRESS, BACK_SQUAT]).await;

    let started = s.workouts.start_from_routine(OWNER, &routine.id, None).await.unwrap();
    let fetched = s.workouts.get_workout(OWNER, &started.id).await.unwrap();

    let routine_refs: Vec<(i64, u32)> =
        routine.exercises.iter().map(|p| (p.exercise.id, p.order)).collect();
    let workout_refs: Vec<(i64, u32)> =
        fetched.exercises.iter().map(|e| (e.exercise.id, e.order)).collect();
    assert_eq!(workout_refs, routine_refs);
    assert!(fetched.exercises.iter().all(|e| e.sets.is_empty()));
    assert_eq!(fetched.routine_id.as_deref(), Some(routine.id.as_str()));
    assert_eq!(fetched.routine_name.as_deref(), Some("Full Body"));
    assert_eq!(fetched.state, WorkoutState::Open);
}

#[tokio::test]
async fn test_create_with_unknown_routine_is_not_found() {
    let s = services().await;
    let input = NewWorkout { routine_id: Some("missing".to_owned()), ..Default::default() };
    let err = s.workouts.create_workout(OWNER, input).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "routine", .. }));
}

#[tokio::test]
async fn test_finish_twice_is_conflict_and_keeps_end_time() {
    let s = services().await;
    let workout = free_workout(&s).await;

    let finished = s.workouts.finish_workout(OWNER, &workout.id).await.unwrap();
    assert_eq!(finished.state, WorkoutState::Finished);
    assert!(finished.end_time >= finished.start_time);

    let err = s.workouts.finish_workout(OWNER, &workout.id).await.unwrap_err();
    assert!(err.is_conflict());
    let after = s.workouts.get_workout(OWNER, &workout.id).await.unwrap();
    assert_eq!(after.end_time, finished.end_time);
}

#[tokio::test]
async fn test_structural_edits_on_finished_workout_conflict() {
    let s = services().await;
    let workout = free_workout(&s).await;
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let ex = detail.exercises[0].id.clone();
    let detail = s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(5, Some(100.0))).await.unwrap();
    let set_id = detail.exercises[0].sets[0].id.clone();
    let before = s.workouts.finish_workout(OWNER, &workout.id).await.unwrap();

    let add_set = s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(5, None)).await;
    let remove_set = s.workouts.remove_set(OWNER, &workout.id, &ex, &set_id).await;
    let add_ex = s.workouts.add_exercise(OWNER, &workout.id, exercise(DEADLIFT)).await;
    let remove_ex = s.workouts.remove_exercise(OWNER, &workout.id, &ex).await;
    let edit = s.workouts.update_set(OWNER, &workout.id, &ex, &set_id, SetPatch::default()).await;
    for result in [add_set, remove_set, add_ex, remove_ex, edit] {
        assert!(result.unwrap_err().is_conflict());
    }

    let after = s.workouts.get_workout(OWNER, &workout.id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_header_edit_allowed_after_finish() {
    let s = services().await;
    let workout = free_workout(&s).await;
    s.workouts.finish_workout(OWNER, &workout.id).await.unwrap();

    let patch = WorkoutPatch { notes: Some("felt strong".to_owned()), ..Default::default() };
    let updated = s.workouts.update_workout(OWNER, &workout.id, patch).await.unwrap();
    assert_eq!(updated.notes, "felt strong");
    assert!(updated.is_finished());
}

#[tokio::test]
async fn test_remove_set_under_wrong_exercise_is_not_found() {
    let s = services().await;
    let workout = free_workout(&s).await;
    s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BENCH_PRESS)).await.unwrap();
    let (squat, bench) = (detail.exercises[0].id.clone(), detail.exercises[1].id.clone());
    let detail = s.workouts.add_set(OWNER, &workout.id, &squat, NewSet::new(5, Some(100.0))).await.unwrap();
    let set_id = detail.exercises[0].sets[0].id.clone();

    let err = s.workouts.remove_set(OWNER, &workout.id, &bench, &set_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "set", .. }));

    let still = s.workouts.get_workout(OWNER, &workout.id).await.unwrap();
    assert_eq!(still, detail);
}

#[tokio::test]
async fn test_set_validation() {
    let s = services().await;
    let workout = free_workout(&s).await;
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let ex = detail.exercises[0].id.clone();

    let missing_reps = NewSet { weight: Some(50.0), ..Default::default() };
    let err = s.workouts.add_set(OWNER, &workout.id, &ex, missing_reps).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "reps", .. }));

    let bad_rpe = NewSet { rpe: Some(11), ..NewSet::new(5, None) };
    let err = s.workouts.add_set(OWNER, &workout.id, &ex, bad_rpe).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "rpe", .. }));

    let negative = NewSet::new(5, Some(-1.0));
    let err = s.workouts.add_set(OWNER, &workout.id, &ex, negative).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "weight", .. }));

    let unchanged = s.workouts.get_workout(OWNER, &workout.id).await.unwrap();
    assert_eq!(unchanged.total_sets, 0);
}

#[tokio::test]
async fn test_update_set_clears_weight() {
    let s = services().await;
    let workout = free_workout(&s).await;
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let ex = detail.exercises[0].id.clone();
    let detail = s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(5, Some(100.0))).await.unwrap();
    let set_id = detail.exercises[0].sets[0].id.clone();

    let patch = SetPatch { weight: Some(None), rpe: Some(Some(7)), ..Default::default() };
    let detail = s.workouts.update_set(OWNER, &workout.id, &ex, &set_id, patch).await.unwrap();
    let set = &detail.exercises[0].sets[0];
    assert_eq!(set.weight, None);
    assert_eq!(set.rpe, Some(7));
    assert_eq!(set.reps, 5);
    assert!(detail.total_volume.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_order_after_removal_skips_taken_slot() {
    let s = services().await;
    let workout = free_workout(&s).await;
    s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BENCH_PRESS)).await.unwrap();
    let first = detail.exercises[0].id.clone();
    s.workouts.remove_exercise(OWNER, &workout.id, &first).await.unwrap();

    // one exercise left at order 1, so the default slot (count = 1) is taken
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(DEADLIFT)).await.unwrap();
    let orders: Vec<u32> = detail.exercises.iter().map(|e| e.order).collect();
    assert_eq!(orders, vec![1, 2]);

    let explicit = NewWorkoutExercise { order: Some(2), ..exercise(BACK_SQUAT) };
    let err = s.workouts.add_exercise(OWNER, &workout.id, explicit).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "order", .. }));
}

#[tokio::test]
async fn test_list_and_delete() {
    let s = services().await;
    let workout = free_workout(&s).await;
    free_workout(&s).await;

    let page = s.workouts.list_workouts(OWNER, 0, Some(1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);

    s.workouts.delete_workout(OWNER, &workout.id).await.unwrap();
    assert!(s.workouts.get_workout(OWNER, &workout.id).await.unwrap_err().is_not_found());
    assert!(s.workouts.delete_workout(OWNER, &workout.id).await.unwrap_err().is_not_found());
}
