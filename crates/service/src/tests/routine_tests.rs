use liftlog_core::{NewPrescription, NewRoutine, PrescriptionPatch, RoutinePatch};

use super::{BACK_SQUAT, BENCH_PRESS, DEADLIFT, OWNER, prescription, routine_with, services};
use crate::ServiceError;

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let s = services().await;
    let input = NewRoutine { name: "   ".to_owned(), ..Default::default() };
    let err = s.routines.create_routine(OWNER, input).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "name", .. }));
}

#[tokio::test]
async fn test_prescriptions_get_sequential_orders() {
    let s = services().await;
    let routine = routine_with(&s, &[BACK_SQUAT, BENCH_PRESS, DEADLIFT]).await;

    let orders: Vec<u32> = routine.exercises.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(routine.exercises[1].exercise.name, "Bench Press");
    assert_eq!(routine.summary().estimated_duration, 27);
}

#[tokio::test]
async fn test_duplicate_exercise_is_validation_error() {
    let s = services().await;
    let routine = routine_with(&s, &[BACK_SQUAT]).await;

    let err =
        s.routines.add_prescription(OWNER, &routine.id, prescription(BACK_SQUAT)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "exercise_id", .. }));

    let unchanged = s.routines.get_routine(OWNER, &routine.id).await.unwrap();
    assert_eq!(unchanged.exercises.len(), 1);
}

#[tokio::test]
async fn test_unknown_exercise_and_bad_targets() {
    let s = services().await;
    let routine = routine_with(&s, &[]).await;

    let err = s.routines.add_prescription(OWNER, &routine.id, prescription(999)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "exercise", .. }));

    let zero_sets = NewPrescription { target_sets: 0, ..prescription(BENCH_PRESS) };
    let err = s.routines.add_prescription(OWNER, &routine.id, zero_sets).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "target_sets", .. }));
}

#[tokio::test]
async fn test_update_and_remove_prescription() {
    let s = services().await;
    let routine = routine_with(&s, &[BACK_SQUAT, BENCH_PRESS]).await;
    let squat = routine.exercises[0].id.clone();

    let patch = PrescriptionPatch { target_reps: Some(5), notes: Some("belt".to_owned()), ..Default::default() };
    let updated = s.routines.update_prescription(OWNER, &routine.id, &squat, patch).await.unwrap();
    assert_eq!(updated.exercises[0].target_reps, 5);
    assert_eq!(updated.exercises[0].notes, "belt");

    let clash = PrescriptionPatch { order: Some(1), ..Default::default() };
    let err = s.routines.update_prescription(OWNER, &routine.id, &squat, clash).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { field: "order", .. }));

    let removed = s.routines.remove_prescription(OWNER, &routine.id, &squat).await.unwrap();
    assert_eq!(removed.exercises.len(), 1);
    let err = s.routines.remove_prescription(OWNER, &routine.id, &squat).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_header_and_delete() {
    let s = services().await;
    let routine = routine_with(&s, &[]).await;

    let patch = RoutinePatch { is_active: Some(false), name: Some("Deload".to_owned()), ..Default::default() };
    let updated = s.routines.update_routine(OWNER, &routine.id, patch).await.unwrap();
    assert_eq!(updated.name, "Deload");
    assert!(!updated.is_active);

    let page = s.routines.list_routines(OWNER, 0, None).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name, "Deload");

    s.routines.delete_routine(OWNER, &routine.id).await.unwrap();
    assert!(s.routines.get_routine(OWNER, &routine.id).await.unwrap_err().is_not_found());
    assert!(s.routines.delete_routine(OWNER, &routine.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_routines_are_owner_scoped() {
    let s = services().await;
    let routine = routine_with(&s, &[]).await;

    let err = s.routines.get_routine("intruder", &routine.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(s.routines.list_routines("intruder", 0, None).await.unwrap().total, 0);
}
