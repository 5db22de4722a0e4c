use chrono::Utc;
use liftlog_core::NewSet;

use super::{BACK_SQUAT, OWNER, exercise, free_workout, routine_with, services};

#[tokio::test]
async fn test_dashboard_counts_today() {
    let s = services().await;
    routine_with(&s, &[BACK_SQUAT]).await;
    let workout = free_workout(&s).await;
    let detail = s.workouts.add_exercise(OWNER, &workout.id, exercise(BACK_SQUAT)).await.unwrap();
    let ex = detail.exercises[0].id.clone();
    s.workouts.add_set(OWNER, &workout.id, &ex, NewSet::new(5, Some(100.0))).await.unwrap();

    let stats = s.stats.dashboard_on(OWNER, Utc::now().date_naive()).await.unwrap();
    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.workouts_this_month, 1);
    assert!((stats.volume_this_month - 500.0).abs() < f64::EPSILON);
    assert_eq!(stats.active_routines, 1);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.recent.len(), 1);
}

#[tokio::test]
async fn test_dashboard_for_new_owner_is_empty() {
    let s = services().await;
    let stats = s.stats.dashboard("nobody").await.unwrap();
    assert_eq!(stats.total_workouts, 0);
    assert_eq!(stats.current_streak, 0);
    assert!(stats.recent.is_empty());
}
