use std::time::Duration;

use chrono::Utc;
use liftlog_core::{NewSet, Workout, WorkoutDetail, WorkoutPatch};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::LiftlogClient;
use crate::error::ClientError;
use crate::handle::WorkoutHandle;

fn detail(notes: &str) -> WorkoutDetail {
    let mut workout =
        Workout::new("w1".to_owned(), "athlete".to_owned(), None, None, Utc::now());
    workout.notes = notes.to_owned();
    WorkoutDetail::from(&workout)
}

async fn open_handle(server: &MockServer, timeout: Duration) -> WorkoutHandle {
    Mock::given(method("GET"))
        .and(path("/api/workouts/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail("loaded")))
        .mount(server)
        .await;
    let client = LiftlogClient::with_timeout(&server.uri(), timeout).unwrap();
    WorkoutHandle::open(client, "w1").await.unwrap()
}

fn notes(text: &str) -> WorkoutPatch {
    WorkoutPatch { notes: Some(text.to_owned()), ..WorkoutPatch::default() }
}

#[tokio::test]
async fn test_success_replaces_local_copy() {
    let server = MockServer::start().await;
    let mut handle = open_handle(&server, Duration::from_secs(5)).await;
    Mock::given(method("PATCH"))
        .and(path("/api/workouts/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail("heavy day")))
        .mount(&server)
        .await;

    let updated = handle.update(&notes("heavy day")).await.unwrap();
    assert_eq!(updated.notes, "heavy day");
    assert_eq!(handle.workout().notes, "heavy day");
    assert!(!handle.is_stale());
}

#[tokio::test]
async fn test_domain_error_leaves_copy_untouched() {
    let server = MockServer::start().await;
    let mut handle = open_handle(&server, Duration::from_secs(5)).await;
    Mock::given(method("POST"))
        .and(path("/api/workouts/w1/exercises/e1/sets"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "workout is finished"})),
        )
        .mount(&server)
        .await;

    let err = handle.add_set("e1", &NewSet::new(5, None)).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(handle.workout().notes, "loaded");
    assert!(!handle.is_stale());
}

#[tokio::test]
async fn test_transport_failure_marks_stale_until_refresh() {
    let server = MockServer::start().await;
    let mut handle = open_handle(&server, Duration::from_millis(100)).await;
    Mock::given(method("PATCH"))
        .and(path("/api/workouts/w1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(detail("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = handle.update(&notes("late")).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(handle.is_stale());
    assert_eq!(handle.workout().notes, "loaded");

    // Refused locally; the mock's expect(1) proves no second request went out.
    let err = handle.update(&notes("again")).await.unwrap_err();
    assert!(matches!(err, ClientError::Stale(ref id) if id == "w1"));

    handle.refresh().await.unwrap();
    assert!(!handle.is_stale());
}

#[tokio::test]
async fn test_dropped_request_marks_stale() {
    let server = MockServer::start().await;
    let mut handle = open_handle(&server, Duration::from_secs(5)).await;
    Mock::given(method("POST"))
        .and(path("/api/workouts/w1/finish"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(detail("finished"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let abandoned = tokio::time::timeout(Duration::from_millis(50), handle.finish()).await;
    assert!(abandoned.is_err());
    assert!(handle.is_stale());
    assert_eq!(handle.workout().notes, "loaded");
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale() {
    let server = MockServer::start().await;
    let mut handle = open_handle(&server, Duration::from_millis(100)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/workouts/w1/exercises/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = handle.remove_exercise("e1").await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
    assert!(handle.is_stale());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/workouts/w1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    assert!(handle.refresh().await.is_err());
    assert!(handle.is_stale());
}

#[tokio::test]
async fn test_server_failure_marks_stale() {
    let server = MockServer::start().await;
    let mut handle = open_handle(&server, Duration::from_secs(5)).await;
    Mock::given(method("POST"))
        .and(path("/api/workouts/w1/exercises/e1/sets"))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
        .expect(1)
        .mount(&server)
        .await;

    let err = handle.add_set("e1", &NewSet::new(8, Some(80.0))).await.unwrap_err();
    assert!(matches!(err, ClientError::HttpStatus { code: 504, .. }));
    assert!(handle.is_stale());

    // The set may already be stored; a blind re-send must not go out.
    let err = handle.add_set("e1", &NewSet::new(8, Some(80.0))).await.unwrap_err();
    assert!(matches!(err, ClientError::Stale(_)));

    handle.refresh().await.unwrap();
    assert!(!handle.is_stale());
}
