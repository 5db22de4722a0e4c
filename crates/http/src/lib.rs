//! HTTP API server for liftlog.
//!
//! Every mutating route returns the complete, freshly computed parent
//! aggregate so clients can replace their local copy wholesale.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(missing_debug_implementations, reason = "Internal types")]

pub mod api_error;
pub mod extract;
mod handlers;
mod query_types;
mod response_types;

use axum::{
    Json, Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use liftlog_core::AppConfig;
use liftlog_service::{ExerciseService, RoutineService, StatsService, WorkoutService};
use liftlog_storage::StorageBackend;

pub use api_error::ApiError;
pub use query_types::{ListQuery, StartWorkoutRequest};
pub use response_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Owner header name and fallback owner
    pub config: AppConfig,
    pub storage_kind: &'static str,
    pub exercise_service: Arc<ExerciseService>,
    pub routine_service: Arc<RoutineService>,
    pub workout_service: Arc<WorkoutService>,
    pub stats_service: Arc<StatsService>,
}

impl AppState {
    pub fn new(storage: Arc<StorageBackend>, config: AppConfig) -> Self {
        Self {
            config,
            storage_kind: storage.kind(),
            exercise_service: Arc::new(ExerciseService::new(Arc::clone(&storage))),
            routine_service: Arc::new(RoutineService::new(Arc::clone(&storage))),
            workout_service: Arc::new(WorkoutService::new(Arc::clone(&storage))),
            stats_service: Arc::new(StatsService::new(storage)),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/exercises", get(handlers::exercises::search_exercises))
        .route("/api/exercises/{id}", get(handlers::exercises::get_exercise))
        .route(
            "/api/routines",
            get(handlers::routines::list_routines).post(handlers::routines::create_routine),
        )
        .route(
            "/api/routines/{id}",
            get(handlers::routines::get_routine)
                .patch(handlers::routines::update_routine)
                .delete(handlers::routines::delete_routine),
        )
        .route("/api/routines/{id}/exercises", post(handlers::routines::add_prescription))
        .route(
            "/api/routines/{id}/exercises/{prescription_id}",
            patch(handlers::routines::update_prescription)
                .delete(handlers::routines::remove_prescription),
        )
        .route("/api/routines/{id}/start-workout", post(handlers::routines::start_workout))
        .route(
            "/api/workouts",
            get(handlers::workouts::list_workouts).post(handlers::workouts::create_workout),
        )
        .route(
            "/api/workouts/{id}",
            get(handlers::workouts::get_workout)
                .patch(handlers::workouts::update_workout)
                .delete(handlers::workouts::delete_workout),
        )
        .route("/api/workouts/{id}/exercises", post(handlers::workouts::add_exercise))
        .route(
            "/api/workouts/{id}/exercises/{exercise_id}",
            delete(handlers::workouts::remove_exercise),
        )
        .route(
            "/api/workouts/{id}/exercises/{exercise_id}/sets",
            post(handlers::workouts::add_set),
        )
        .route(
            "/api/workouts/{id}/exercises/{exercise_id}/sets/{set_id}",
            patch(handlers::workouts::update_set).delete(handlers::workouts::remove_set),
        )
        .route("/api/workouts/{id}/finish", post(handlers::workouts::finish_workout))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_owned(),
        storage: state.storage_kind.to_owned(),
    })
}
