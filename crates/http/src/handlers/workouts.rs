use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use liftlog_core::{
    NewSet, NewWorkout, NewWorkoutExercise, PaginatedResult, SetPatch, WorkoutDetail,
    WorkoutPatch, WorkoutSummary,
};

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::{ApiJson, ApiQuery, Owner};
use crate::query_types::ListQuery;

pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<PaginatedResult<WorkoutSummary>>, ApiError> {
    let page = state.workout_service.list_workouts(&owner, query.offset, query.limit).await?;
    Ok(Json(page))
}

pub async fn create_workout(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    ApiJson(input): ApiJson<NewWorkout>,
) -> Result<(StatusCode, Json<WorkoutDetail>), ApiError> {
    let workout = state.workout_service.create_workout(&owner, input).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn get_workout(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.get_workout(&owner, &id).await?))
}

pub async fn update_workout(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<WorkoutPatch>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.update_workout(&owner, &id, patch).await?))
}

pub async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.workout_service.delete_workout(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_exercise(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NewWorkoutExercise>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.add_exercise(&owner, &id, input).await?))
}

pub async fn remove_exercise(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path((id, exercise_id)): Path<(String, String)>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.remove_exercise(&owner, &id, &exercise_id).await?))
}

pub async fn add_set(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path((id, exercise_id)): Path<(String, String)>,
    ApiJson(input): ApiJson<NewSet>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.add_set(&owner, &id, &exercise_id, input).await?))
}

pub async fn update_set(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path((id, exercise_id, set_id)): Path<(String, String, String)>,
    ApiJson(patch): ApiJson<SetPatch>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    let workout =
        state.workout_service.update_set(&owner, &id, &exercise_id, &set_id, patch).await?;
    Ok(Json(workout))
}

pub async fn remove_set(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path((id, exercise_id, set_id)): Path<(String, String, String)>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.remove_set(&owner, &id, &exercise_id, &set_id).await?))
}

pub async fn finish_workout(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<WorkoutDetail>, ApiError> {
    Ok(Json(state.workout_service.finish_workout(&owner, &id).await?))
}
