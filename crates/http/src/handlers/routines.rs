use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use liftlog_core::{
    NewPrescription, NewRoutine, PaginatedResult, PrescriptionPatch, Routine, RoutinePatch,
    RoutineSummary, WorkoutDetail,
};

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::{ApiJson, ApiQuery, Owner};
use crate::query_types::{ListQuery, StartWorkoutRequest};

pub async fn list_routines(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<PaginatedResult<RoutineSummary>>, ApiError> {
    let page = state.routine_service.list_routines(&owner, query.offset, query.limit).await?;
    Ok(Json(page))
}

pub async fn create_routine(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    ApiJson(input): ApiJson<NewRoutine>,
) -> Result<(StatusCode, Json<Routine>), ApiError> {
    let routine = state.routine_service.create_routine(&owner, input).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

pub async fn get_routine(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<Routine>, ApiError> {
    Ok(Json(state.routine_service.get_routine(&owner, &id).await?))
}

pub async fn update_routine(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<RoutinePatch>,
) -> Result<Json<Routine>, ApiError> {
    Ok(Json(state.routine_service.update_routine(&owner, &id, patch).await?))
}

pub async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.routine_service.delete_routine(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_prescription(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<NewPrescription>,
) -> Result<Json<Routine>, ApiError> {
    Ok(Json(state.routine_service.add_prescription(&owner, &id, input).await?))
}

pub async fn update_prescription(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path((id, prescription_id)): Path<(String, String)>,
    ApiJson(patch): ApiJson<PrescriptionPatch>,
) -> Result<Json<Routine>, ApiError> {
    let routine =
        state.routine_service.update_prescription(&owner, &id, &prescription_id, patch).await?;
    Ok(Json(routine))
}

pub async fn remove_prescription(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path((id, prescription_id)): Path<(String, String)>,
) -> Result<Json<Routine>, ApiError> {
    Ok(Json(state.routine_service.remove_prescription(&owner, &id, &prescription_id).await?))
}

pub async fn start_workout(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StartWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutDetail>), ApiError> {
    let workout = state.workout_service.start_from_routine(&owner, &id, req.notes).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}
