use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

use liftlog_core::{Exercise, ExerciseFilter, ExerciseId};

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::ApiQuery;

pub async fn search_exercises(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<ExerciseFilter>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    Ok(Json(state.exercise_service.search(&filter).await?))
}

pub async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ExerciseId>,
) -> Result<Json<Exercise>, ApiError> {
    Ok(Json(state.exercise_service.get(id).await?))
}
