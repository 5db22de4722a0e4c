use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use liftlog_core::DashboardStats;

use crate::AppState;
use crate::api_error::ApiError;
use crate::extract::Owner;

pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Owner(owner): Owner,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.stats_service.dashboard(&owner).await?))
}
