//! Typed API error for HTTP handlers.
//!
//! Converts service errors into HTTP responses with a JSON body and status code.
//! Handlers return `Result<Json<T>, ApiError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use liftlog_service::ServiceError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to `{"error": "message"}`; validation failures also carry
/// `"field"`. `Internal` logs the real error server-side and returns a static
/// message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: malformed body, query or header.
    BadRequest(String),
    /// 404 Not Found: id absent under its expected parent.
    NotFound(String),
    /// 409 Conflict: workout already finished.
    Conflict(String),
    /// 422 Unprocessable Entity: field-level validation failure.
    Validation { field: &'static str, message: String },
    /// 500 Internal Server Error: unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": msg})),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({"error": msg})),
            Self::Conflict(msg) => (StatusCode::CONFLICT, serde_json::json!({"error": msg})),
            Self::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({"error": message, "field": field}),
            ),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": "internal server error"}),
                )
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { field, message } => Self::Validation { field, message },
            ServiceError::NotFound { .. } => Self::NotFound(err.to_string()),
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::Storage(_) => Self::Internal(err.into()),
        }
    }
}
