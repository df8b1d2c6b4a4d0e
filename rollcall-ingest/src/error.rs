//! Error types for rollcall-ingest

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::reconcile::ConflictError;

/// API error type
///
/// Status codes follow what the spreadsheet-side exporter already expects:
/// 400 for a malformed body it can fix, 500 for everything else. Conflict
/// and NotFound are therefore surfaced as 500 even though 409/404 would be
/// the closer fit — the exporter only distinguishes ok from not-ok, and the
/// error code in the body carries the detail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Ambiguous roster batch (surfaced as 500, code CONFLICT)
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Requested data does not exist yet (surfaced as 500, code NOT_FOUND)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// rollcall-common error
    #[error("Common error: {0}")]
    Common(#[from] rollcall_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFLICT",
                err.to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "NOT_FOUND", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
