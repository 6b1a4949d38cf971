//! API error types and conversions

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::types::DetailResponse;
use crate::monitor::MonitoringResult;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
///
/// All variants render as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// A monitoring pass reported a failure (unallocated instances or a
    /// failed fetch)
    Monitoring { status: StatusCode, detail: String },

    /// Unknown route
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Monitoring { status, detail } => (status, detail),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
        };

        (status, Json(DetailResponse { detail })).into_response()
    }
}

impl From<MonitoringResult> for ApiError {
    fn from(result: MonitoringResult) -> Self {
        ApiError::Monitoring {
            status: result.status,
            detail: result.message,
        }
    }
}
