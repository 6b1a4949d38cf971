//! Instance allocation endpoint

use axum::{Json, extract::State};
use tracing::instrument;

use crate::api::{ApiResult, ApiState, types::DetailResponse};

/// GET /agent-instances
///
/// Runs a monitoring pass. The response status mirrors the result status
/// and the body is `{"detail": <message>}` in both cases, so uptime checkers
/// only need to look at the status code.
#[instrument(skip_all)]
pub async fn check_instances(State(state): State<ApiState>) -> ApiResult<Json<DetailResponse>> {
    let result = state.monitor.monitor().await;

    if result.is_healthy() {
        Ok(Json(DetailResponse {
            detail: result.message,
        }))
    } else {
        Err(result.into())
    }
}
