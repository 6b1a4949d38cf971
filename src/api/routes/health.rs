//! Health check endpoint

use crate::api::types::HealthResponse;
use axum::Json;

/// GET /health
///
/// Liveness only; does not touch the Aleph API or the scheduler.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "LibertAI Monitoring Service is running".to_string(),
    })
}
