//! HTTP API for the monitoring service
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /agent-instances` - Run a monitoring pass; 200 when every stale
//!   instance is allocated, 500 otherwise

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;
pub use types::{DetailResponse, HealthResponse};

use std::future::Future;
use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the router with all routes
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/agent-instances", get(routes::instances::check_instances))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Spawn the API server
///
/// This starts an Axum HTTP server in a background task that stops accepting
/// connections once `shutdown` resolves and finishes when in-flight requests
/// are answered. Returns the server's local address and the task handle.
pub async fn spawn_api_server<F>(
    bind_addr: SocketAddr,
    state: ApiState,
    shutdown: F,
) -> anyhow::Result<(SocketAddr, JoinHandle<()>)>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("starting API server on {bind_addr}");

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {addr}");

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!("API server error: {e}");
        }
        info!("API server stopped");
    });

    Ok((addr, handle))
}
