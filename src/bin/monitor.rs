use libertai_monitoring::{
    Config, InstanceMonitor,
    api::{ApiState, spawn_api_server},
    telemetry::init_tracing,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;

    info!(
        "monitoring instances of {} (channel: {})",
        config.owner,
        config.channel.as_deref().unwrap_or("any")
    );
    if config.channel.is_none() {
        warn!("ALEPH_AGENT_CHANNEL is not set, instances from every channel are checked");
    }

    let monitor = InstanceMonitor::from_config(&config)?;
    let (addr, server) =
        spawn_api_server(config.bind_addr, ApiState::new(monitor), shutdown_signal()).await?;
    info!("serving on http://{addr}");

    server.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down, waiting for in-flight requests");
}
