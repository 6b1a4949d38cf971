pub mod aleph;
pub mod config;
pub mod monitor;
pub mod scheduler;
pub mod telemetry;

#[cfg(feature = "api")]
pub mod api;

pub use config::Config;
pub use monitor::{InstanceMonitor, MonitoringResult};
pub use scheduler::Allocation;
