//! API shared state

use std::sync::Arc;

use crate::monitor::InstanceMonitor;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    pub monitor: Arc<InstanceMonitor>,
}

impl ApiState {
    pub fn new(monitor: InstanceMonitor) -> Self {
        Self {
            monitor: Arc::new(monitor),
        }
    }
}
