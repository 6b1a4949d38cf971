//! Instance monitor
//!
//! Flags instances whose creation message is older than the grace period
//! but which still have no address allocated by the scheduler.
//!
//! ## Flow
//!
//! ```text
//! fetch INSTANCE messages → drop messages newer than now - 30min → lookup allocation (sequential) → MonitoringResult
//! ```
//!
//! Every call recomputes from scratch; nothing is remembered between runs.

use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use tracing::{debug, error, info, instrument, warn};

use crate::aleph::{AlephClient, AlephError, MessageFilter, MessageSource};
use crate::config::Config;
use crate::scheduler::{Allocation, AllocationLookup, SchedulerClient};

/// Age after which an instance must have an allocation.
pub const GRACE_PERIOD_MINUTES: i64 = 30;

pub fn grace_period() -> Duration {
    Duration::minutes(GRACE_PERIOD_MINUTES)
}

/// Outcome of a single monitoring pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringResult {
    pub status: StatusCode,
    pub message: String,
    pub instances_checked: usize,
    pub unallocated_instances: usize,
}

impl MonitoringResult {
    fn healthy(instances_checked: usize) -> Self {
        Self {
            status: StatusCode::OK,
            message: format!(
                "All instances ({instances_checked}) are either allocated or newer than {GRACE_PERIOD_MINUTES} minutes"
            ),
            instances_checked,
            unallocated_instances: 0,
        }
    }

    fn unallocated(instances_checked: usize, hashes: &[String]) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!(
                "Found {} unallocated instances older than {GRACE_PERIOD_MINUTES} minutes. Hashes: {}",
                hashes.len(),
                hashes.join(", ")
            ),
            instances_checked,
            unallocated_instances: hashes.len(),
        }
    }

    fn failed(err: &AlephError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Error monitoring instances: {err}"),
            instances_checked: 0,
            unallocated_instances: 0,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.is_success()
    }
}

/// Checks the instances of one owner (and optional channel).
#[derive(Clone)]
pub struct InstanceMonitor {
    messages: Arc<dyn MessageSource>,
    allocations: Arc<dyn AllocationLookup>,
    owner: String,
    channel: Option<String>,
}

impl InstanceMonitor {
    pub fn new(
        messages: Arc<dyn MessageSource>,
        allocations: Arc<dyn AllocationLookup>,
        owner: impl Into<String>,
        channel: Option<String>,
    ) -> Self {
        Self {
            messages,
            allocations,
            owner: owner.into(),
            channel,
        }
    }

    /// Wire the Aleph API and scheduler clients described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::new(
            Arc::new(AlephClient::new(client.clone(), &config.api_url)),
            Arc::new(SchedulerClient::new(client, &config.scheduler_url)),
            &config.owner,
            config.channel.clone(),
        ))
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Run a monitoring pass against the current time.
    pub async fn monitor(&self) -> MonitoringResult {
        self.monitor_at(Utc::now()).await
    }

    /// Run a monitoring pass as if the current time were `now`.
    ///
    /// Fetch failures are turned into a failed result, never propagated.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn monitor_at(&self, now: DateTime<Utc>) -> MonitoringResult {
        let result = match self.check(now).await {
            Ok(result) => result,
            Err(e) => {
                error!("monitoring failed: {e}");
                MonitoringResult::failed(&e)
            }
        };

        if result.is_healthy() {
            info!("{} instances checked, all healthy", result.instances_checked);
        } else if result.unallocated_instances > 0 {
            warn!(
                "{} of {} instances unallocated",
                result.unallocated_instances, result.instances_checked
            );
        }

        result
    }

    async fn check(&self, now: DateTime<Utc>) -> Result<MonitoringResult, AlephError> {
        let filter = MessageFilter::instances(&self.owner, self.channel.as_deref());
        let messages = self.messages.fetch_messages(&filter).await?;

        let threshold = now - grace_period();
        let mut unallocated = vec![];

        for message in &messages {
            if message.time >= threshold {
                continue;
            }

            match self.allocations.lookup(&message.item_hash).await {
                Allocation::Allocated(address) => {
                    debug!("{} allocated at {address}", message.item_hash);
                }
                Allocation::NotAllocated => {
                    debug!("{} not allocated", message.item_hash);
                    unallocated.push(message.item_hash.clone());
                }
            }
        }

        if unallocated.is_empty() {
            Ok(MonitoringResult::healthy(messages.len()))
        } else {
            Ok(MonitoringResult::unallocated(messages.len(), &unallocated))
        }
    }
}
