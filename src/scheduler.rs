//! Allocation lookups against the Aleph scheduler.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

/// Allocation state of an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// The scheduler assigned this IPv6 address
    Allocated(String),

    /// No address, or the scheduler could not be asked
    NotAllocated,
}

/// Resolves the allocation of an instance by its item hash.
#[async_trait]
pub trait AllocationLookup: Send + Sync {
    async fn lookup(&self, item_hash: &str) -> Allocation;
}

#[derive(Debug, Deserialize)]
struct AllocationResponse {
    #[serde(default)]
    vm_ipv6: Option<String>,
}

/// HTTP client for `/api/v0/allocation/{item_hash}`
///
/// Every failure (non-2xx, connection error, timeout, undecodable body) is
/// reported as [`Allocation::NotAllocated`]. Callers cannot tell a scheduler
/// outage from an instance that was never allocated.
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    client: Client,
    scheduler_url: String,
}

impl SchedulerClient {
    pub fn new(client: Client, scheduler_url: impl Into<String>) -> Self {
        Self {
            client,
            scheduler_url: scheduler_url.into(),
        }
    }

    fn allocation_url(&self, item_hash: &str) -> String {
        format!("{}/api/v0/allocation/{item_hash}", self.scheduler_url)
    }
}

#[async_trait]
impl AllocationLookup for SchedulerClient {
    #[instrument(skip(self))]
    async fn lookup(&self, item_hash: &str) -> Allocation {
        let url = self.allocation_url(item_hash);
        trace!("{url}: requesting allocation");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{url}: error during request: {e}");
                return Allocation::NotAllocated;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("{url}: scheduler responded with {status}");
            return Allocation::NotAllocated;
        }

        match response.json::<AllocationResponse>().await {
            Ok(AllocationResponse {
                vm_ipv6: Some(address),
            }) => Allocation::Allocated(address),
            Ok(_) => {
                debug!("{url}: allocation has no IPv6 address");
                Allocation::NotAllocated
            }
            Err(e) => {
                warn!("{url}: error while trying to parse the allocation: {e}");
                Allocation::NotAllocated
            }
        }
    }
}
