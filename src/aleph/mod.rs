//! Client for the Aleph message network.

pub mod client;
pub mod messages;

pub use client::{AlephClient, AlephError};
pub use messages::{InstanceMessage, MessageFilter, MessageType};

use async_trait::async_trait;

/// Source of instance messages
///
/// Implemented by [`AlephClient`]; tests substitute in-memory sources.
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn fetch_messages(
        &self,
        filter: &MessageFilter,
    ) -> Result<Vec<InstanceMessage>, AlephError>;
}
