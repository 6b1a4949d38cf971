//! Helper functions for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use libertai_monitoring::aleph::{
    AlephError, InstanceMessage, MessageFilter, MessageSource, MessageType,
};
use libertai_monitoring::scheduler::{Allocation, AllocationLookup};
use reqwest::StatusCode;

pub fn instance_message(hash: &str, age: Duration) -> InstanceMessage {
    InstanceMessage {
        item_hash: hash.to_string(),
        time: Utc::now() - age,
        sender: "0xOwner".to_string(),
        message_type: MessageType::Instance,
        channel: Some("libertai".to_string()),
    }
}

/// JSON message as served by `/api/v0/messages.json`
pub fn message_json(hash: &str, time: DateTime<Utc>) -> serde_json::Value {
    let epoch = time.timestamp_millis() as f64 / 1000.0;
    serde_json::json!({
        "item_hash": hash,
        "time": epoch,
        "sender": "0xOwner",
        "chain": "ETH",
        "type": "INSTANCE",
        "channel": "libertai",
        "content": {
            "address": "0xOwner",
            "time": epoch
        }
    })
}

pub fn messages_page(messages: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "pagination_page": 1,
        "pagination_total": messages.len(),
        "pagination_per_page": 200,
        "pagination_item": "messages",
        "messages": messages,
    })
}

/// In-memory message source that records the filters it was queried with
#[derive(Default)]
pub struct StaticMessages {
    pub messages: Vec<InstanceMessage>,
    pub filters: Mutex<Vec<MessageFilter>>,
}

impl StaticMessages {
    pub fn new(messages: Vec<InstanceMessage>) -> Arc<Self> {
        Arc::new(Self {
            messages,
            filters: Mutex::new(vec![]),
        })
    }
}

#[async_trait]
impl MessageSource for StaticMessages {
    async fn fetch_messages(
        &self,
        filter: &MessageFilter,
    ) -> Result<Vec<InstanceMessage>, AlephError> {
        self.filters.lock().unwrap().push(filter.clone());
        Ok(self.messages.clone())
    }
}

/// Message source whose every fetch fails with a 503
pub struct UnavailableMessages;

#[async_trait]
impl MessageSource for UnavailableMessages {
    async fn fetch_messages(
        &self,
        _filter: &MessageFilter,
    ) -> Result<Vec<InstanceMessage>, AlephError> {
        Err(AlephError::Status {
            url: "http://aleph.test/api/v0/messages.json".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}

/// Allocation lookup backed by a map; records every hash it is asked about
#[derive(Default)]
pub struct RecordingLookup {
    addresses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingLookup {
    pub fn with_allocations(allocations: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            addresses: allocations
                .iter()
                .map(|(hash, ip)| (hash.to_string(), ip.to_string()))
                .collect(),
            calls: Mutex::new(vec![]),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AllocationLookup for RecordingLookup {
    async fn lookup(&self, item_hash: &str) -> Allocation {
        self.calls.lock().unwrap().push(item_hash.to_string());
        match self.addresses.get(item_hash) {
            Some(address) => Allocation::Allocated(address.clone()),
            None => Allocation::NotAllocated,
        }
    }
}
