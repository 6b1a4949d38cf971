//! Aleph message types as returned by `/api/v0/messages.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Aleph message type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Post,
    Aggregate,
    Store,
    Program,
    Instance,
    Forget,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Post => "POST",
            MessageType::Aggregate => "AGGREGATE",
            MessageType::Store => "STORE",
            MessageType::Program => "PROGRAM",
            MessageType::Instance => "INSTANCE",
            MessageType::Forget => "FORGET",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message announcing the creation of an instance.
///
/// Only the fields the monitor reads are decoded; the rest of the message
/// (content, signature, confirmations) is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InstanceMessage {
    pub item_hash: String,

    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,

    pub sender: String,

    #[serde(rename = "type")]
    pub message_type: MessageType,

    #[serde(default)]
    pub channel: Option<String>,
}

/// Page of messages from the Aleph API
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<InstanceMessage>,

    #[serde(default)]
    pub pagination_total: Option<u64>,
}

impl MessagesResponse {
    /// More messages match the query than this page holds.
    pub fn is_truncated(&self) -> bool {
        self.pagination_total
            .is_some_and(|total| total > self.messages.len() as u64)
    }
}

/// Filter applied to message queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub addresses: Vec<String>,
    pub message_types: Vec<MessageType>,
    pub channels: Vec<String>,
}

impl MessageFilter {
    /// Filter for the instances owned by `owner`, optionally in `channel`.
    pub fn instances(owner: &str, channel: Option<&str>) -> Self {
        Self {
            addresses: vec![owner.to_string()],
            message_types: vec![MessageType::Instance],
            channels: channel.map(|c| vec![c.to_string()]).unwrap_or_default(),
        }
    }

    /// Query parameters understood by the Aleph API. Empty lists are omitted.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];

        if !self.addresses.is_empty() {
            params.push(("addresses", self.addresses.join(",")));
        }

        if !self.message_types.is_empty() {
            let types = self
                .message_types
                .iter()
                .map(MessageType::as_str)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("msgTypes", types));
        }

        if !self.channels.is_empty() {
            params.push(("channels", self.channels.join(",")));
        }

        params
    }
}

/// The API serves `time` as epoch seconds; newer nodes may send RFC 3339.
fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Epoch(f64),
        Text(String),
    }

    match RawTime::deserialize(deserializer)? {
        RawTime::Epoch(secs) => {
            let millis = (secs * 1000.0).round() as i64;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}")))
        }
        RawTime::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|time| time.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
    }
}
