use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

use super::MessageSource;
use super::messages::{InstanceMessage, MessageFilter, MessagesResponse};

/// Page size requested from the API; only the first page is read.
pub const PAGE_SIZE: u32 = 200;

#[derive(Debug, Error)]
pub enum AlephError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },

    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client for the Aleph message API
#[derive(Debug, Clone)]
pub struct AlephClient {
    client: Client,
    api_url: String,
}

impl AlephClient {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Fetch the first page of messages matching `filter`.
    #[instrument(skip(self))]
    pub async fn get_messages(
        &self,
        filter: &MessageFilter,
    ) -> Result<Vec<InstanceMessage>, AlephError> {
        let url = format!("{}/api/v0/messages.json", self.api_url);

        let mut params = filter.query_params();
        params.push(("pagination", PAGE_SIZE.to_string()));
        params.push(("page", "1".to_string()));

        trace!("{url}: requesting messages");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| AlephError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AlephError::Status { url, status });
        }

        let page = response
            .json::<MessagesResponse>()
            .await
            .map_err(|source| AlephError::Decode {
                url: url.clone(),
                source,
            })?;

        debug!(
            "{url}: received {} messages (total: {:?})",
            page.messages.len(),
            page.pagination_total
        );

        if page.is_truncated() {
            warn!(
                "{url}: only the first {} of {:?} messages are checked",
                page.messages.len(),
                page.pagination_total
            );
        }

        Ok(page.messages)
    }
}

#[async_trait]
impl MessageSource for AlephClient {
    async fn fetch_messages(
        &self,
        filter: &MessageFilter,
    ) -> Result<Vec<InstanceMessage>, AlephError> {
        self.get_messages(filter).await
    }
}
