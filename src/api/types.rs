//! API response types

use serde::{Deserialize, Serialize};

/// Response for GET /health
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body of every monitoring response, successful or not
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailResponse {
    pub detail: String,
}
