pub mod health;
pub mod instances;

use crate::api::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
