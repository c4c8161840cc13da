use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of minigames known to the store, when it answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minigames: Option<usize>,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(minigames: usize) -> Self {
        Self {
            status: "ok".to_string(),
            minigames: Some(minigames),
        }
    }

    /// Create a health response indicating the store did not answer.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            minigames: None,
        }
    }
}
