use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// Health response for an operational server.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
