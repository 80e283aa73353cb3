use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether score writes and profile reads can currently be served.
    pub store_available: bool,
}

impl HealthResponse {
    /// The ranked store answered its health check.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            store_available: true,
        }
    }

    /// No store is installed or it failed its health check. Reads answer empty leaderboards.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            store_available: false,
        }
    }
}
