use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the ranked store and report whether the backend can serve requests.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let reachable = match state.require_ranked_store().await {
        Ok(store) => match store.health_check().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "ranked store health check failed");
                false
            }
        },
        Err(_) => {
            warn!("ranked store unavailable (degraded mode)");
            false
        }
    };

    if reachable && !state.is_degraded() {
        HealthResponse::ok()
    } else {
        HealthResponse::degraded()
    }
}
