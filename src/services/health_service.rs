use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the store answers, logging connectivity issues.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = state.store();
    if let Err(err) = store.health_check().await {
        warn!(error = %err, "storage health check failed");
        return HealthResponse::degraded();
    }

    match store.list_minigames().await {
        Ok(minigames) => HealthResponse::ok(minigames.len()),
        Err(err) => {
            warn!(error = %err, "storage listing failed");
            HealthResponse::degraded()
        }
    }
}
