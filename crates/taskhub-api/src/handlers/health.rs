//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = match state.stores.health_check().await {
        Ok(true) => "ok",
        Ok(false) => "degraded",
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ws_connections: state.gateway.connection_count(),
        online_users: state.gateway.registry().online_count(),
        realtime: state.gateway.metrics(),
    })
}
