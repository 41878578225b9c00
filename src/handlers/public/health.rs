// handlers/public/health.rs - GET /health and GET /

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::api::{ApiResult, Envelope};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub pocketbase: String,
}

/// GET /health - liveness plus a record store ping
pub async fn health(State(state): State<AppState>) -> ApiResult<HealthReport> {
    let status = state.store.health().await.map_err(|e| {
        tracing::error!(service = "HealthCheck", operation = "health", error = %e, "record store unreachable");
        e
    })?;

    Ok(Envelope::ok(HealthReport {
        status: "ok".to_string(),
        version: state.config.server.version.clone(),
        pocketbase: status.message,
    }))
}

/// GET / - nothing to see here
pub async fn root() -> StatusCode {
    StatusCode::FORBIDDEN
}
