use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    #[serde(rename = "activeRuns")]
    active_runs: usize,
}

/// Liveness plus a count of currently tracked runs.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_runs: state.registry.len(),
    })
}
