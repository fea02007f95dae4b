//! Scrape and digest trigger endpoints.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use pipeline::{PipelineError, ScrapeJobConfig};

use crate::app::AppState;

const TRIGGER_SECRET_HEADER: &str = "x-trigger-secret";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTriggerRequest {
    pub source_urls: Vec<String>,
    pub max_posts: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortRequest {
    pub run_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortResponse {
    pub aborted: Vec<String>,
}

/// Automatic trigger, guarded by the shared secret. Runs the default job.
pub async fn trigger_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_secret(&state, &headers)?;
    run_pipeline(&state, &state.default_job).await
}

/// Manual trigger with explicit source URLs and limits.
pub async fn manual_trigger_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ManualTriggerRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if request.source_urls.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "sourceUrls must not be empty"})),
        ));
    }

    let mut job = ScrapeJobConfig::new(request.source_urls);
    if let Some(max_posts) = request.max_posts {
        job = job.with_max_posts(max_posts);
    }
    run_pipeline(&state, &job).await
}

/// Abort one run, or every tracked run when no id is given.
pub async fn abort_handler(
    Extension(state): Extension<AppState>,
    body: Option<Json<AbortRequest>>,
) -> Json<AbortResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let run_ids = match request.run_id {
        Some(run_id) => vec![run_id],
        None => state.registry.drain(),
    };

    let mut aborted = Vec::new();
    for run_id in run_ids {
        match state.coordinator.controller().abort(&run_id).await {
            Ok(()) => aborted.push(run_id),
            Err(e) => warn!(%run_id, error = %e, "Abort request failed"),
        }
    }

    info!(count = aborted.len(), "Abort endpoint processed");
    Json(AbortResponse { aborted })
}

/// Secret-guarded digest distribution pass.
pub async fn digest_trigger_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_secret(&state, &headers)?;

    let report = state
        .digest
        .run(state.digest_size)
        .await
        .map_err(pipeline_error_response)?;
    Ok(Json(serde_json::to_value(report).unwrap_or_default()))
}

async fn run_pipeline(
    state: &AppState,
    job: &ScrapeJobConfig,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let summary = state
        .coordinator
        .orchestrate(job)
        .await
        .map_err(pipeline_error_response)?;
    Ok(Json(serde_json::to_value(summary).unwrap_or_default()))
}

fn require_secret(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let presented = headers
        .get(TRIGGER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != state.trigger_secret {
        warn!("Trigger rejected: bad or missing secret");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid trigger secret"})),
        ));
    }
    Ok(())
}

fn pipeline_error_response(error: PipelineError) -> (StatusCode, Json<Value>) {
    let elapsed_ms = match &error {
        PipelineError::RunStart { elapsed_ms, .. } => *elapsed_ms,
        PipelineError::Store { elapsed_ms, .. } => *elapsed_ms,
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": error.to_string(),
            "elapsedMs": elapsed_ms,
        })),
    )
}
