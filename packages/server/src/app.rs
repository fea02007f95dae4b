//! Application state and router construction.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use pipeline::{Coordinator, DigestEngine, RunRegistry, ScrapeJobConfig};

use crate::routes::{
    abort_handler, digest_trigger_handler, health_handler, manual_trigger_handler,
    trigger_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub digest: Arc<DigestEngine>,
    pub registry: Arc<RunRegistry>,
    pub trigger_secret: String,
    pub default_job: ScrapeJobConfig,
    pub digest_size: usize,
}

/// Build the router with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/scrape/trigger", post(trigger_handler))
        .route("/scrape/manual", post(manual_trigger_handler))
        .route("/scrape/abort", post(abort_handler))
        .route("/digest/trigger", post(digest_trigger_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
