// Main entry point for the trigger server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipeline::{
    ApifyEngine, Coordinator, DigestEngine, HttpMailer, HttpStructurer, MemoryStore, RunRegistry,
};

mod app;
mod config;
mod routes;

use app::AppState;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting jobsignal trigger server");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(sources = config.source_urls.len(), "Configuration loaded");

    let registry = Arc::new(RunRegistry::new());
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(ApifyEngine::new(config.apify_token.clone()));

    let mut structurer = HttpStructurer::new(config.structurer_url.clone());
    if let Some(key) = &config.structurer_api_key {
        structurer = structurer.with_api_key(key.clone());
    }

    let coordinator = Arc::new(Coordinator::new(
        engine,
        registry.clone(),
        Arc::new(structurer),
        store.clone(),
        store.clone(),
    ));

    let mailer = Arc::new(HttpMailer::new(
        config.mail_endpoint.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    ));
    let digest = Arc::new(DigestEngine::new(store.clone(), store.clone(), mailer));

    let state = AppState {
        coordinator,
        digest,
        registry,
        trigger_secret: config.trigger_secret.clone(),
        default_job: config.default_job(),
        digest_size: config.digest_size,
    };

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app::build_app(state))
        .await
        .context("Server error")?;

    Ok(())
}
