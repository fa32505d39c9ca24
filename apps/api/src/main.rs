mod analysis;
mod config;
mod errors;
mod github;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{AnalysisSettings, ProfileOrchestrator};
use crate::config::Config;
use crate::github::GithubClient;
use crate::interview::InterviewCoach;
use crate::llm_client::gemini::GeminiEngine;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing GEMINI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerCompass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let engine = GeminiEngine::new(config.gemini_api_key.clone(), &config.gemini_api_url)?;
    let llm = LlmClient::new(Arc::new(engine));
    info!("LLM client initialized (model: {})", config.gemini_model);

    // Initialize GitHub client
    let github = GithubClient::new(&config.github_api_url, config.github_token.clone())?;
    info!(
        "GitHub client initialized ({})",
        if config.github_token.is_some() {
            "authenticated"
        } else {
            "anonymous"
        }
    );

    let orchestrator = ProfileOrchestrator::new(
        llm.clone(),
        Arc::new(github),
        AnalysisSettings::new(config.gemini_model.clone()),
    );
    let coach = InterviewCoach::new(
        llm,
        config.gemini_model.clone(),
        config.transcription_model.clone(),
        config.tts_model.clone(),
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        orchestrator: Arc::new(orchestrator),
        coach,
    };

    // Build router
    let app = build_router(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
