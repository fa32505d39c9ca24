pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as profile;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profile/analyze",
            post(profile::handle_analyze_profile),
        )
        // Interview API
        .route(
            "/api/v1/interview/questions",
            post(interview::handle_generate_question),
        )
        .route(
            "/api/v1/interview/evaluate",
            post(interview::handle_evaluate_answer),
        )
        .route(
            "/api/v1/interview/transcribe",
            post(interview::handle_transcribe),
        )
        .route(
            "/api/v1/interview/speech",
            post(interview::handle_generate_speech),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
