use std::sync::Arc;

use crate::analysis::ProfileOrchestrator;
use crate::config::Config;
use crate::interview::InterviewCoach;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Arc<ProfileOrchestrator>,
    pub coach: InterviewCoach,
}
