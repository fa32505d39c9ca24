// Profile analysis: the multi-stage generation pipeline behind /api/v1/profile/analyze.
// Three sub-analyzers share one LlmClient; the orchestrator merges their output.
// Only the main profile call may fail the request.

pub mod github_projects;
pub mod handlers;
pub mod highlights;
pub mod orchestrator;
pub mod profile;
pub mod prompts;

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;

use crate::llm_client::{ContentPart, LlmError, DEFAULT_MAX_RETRIES};

pub use orchestrator::ProfileOrchestrator;

/// MIME type assumed when the upload does not declare one.
pub const DEFAULT_RESUME_MIME: &str = "application/pdf";
/// At most this many repositories are analyzed per request.
pub const MAX_REPOS: usize = 3;
/// Pause between successive repository generation calls.
pub const REPO_CALL_DELAY: Duration = Duration::from_secs(1);
/// The main profile is the one call that must succeed, so it gets a larger budget.
pub const PROFILE_MAX_RETRIES: u32 = 4;

/// Tunables shared by the analyzers.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub model: String,
    pub max_repos: usize,
    pub repo_call_delay: Duration,
    pub sub_analysis_retries: u32,
    pub profile_retries: u32,
}

impl AnalysisSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_repos: MAX_REPOS,
            repo_call_delay: REPO_CALL_DELAY,
            sub_analysis_retries: DEFAULT_MAX_RETRIES,
            profile_retries: PROFILE_MAX_RETRIES,
        }
    }
}

/// The uploaded resume, read once and shared read-only by every analyzer.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl ResumeDocument {
    pub fn new(bytes: Bytes, mime_type: Option<String>) -> Self {
        let mime_type = mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RESUME_MIME.to_string());
        Self { bytes, mime_type }
    }

    pub fn as_part(&self) -> ContentPart {
        ContentPart::blob(self.mime_type.clone(), self.bytes.clone())
    }
}

/// Already-decoded request inputs.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub resume: ResumeDocument,
    /// Target role or job description; blank means auto-detect.
    pub target_role: String,
    /// Free-form GitHub links; may be blank.
    pub github_links: String,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("main profile generation failed: {0}")]
    Orchestration(#[source] LlmError),
}
