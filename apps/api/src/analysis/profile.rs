//! Main profile sub-analyzer. Its failure fails the whole request.

use crate::analysis::prompts::{AUTO_DETECT_ROLE, NO_REPOSITORIES, PROFILE_PROMPT_TEMPLATE};
use crate::analysis::{AnalysisSettings, ResumeDocument};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ContentPart, LlmClient, LlmError};
use crate::models::github::GithubProject;
use crate::models::profile::AnalysisResult;

/// `REPO:`/`SUMMARY:` blocks separated by blank lines.
pub fn github_digest_text(projects: &[GithubProject]) -> String {
    if projects.is_empty() {
        return NO_REPOSITORIES.to_string();
    }
    projects
        .iter()
        .map(|p| format!("REPO: {}\nSUMMARY: {}", p.name, p.summary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_profile_prompt(target_role: &str, github_digest: &str) -> String {
    let role = match target_role.trim() {
        "" => AUTO_DETECT_ROLE,
        role => role,
    };
    fill_template(
        PROFILE_PROMPT_TEMPLATE,
        &[("target_role", role), ("github_summary", github_digest)],
    )
}

pub async fn analyze_main_profile(
    llm: &LlmClient,
    settings: &AnalysisSettings,
    resume: &ResumeDocument,
    target_role: &str,
    github_digest: &str,
) -> Result<AnalysisResult, LlmError> {
    let parts = [
        resume.as_part(),
        ContentPart::text(build_profile_prompt(target_role, github_digest)),
    ];

    llm.generate_structured::<AnalysisResult>(&settings.model, &parts, settings.profile_retries)
        .await
}
