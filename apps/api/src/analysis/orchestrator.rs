//! Fan-out/fan-in over the three sub-analyzers.

use std::sync::Arc;

use tracing::{error, info};

use crate::analysis::github_projects::analyze_github_repos;
use crate::analysis::highlights::analyze_resume_highlights;
use crate::analysis::profile::{analyze_main_profile, github_digest_text};
use crate::analysis::{AnalysisSettings, ProfileError, ProfileInput};
use crate::github::RepoSource;
use crate::llm_client::LlmClient;
use crate::models::profile::AnalysisResult;

pub struct ProfileOrchestrator {
    llm: LlmClient,
    repos: Arc<dyn RepoSource>,
    settings: AnalysisSettings,
}

impl ProfileOrchestrator {
    pub fn new(llm: LlmClient, repos: Arc<dyn RepoSource>, settings: AnalysisSettings) -> Self {
        Self {
            llm,
            repos,
            settings,
        }
    }

    /// GitHub and highlight sub-analyses run concurrently; the main profile follows
    /// with the GitHub context. Only the main profile can fail the request.
    pub async fn analyze(&self, input: ProfileInput) -> Result<AnalysisResult, ProfileError> {
        let ProfileInput {
            resume,
            target_role,
            github_links,
        } = input;

        let (github_projects, resume_highlights) = tokio::join!(
            analyze_github_repos(
                &self.llm,
                self.repos.as_ref(),
                &self.settings,
                &github_links
            ),
            analyze_resume_highlights(&self.llm, &self.settings, &resume),
        );

        let digest = github_digest_text(&github_projects);
        let mut result =
            analyze_main_profile(&self.llm, &self.settings, &resume, &target_role, &digest)
                .await
                .map_err(|e| {
                    error!("Main profile analysis failed: {e}");
                    ProfileError::Orchestration(e)
                })?;

        info!(
            projects = github_projects.len(),
            highlights = resume_highlights.is_some(),
            "Merging sub-analyses into profile"
        );
        result.merge_sub_analyses(github_projects, resume_highlights);

        Ok(result)
    }
}
