//! GitHub sub-analyzer: one structured call per digested repository.

use tracing::{info, warn};

use crate::analysis::prompts::REPO_ANALYSIS_PROMPT_TEMPLATE;
use crate::analysis::AnalysisSettings;
use crate::github::{parse_repo_references, RepoDigest, RepoSource};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ContentPart, LlmClient};
use crate::models::github::{GithubDeepAnalysisResult, GithubProject};

pub fn build_repo_prompt(digest: &RepoDigest) -> String {
    fill_template(
        REPO_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("repo_name", digest.name.as_str()),
            ("repo_url", digest.url.as_str()),
            ("language_summary", digest.language_summary.as_str()),
            ("files_bundle", digest.files_bundle.as_str()),
        ],
    )
}

/// Analyzes up to `settings.max_repos` repositories named in `github_links`.
///
/// Never fails: a repository whose digest is absent or whose generation call
/// errors is skipped, so the result holds between zero and `max_repos` projects
/// in input order.
pub async fn analyze_github_repos(
    llm: &LlmClient,
    repos: &dyn RepoSource,
    settings: &AnalysisSettings,
    github_links: &str,
) -> Vec<GithubProject> {
    let refs = parse_repo_references(github_links);
    if refs.is_empty() {
        return Vec::new();
    }

    let mut projects = Vec::new();
    let mut issued_calls = 0usize;

    for repo in refs.iter().take(settings.max_repos) {
        let Some(digest) = repos.fetch_repo_digest(repo).await else {
            warn!("No digest for {}, skipping", repo.url);
            continue;
        };

        // Pacing applies between generation calls, not between fetches.
        if issued_calls > 0 {
            tokio::time::sleep(settings.repo_call_delay).await;
        }
        issued_calls += 1;

        let parts = [ContentPart::text(build_repo_prompt(&digest))];
        match llm
            .generate_structured::<GithubDeepAnalysisResult>(
                &settings.model,
                &parts,
                settings.sub_analysis_retries,
            )
            .await
        {
            Ok(analysis) => projects.push(GithubProject::from(analysis)),
            Err(e) => warn!("Repository analysis failed for {}: {e}", repo.url),
        }
    }

    info!(
        requested = refs.len().min(settings.max_repos),
        analyzed = projects.len(),
        "GitHub sub-analysis complete"
    );
    projects
}
