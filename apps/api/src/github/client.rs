//! Read-only GitHub REST client that assembles `RepoDigest`s.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, warn};

use super::digest::{bundle_entry, language_summary, select_interesting_files};
use super::{GithubError, RepoDigest, RepoRef, RepoSource};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("careercompass-api/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RepoMeta {
    name: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct FileContent {
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// `token` is optional; without it GitHub applies the anonymous rate limit.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| GithubError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| GithubError::Decode { url, source })
    }

    /// Fetches metadata, languages, the top-level listing and selected files.
    /// The first failing request aborts the whole digest.
    pub async fn build_digest(&self, repo: &RepoRef) -> Result<RepoDigest, GithubError> {
        let base = format!("/repos/{}/{}", repo.owner, repo.name);

        let meta: RepoMeta = self.get_json(&base).await?;

        let languages: HashMap<String, u64> = self.get_json(&format!("{base}/languages")).await?;

        let listing: Vec<ContentEntry> = self.get_json(&format!("{base}/contents")).await?;
        let files: Vec<&ContentEntry> = listing.iter().filter(|e| e.kind == "file").collect();
        let selected = select_interesting_files(files.iter().map(|e| e.name.as_str()));

        let mut files_bundle = String::new();
        for name in selected {
            let Some(entry) = files.iter().find(|e| e.name == name) else {
                continue;
            };
            let file: FileContent = self
                .get_json(&format!("{base}/contents/{}", entry.path))
                .await?;
            match decode_content(&file) {
                Some(content) => files_bundle.push_str(&bundle_entry(&entry.path, &content)),
                None => debug!(repo = %repo.url, path = %entry.path, "Skipping non-base64 file"),
            }
        }

        Ok(RepoDigest {
            name: meta.name,
            url: meta.html_url,
            language_summary: language_summary(&languages),
            files_bundle,
        })
    }
}

fn decode_content(file: &FileContent) -> Option<String> {
    if file.encoding.as_deref() != Some("base64") {
        return None;
    }
    let encoded: String = file
        .content
        .as_deref()?
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(encoded).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn fetch_repo_digest(&self, repo: &RepoRef) -> Option<RepoDigest> {
        match self.build_digest(repo).await {
            Ok(digest) => {
                debug!(
                    repo = %repo.url,
                    bundle_bytes = digest.files_bundle.len(),
                    "Built repository digest"
                );
                Some(digest)
            }
            Err(e) => {
                warn!("Skipping repository {}: {e}", repo.url);
                None
            }
        }
    }
}
