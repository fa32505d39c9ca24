// Source Connector: turns free-text GitHub links into prompt-ready repository digests.
// Everything here is read-only and best-effort; a failing repository is simply absent.

pub mod client;
pub mod digest;
pub mod refs;

use async_trait::async_trait;
use thiserror::Error;

pub use client::GithubClient;
pub use refs::parse_repo_references;

/// A repository named in user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    /// Canonical `https://github.com/{owner}/{name}`; the dedup key.
    pub url: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let url = format!("https://github.com/{owner}/{name}");
        Self { owner, name, url }
    }
}

/// Size-bounded summary of one repository, consumed by a single prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoDigest {
    pub name: String,
    pub url: String,
    pub language_summary: String,
    /// `FILE: <path>\n<content>\n\n` blocks, each file truncated to `digest::MAX_FILE_BYTES`.
    pub files_bundle: String,
}

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Where repository digests come from. Carried as `Arc<dyn RepoSource>`.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// `None` on any failure; never an error.
    async fn fetch_repo_digest(&self, repo: &RepoRef) -> Option<RepoDigest>;
}
