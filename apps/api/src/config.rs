use std::time::Duration;

use anyhow::{Context, Result};

use crate::github::client::DEFAULT_GITHUB_API_URL;
use crate::llm_client::gemini::DEFAULT_GEMINI_API_URL;

const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TRANSCRIPTION_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup aborts if `GEMINI_API_KEY` is missing.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub transcription_model: String,
    pub tts_model: String,
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

// Keeps credentials out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_url", &self.gemini_api_url)
            .field("gemini_model", &self.gemini_model)
            .field("transcription_model", &self.transcription_model)
            .field("tts_model", &self.tts_model)
            .field("github_api_url", &self.github_api_url)
            .field("github_token", &self.github_token.as_ref().map(|_| "<set>"))
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("request_timeout", &self.request_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            gemini_api_key: var("GEMINI_API_KEY")
                .context("Required environment variable 'GEMINI_API_KEY' is not set")?,
            gemini_api_url: or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_model: or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            transcription_model: or("TRANSCRIPTION_MODEL", DEFAULT_TRANSCRIPTION_MODEL),
            tts_model: or("TTS_MODEL", DEFAULT_TTS_MODEL),
            github_api_url: or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            github_token: var("GITHUB_TOKEN"),
            port: or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or("RUST_LOG", "info"),
            request_timeout: Duration::from_secs(
                var("REQUEST_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            max_upload_bytes: var("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = load(&[("GEMINI_API_KEY", "k")]).unwrap();

        assert_eq!(config.gemini_model, "gemini-3-flash-preview");
        assert_eq!(config.transcription_model, "gemini-2.5-flash");
        assert_eq!(config.tts_model, "gemini-2.5-flash-preview-tts");
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.github_token, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(300));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = load(&[("GEMINI_API_KEY", "  ")]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = load(&[
            ("GEMINI_API_KEY", "k"),
            ("GITHUB_TOKEN", "ghp_x"),
            ("PORT", "9000"),
            ("TTS_MODEL", "custom-tts"),
            ("REQUEST_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.tts_model, "custom-tts");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!format!("{config:?}").contains("ghp_x"));

        assert!(load(&[("GEMINI_API_KEY", "k"), ("PORT", "http")]).is_err());
        assert!(load(&[("GEMINI_API_KEY", "k"), ("MAX_UPLOAD_BYTES", "-1")]).is_err());
    }
}
