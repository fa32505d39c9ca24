/// LLM Client: the single point of entry for all generation-engine calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Every structured request goes through `LlmClient`, which owns schema
/// normalization and the retry policy. The wire protocol lives behind
/// `GenerationEngine` (see `gemini`).
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod gemini;
pub mod prompts;
pub mod schema;

use schema::{normalize_schema, SchemaError, StructuredOutput};

/// Retry budget for ordinary structured calls.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Backoff unit: the n-th retry waits `n × base`.
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(2);

/// One piece of model input.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Binary attachment (resume PDF, audio clip). `Bytes` keeps clones cheap.
    Blob { mime_type: String, data: Bytes },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }

    pub fn blob(mime_type: impl Into<String>, data: Bytes) -> Self {
        ContentPart::Blob {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Failure classification reported by a `GenerationEngine`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Rate limit or quota exhaustion. Worth waiting and retrying.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Anything else: bad request, auth, server error, transport failure.
    #[error("engine failure: {0}")]
    Failed(String),
}

impl EngineError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::RateLimited(_))
    }

    pub fn into_message(self) -> String {
        match self {
            EngineError::RateLimited(message) | EngineError::Failed(message) => message,
        }
    }
}

/// Transport seam around the remote model. `schema` is already normalized;
/// `None` means plain-text output.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        parts: &[ContentPart],
        schema: Option<&Value>,
    ) -> Result<String, EngineError>;

    /// Speech synthesis: the first audio part of the response, base64-encoded.
    async fn generate_audio(
        &self,
        model: &str,
        parts: &[ContentPart],
    ) -> Result<String, EngineError>;
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("invalid response schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Engine(EngineError),

    #[error("generation exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    #[error("malformed model output: {0}")]
    MalformedOutput(#[from] serde_json::Error),
}

/// A single structured-generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub parts: &'a [ContentPart],
    /// Raw (un-normalized) target schema.
    pub schema: &'a Value,
    /// Total attempts allowed; values below 1 are treated as 1.
    pub max_retries: u32,
}

/// The single generation client shared by every analyzer.
#[derive(Clone)]
pub struct LlmClient {
    engine: Arc<dyn GenerationEngine>,
    backoff_base: Duration,
}

impl LlmClient {
    pub fn new(engine: Arc<dyn GenerationEngine>) -> Self {
        Self {
            engine,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    /// Normalizes the schema, calls the engine with retry, and parses the JSON body.
    pub async fn generate(&self, request: &GenerationRequest<'_>) -> Result<Value, LlmError> {
        let schema = normalize_schema(request.schema)?;

        let text = self
            .call_with_retry(
                request.model,
                request.parts,
                Some(&schema),
                request.max_retries,
            )
            .await?;

        let value = serde_json::from_str(strip_json_fences(&text))?;
        Ok(value)
    }

    /// `generate` plus typed validation against `T`.
    pub async fn generate_structured<T: StructuredOutput>(
        &self,
        model: &str,
        parts: &[ContentPart],
        max_retries: u32,
    ) -> Result<T, LlmError> {
        let value = self
            .generate(&GenerationRequest {
                model,
                parts,
                schema: T::output_schema(),
                max_retries,
            })
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Free-text generation with the same retry policy (used for transcription).
    pub async fn generate_text(
        &self,
        model: &str,
        parts: &[ContentPart],
        max_retries: u32,
    ) -> Result<String, LlmError> {
        let text = self.call_with_retry(model, parts, None, max_retries).await?;
        Ok(text.trim().to_string())
    }

    /// Speech synthesis. Returns the base64 audio exactly as the engine sent it.
    pub async fn generate_audio(
        &self,
        model: &str,
        parts: &[ContentPart],
        max_retries: u32,
    ) -> Result<String, LlmError> {
        self.with_retry(model, max_retries, || self.engine.generate_audio(model, parts))
            .await
    }

    async fn call_with_retry(
        &self,
        model: &str,
        parts: &[ContentPart],
        schema: Option<&Value>,
        max_retries: u32,
    ) -> Result<String, LlmError> {
        self.with_retry(model, max_retries, || self.engine.generate(model, parts, schema))
            .await
    }

    /// Retries only retryable engine errors, sleeping `base × attempt` between attempts.
    async fn with_retry<T, F, Fut>(
        &self,
        model: &str,
        max_retries: u32,
        mut call: F,
    ) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        let attempts = max_retries.max(1);
        let mut last_message = String::new();

        for attempt in 1..=attempts {
            match call().await {
                Ok(output) => {
                    debug!(model, attempt, "Generation call succeeded");
                    return Ok(output);
                }
                Err(err) if err.is_retryable() => {
                    let message = err.into_message();
                    if attempt < attempts {
                        let delay = self.backoff_base * attempt;
                        warn!(
                            "Generation attempt {}/{} rate limited, retrying after {}ms: {}",
                            attempt,
                            attempts,
                            delay.as_millis(),
                            message
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_message = message;
                }
                Err(err) => {
                    warn!(model, attempt, "Generation call failed: {err}");
                    return Err(LlmError::Engine(err));
                }
            }
        }

        Err(LlmError::Exhausted {
            attempts,
            last: last_message,
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}
