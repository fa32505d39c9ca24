//! Gemini `generateContent` transport.
//!
//! Translates `ContentPart`s into Gemini's request shape and classifies failures
//! into `EngineError` from the HTTP status and the structured error body, never
//! from message text.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ContentPart, EngineError, GenerationEngine};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Gemini's gRPC-style status for quota exhaustion.
const QUOTA_STATUS: &str = "RESOURCE_EXHAUSTED";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<&'a [&'a str]>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<ResponseInlineData>,
}

/// Binary output part; `data` is already base64.
#[derive(Debug, Deserialize)]
struct ResponseInlineData {
    #[serde(rename = "mimeType", alias = "mime_type", default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// `GenerationEngine` backed by the Gemini REST API.
pub struct GeminiEngine {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiEngine {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

fn build_request<'a>(parts: &'a [ContentPart], schema: Option<&'a Value>) -> GeminiRequest<'a> {
    GeminiRequest {
        contents: user_content(parts),
        generation_config: schema.map(|response_schema| GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(response_schema),
            ..GenerationConfig::default()
        }),
    }
}

fn build_audio_request(parts: &[ContentPart]) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: user_content(parts),
        generation_config: Some(GenerationConfig {
            response_modalities: Some(&["AUDIO"]),
            ..GenerationConfig::default()
        }),
    }
}

fn user_content(parts: &[ContentPart]) -> Vec<GeminiContent<'_>> {
    let parts = parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => GeminiPart::Text { text },
            ContentPart::Blob { mime_type, data } => GeminiPart::InlineData {
                inline_data: InlineData {
                    mime_type,
                    data: STANDARD.encode(data),
                },
            },
        })
        .collect();

    vec![GeminiContent { role: "user", parts }]
}

/// Maps a non-success response onto the retry taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> EngineError {
    let parsed = serde_json::from_str::<GeminiErrorEnvelope>(body).ok();
    let quota = parsed
        .as_ref()
        .is_some_and(|e| e.error.status == QUOTA_STATUS);
    let message = parsed
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    if status == StatusCode::TOO_MANY_REQUESTS || quota {
        EngineError::RateLimited(format!("status {}: {}", status.as_u16(), message))
    } else {
        EngineError::Failed(format!("status {}: {}", status.as_u16(), message))
    }
}

fn extract_text(response: GeminiResponse) -> Result<String, EngineError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(EngineError::Failed(
            "Gemini returned no text content".to_string(),
        ));
    }
    Ok(text)
}

fn extract_audio(response: GeminiResponse) -> Result<String, EngineError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.inline_data)
                .find(|d| d.mime_type.starts_with("audio/") && !d.data.is_empty())
        })
        .map(|d| d.data)
        .ok_or_else(|| EngineError::Failed("Gemini returned no audio content".to_string()))
}

impl GeminiEngine {
    async fn send(
        &self,
        model: &str,
        body: &GeminiRequest<'_>,
    ) -> Result<GeminiResponse, EngineError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| EngineError::Failed(format!("transport error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = classify_failure(status, &text);
            warn!("Gemini API returned {}: {}", status, err);
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::Failed(format!("unreadable response body: {e}")))
    }
}

#[async_trait]
impl GenerationEngine for GeminiEngine {
    async fn generate(
        &self,
        model: &str,
        parts: &[ContentPart],
        schema: Option<&Value>,
    ) -> Result<String, EngineError> {
        debug!(model, parts = parts.len(), "Sending Gemini request");
        let response = self.send(model, &build_request(parts, schema)).await?;
        extract_text(response)
    }

    async fn generate_audio(
        &self,
        model: &str,
        parts: &[ContentPart],
    ) -> Result<String, EngineError> {
        debug!(model, parts = parts.len(), "Sending Gemini speech request");
        let response = self.send(model, &build_audio_request(parts)).await?;
        extract_audio(response)
    }
}
