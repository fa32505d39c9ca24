use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewQuestionRequest {
    pub role: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterviewQuestionResponse {
    pub question_id: String,
    pub question_text: String,
    /// Three to five technical terms a strong answer mentions.
    pub expected_keywords: Vec<String>,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewEvaluationRequest {
    pub question_text: String,
    pub transcript: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterviewEvaluationMetrics {
    /// 0–100.
    pub clarity: i32,
    /// 0–100.
    pub technical_accuracy: i32,
    /// 0.0–1.0.
    pub confidence_estimate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InterviewEvaluationResponse {
    /// 0–100.
    pub overall_score: i32,
    pub what_went_well: Vec<String>,
    pub what_to_improve: Vec<String>,
    pub better_answer: String,
    pub metrics: InterviewEvaluationMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResponse {
    pub transcript: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

/// `audio_base64` is `null` when synthesis failed.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechResponse {
    pub audio_base64: Option<String>,
}
