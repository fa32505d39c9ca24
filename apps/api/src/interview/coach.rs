use bytes::Bytes;
use tracing::warn;

use crate::interview::prompts::{
    EVALUATION_PROMPT_TEMPLATE, QUESTION_PROMPT_TEMPLATE, TRANSCRIPTION_PROMPT,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ContentPart, LlmClient, LlmError, DEFAULT_MAX_RETRIES};
use crate::models::interview::{
    InterviewEvaluationMetrics, InterviewEvaluationResponse, InterviewQuestionResponse,
};

/// Shares the process-wide `LlmClient`; cheap to clone.
#[derive(Clone)]
pub struct InterviewCoach {
    llm: LlmClient,
    model: String,
    transcription_model: String,
    tts_model: String,
}

impl InterviewCoach {
    pub fn new(
        llm: LlmClient,
        model: impl Into<String>,
        transcription_model: impl Into<String>,
        tts_model: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            transcription_model: transcription_model.into(),
            tts_model: tts_model.into(),
        }
    }

    pub async fn generate_question(&self, role: &str, topic: &str) -> InterviewQuestionResponse {
        let prompt = fill_template(QUESTION_PROMPT_TEMPLATE, &[("role", role), ("topic", topic)]);

        self.llm
            .generate_structured(&self.model, &[ContentPart::text(prompt)], DEFAULT_MAX_RETRIES)
            .await
            .unwrap_or_else(|e| {
                warn!("Interview question generation failed, using fallback: {e}");
                fallback_question()
            })
    }

    pub async fn evaluate_answer(
        &self,
        question_text: &str,
        transcript: &str,
    ) -> InterviewEvaluationResponse {
        let prompt = fill_template(
            EVALUATION_PROMPT_TEMPLATE,
            &[("question_text", question_text), ("transcript", transcript)],
        );

        self.llm
            .generate_structured(&self.model, &[ContentPart::text(prompt)], DEFAULT_MAX_RETRIES)
            .await
            .unwrap_or_else(|e| {
                warn!("Interview evaluation failed, returning empty score: {e}");
                fallback_evaluation()
            })
    }

    pub async fn transcribe(&self, audio: Bytes, mime_type: &str) -> Result<String, LlmError> {
        let parts = [
            ContentPart::blob(mime_type, audio),
            ContentPart::text(TRANSCRIPTION_PROMPT),
        ];
        self.llm
            .generate_text(&self.transcription_model, &parts, DEFAULT_MAX_RETRIES)
            .await
    }

    /// Reads `text` aloud. Returns base64 audio, or `None` if synthesis failed.
    pub async fn speak(&self, text: &str) -> Option<String> {
        let preview: String = text.chars().take(20).collect();

        match self
            .llm
            .generate_audio(&self.tts_model, &[ContentPart::text(text)], 1)
            .await
        {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Speech synthesis failed for '{preview}...': {e}");
                None
            }
        }
    }
}

fn fallback_question() -> InterviewQuestionResponse {
    InterviewQuestionResponse {
        question_id: "fallback_1".to_string(),
        question_text: "Describe a challenging project you worked on.".to_string(),
        expected_keywords: vec![
            "project".to_string(),
            "challenges".to_string(),
            "solutions".to_string(),
        ],
        hints: vec![
            "Focus on your contribution".to_string(),
            "Use STAR method".to_string(),
        ],
    }
}

fn fallback_evaluation() -> InterviewEvaluationResponse {
    InterviewEvaluationResponse {
        overall_score: 0,
        what_went_well: Vec::new(),
        what_to_improve: vec!["Error processing evaluation.".to_string()],
        better_answer: "N/A".to_string(),
        metrics: InterviewEvaluationMetrics {
            clarity: 0,
            technical_accuracy: 0,
            confidence_estimate: 0.0,
        },
    }
}
