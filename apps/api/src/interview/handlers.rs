//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, State},
    Form, Json,
};

use crate::errors::AppError;
use crate::models::interview::{
    InterviewEvaluationRequest, InterviewEvaluationResponse, InterviewQuestionRequest,
    InterviewQuestionResponse, SpeechRequest, SpeechResponse, TranscriptionResponse,
};
use crate::state::AppState;

/// MIME type assumed for audio uploads that do not declare one.
const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// POST /api/v1/interview/questions
pub async fn handle_generate_question(
    State(state): State<AppState>,
    Json(request): Json<InterviewQuestionRequest>,
) -> Json<InterviewQuestionResponse> {
    Json(
        state
            .coach
            .generate_question(&request.role, &request.topic)
            .await,
    )
}

/// POST /api/v1/interview/evaluate
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(request): Json<InterviewEvaluationRequest>,
) -> Json<InterviewEvaluationResponse> {
    Json(
        state
            .coach
            .evaluate_answer(&request.question_text, &request.transcript)
            .await,
    )
}

/// POST /api/v1/interview/transcribe
///
/// Multipart with a single `audio` file field.
pub async fn handle_transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscriptionResponse>, AppError> {
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e.body_text())))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid audio upload: {}", e.body_text())))?;
        audio = Some((bytes, mime_type));
    }

    let (bytes, mime_type) = audio
        .filter(|(bytes, _)| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("audio file is required".to_string()))?;

    let transcript = state.coach.transcribe(bytes, &mime_type).await?;

    Ok(Json(TranscriptionResponse { transcript }))
}

/// POST /api/v1/interview/speech
///
/// Form-encoded `text` field.
pub async fn handle_generate_speech(
    State(state): State<AppState>,
    Form(request): Form<SpeechRequest>,
) -> Result<Json<SpeechResponse>, AppError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }

    Ok(Json(SpeechResponse {
        audio_base64: state.coach.speak(text).await,
    }))
}
