//! Axum route handlers for the Profile API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use tracing::info;

use crate::analysis::{ProfileInput, ResumeDocument};
use crate::errors::AppError;
use crate::models::profile::AnalysisResult;
use crate::state::AppState;

/// Decoded multipart form for profile analysis.
#[derive(Debug, Default)]
struct ProfileForm {
    resume: Option<ResumeDocument>,
    jd_text: String,
    github_links: String,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}

async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let mime_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.resume = Some(ResumeDocument::new(bytes, mime_type));
            }
            "jd_text" => form.jd_text = field.text().await.map_err(multipart_error)?,
            "github_links" => form.github_links = field.text().await.map_err(multipart_error)?,
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/profile/analyze
///
/// Multipart: `resume` (file, required), `jd_text` and `github_links` (optional text).
pub async fn handle_analyze_profile(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let form = read_profile_form(multipart).await?;

    let resume = form
        .resume
        .filter(|r| !r.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    info!(
        resume_bytes = resume.bytes.len(),
        mime_type = %resume.mime_type,
        has_role = !form.jd_text.trim().is_empty(),
        "Starting profile analysis"
    );

    let result = state
        .orchestrator
        .analyze(ProfileInput {
            resume,
            target_role: form.jd_text,
            github_links: form.github_links,
        })
        .await?;

    Ok(Json(result))
}
