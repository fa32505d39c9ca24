//! Resume-highlight sub-analyzer.

use tracing::warn;

use crate::analysis::prompts::RESUME_HIGHLIGHTS_PROMPT;
use crate::analysis::{AnalysisSettings, ResumeDocument};
use crate::llm_client::{ContentPart, LlmClient};
use crate::models::highlights::ResumeHighlightsResult;

/// Rates the resume segment by segment. Any failure is logged and yields `None`.
pub async fn analyze_resume_highlights(
    llm: &LlmClient,
    settings: &AnalysisSettings,
    resume: &ResumeDocument,
) -> Option<ResumeHighlightsResult> {
    let parts = [resume.as_part(), ContentPart::text(RESUME_HIGHLIGHTS_PROMPT)];

    match llm
        .generate_structured::<ResumeHighlightsResult>(
            &settings.model,
            &parts,
            settings.sub_analysis_retries,
        )
        .await
    {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("Resume highlight analysis failed: {e}");
            None
        }
    }
}
