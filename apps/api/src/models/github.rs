use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-repository analysis returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GithubDeepAnalysisResult {
    pub project_name: String,
    pub short_description: String,
    pub project_type: String,
    pub tech_stack: Vec<String>,
    /// 0–10.
    pub complexity_rating: f64,
    pub recommended_resume_bullets: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

/// A repository as it appears in the composite profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GithubProject {
    pub name: String,
    pub summary: String,
    pub tech_stack: Vec<String>,
    pub complexity_rating: f64,
    pub resume_bullets: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

impl From<GithubDeepAnalysisResult> for GithubProject {
    fn from(analysis: GithubDeepAnalysisResult) -> Self {
        Self {
            summary: format!("{}: {}", analysis.project_type, analysis.short_description),
            name: analysis.project_name,
            tech_stack: analysis.tech_stack,
            complexity_rating: analysis.complexity_rating,
            resume_bullets: analysis.recommended_resume_bullets,
            improvement_suggestions: analysis.improvement_suggestions,
        }
    }
}
