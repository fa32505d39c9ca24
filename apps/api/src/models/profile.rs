//! The composite employability profile and its nested sections.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::github::GithubProject;
use super::highlights::ResumeHighlightsResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkillDistribution {
    pub category: String,
    pub share_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GapSkill {
    pub skill: String,
    pub current_level: f64,
    pub required_level: f64,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CompetencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum EvidenceSource {
    #[serde(rename = "resume")]
    Resume,
    #[serde(rename = "github")]
    Github,
    #[serde(rename = "resume+github")]
    ResumeAndGithub,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetencySkill {
    pub name: String,
    pub level: CompetencyLevel,
    pub evidence_source: EvidenceSource,
    pub evidence_comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetencyArea {
    pub area: String,
    pub skills: Vec<CompetencySkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkillFrequencyItem {
    pub skill_name: String,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JdBreakdown {
    pub role_title: String,
    pub must_have_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub responsibilities: Vec<String>,
    pub skill_frequency: Vec<SkillFrequencyItem>,
    pub estimated_level: String,
    pub company_archetype: String,
}

/// Fit per company archetype, 0–100 each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyFit {
    pub startup: f64,
    pub mnc: f64,
    pub saas: f64,
    pub fintech: f64,
    pub research_lab: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RoleDemand {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketAnalysis {
    pub role_demand: RoleDemand,
    /// Candidate's standing (0-100) relative to other applicants in the current market.
    pub candidate_percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EffortCategory {
    pub category: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapEffort {
    pub phase_1: Vec<EffortCategory>,
    pub phase_2: Vec<EffortCategory>,
    pub phase_3: Vec<EffortCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapDetails {
    pub phase_1_goals: Vec<String>,
    pub phase_2_goals: Vec<String>,
    pub phase_3_goals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapTimelineItem {
    pub task_name: String,
    pub start_week: i32,
    pub end_week: i32,
    pub category: String,
}

/// Visibility score now and projected after each 30-day phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmployabilityProfile {
    pub current_visibility_score: f64,
    pub phase_1_projected_score: f64,
    pub phase_2_projected_score: f64,
    pub phase_3_projected_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextSummaries {
    pub candidate_name: Option<String>,
    pub candidate_headline: Option<String>,
    pub profile_summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggested_roles: Vec<String>,
    pub roadmap_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationAssets {
    pub resume_bullets_optimized: String,
    pub cover_letter: String,
    pub linkedin_summary: String,
    pub outreach_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RadarCategory {
    pub category: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchBreakdown {
    pub role: String,
    pub match_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverallScores {
    pub overall_match: f64,
    pub categories: Vec<RadarCategory>,
    pub match_breakdown: Vec<MatchBreakdown>,
}

/// The composite profile. `github_projects` and `resume_highlights` are the model's
/// own guess until the orchestrator merges sub-analysis output over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub overall_scores: OverallScores,
    pub market_analysis: MarketAnalysis,
    pub skill_distribution: Vec<SkillDistribution>,
    pub gap_skills: Vec<GapSkill>,
    pub competency_matrix: Vec<CompetencyArea>,
    pub jd_breakdown: JdBreakdown,
    pub company_fit: CompanyFit,
    pub roadmap_effort: RoadmapEffort,
    pub roadmap_details: RoadmapDetails,
    pub roadmap_timeline: Vec<RoadmapTimelineItem>,
    pub employability_profile: EmployabilityProfile,
    pub text_summaries: TextSummaries,
    #[serde(default)]
    pub github_projects: Vec<GithubProject>,
    pub assets: ApplicationAssets,
    pub portfolio_template: String,
    pub resume_highlights: Option<ResumeHighlightsResult>,
    pub interview_topics: Option<Vec<String>>,
}

impl AnalysisResult {
    /// Overwrites the optional slots with sub-analysis output that actually exists.
    /// An empty project list or a missing highlight result leaves the slot as it was.
    pub fn merge_sub_analyses(
        &mut self,
        github_projects: Vec<GithubProject>,
        resume_highlights: Option<ResumeHighlightsResult>,
    ) {
        if !github_projects.is_empty() {
            self.github_projects = github_projects;
        }
        if let Some(highlights) = resume_highlights {
            self.resume_highlights = Some(highlights);
        }
    }
}
