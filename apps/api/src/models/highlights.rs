use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SegmentRating {
    Green,
    Yellow,
    Red,
}

/// One rated span of the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResumeHighlightSegment {
    pub id: String,
    pub section: String,
    pub original_text: String,
    pub rating: SegmentRating,
    pub label: String,
    pub comment: String,
    pub suggested_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResumeHighlightSummaryCounts {
    pub green: i32,
    pub yellow: i32,
    pub red: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResumeHighlightsResult {
    pub overall_feedback: String,
    pub segments: Vec<ResumeHighlightSegment>,
    pub summary_counts: ResumeHighlightSummaryCounts,
}
