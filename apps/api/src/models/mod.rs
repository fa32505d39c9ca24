// Result shapes the model is asked to produce. Every type deriving `JsonSchema`
// here doubles as the response schema for its generation call.

pub mod github;
pub mod highlights;
pub mod interview;
pub mod profile;

crate::structured_output!(
    github::GithubDeepAnalysisResult,
    highlights::ResumeHighlightsResult,
    interview::InterviewQuestionResponse,
    interview::InterviewEvaluationResponse,
    profile::AnalysisResult,
);
