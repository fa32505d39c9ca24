//! Test doubles for the generation engine and repository source.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use crate::github::{RepoDigest, RepoRef, RepoSource};
use crate::llm_client::{ContentPart, EngineError, GenerationEngine};

/// What the engine saw on one call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    /// All text parts joined with newlines.
    pub prompt: String,
    pub blobs: Vec<String>,
    pub schema: Option<Value>,
    /// Speech-synthesis call rather than text generation.
    pub audio: bool,
    pub at: Instant,
}

impl RecordedCall {
    /// True when the normalized target schema declares `property` at the top level.
    pub fn targets(&self, property: &str) -> bool {
        self.schema
            .as_ref()
            .and_then(|s| s.get("properties"))
            .and_then(|p| p.get(property))
            .is_some()
    }
}

type Handler = Box<dyn Fn(&RecordedCall) -> Result<String, EngineError> + Send + Sync>;

/// A `GenerationEngine` driven by a closure, recording every call.
pub struct MockEngine {
    handler: Handler,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockEngine {
    pub fn with_handler(
        handler: impl Fn(&RecordedCall) -> Result<String, EngineError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replays `script` in order; further calls fail.
    pub fn scripted(script: Vec<Result<String, EngineError>>) -> Self {
        let queue = Mutex::new(VecDeque::from(script));
        Self::with_handler(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(EngineError::Failed("script exhausted".into())))
        })
    }

    pub fn always(response: Result<String, EngineError>) -> Self {
        Self::with_handler(move |_| response.clone())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Elapsed time between consecutive calls.
    pub fn call_gaps(&self) -> Vec<Duration> {
        self.calls()
            .windows(2)
            .map(|pair| pair[1].at.duration_since(pair[0].at))
            .collect()
    }

    fn record(
        &self,
        model: &str,
        parts: &[ContentPart],
        schema: Option<&Value>,
        audio: bool,
    ) -> Result<String, EngineError> {
        let mut texts = Vec::new();
        let mut blobs = Vec::new();
        for part in parts {
            match part {
                ContentPart::Text(text) => texts.push(text.as_str()),
                ContentPart::Blob { mime_type, .. } => blobs.push(mime_type.clone()),
            }
        }

        let call = RecordedCall {
            model: model.to_string(),
            prompt: texts.join("\n"),
            blobs,
            schema: schema.cloned(),
            audio,
            at: Instant::now(),
        };
        let result = (self.handler)(&call);
        self.calls.lock().unwrap().push(call);
        result
    }
}

#[async_trait]
impl GenerationEngine for MockEngine {
    async fn generate(
        &self,
        model: &str,
        parts: &[ContentPart],
        schema: Option<&Value>,
    ) -> Result<String, EngineError> {
        self.record(model, parts, schema, false)
    }

    async fn generate_audio(
        &self,
        model: &str,
        parts: &[ContentPart],
    ) -> Result<String, EngineError> {
        self.record(model, parts, None, true)
    }
}

/// A `RepoSource` backed by a fixed map; unknown repositories are absent.
#[derive(Default)]
pub struct MockRepoSource {
    digests: HashMap<String, RepoDigest>,
    requested: Mutex<Vec<String>>,
}

impl MockRepoSource {
    pub fn with_digest(mut self, digest: RepoDigest) -> Self {
        self.digests.insert(digest.url.clone(), digest);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoSource for MockRepoSource {
    async fn fetch_repo_digest(&self, repo: &RepoRef) -> Option<RepoDigest> {
        self.requested.lock().unwrap().push(repo.url.clone());
        self.digests.get(&repo.url).cloned()
    }
}

pub fn digest(owner: &str, name: &str) -> RepoDigest {
    RepoDigest {
        name: name.to_string(),
        url: format!("https://github.com/{owner}/{name}"),
        language_summary: "Rust 100%".to_string(),
        files_bundle: format!("FILE: README.md\n# {name}\n\n"),
    }
}

/// A minimal, schema-valid main profile response.
pub fn analysis_json() -> Value {
    serde_json::json!({
        "overall_scores": {
            "overall_match": 72.0,
            "categories": [{"category": "Backend", "score": 80.0}],
            "match_breakdown": [{"role": "Backend Engineer", "match_percentage": 75.0}]
        },
        "market_analysis": {"role_demand": "High", "candidate_percentile": 64.0},
        "skill_distribution": [{"category": "Systems", "share_percent": 60.0}],
        "gap_skills": [{
            "skill": "Kubernetes", "current_level": 2.0, "required_level": 6.0, "priority": "high"
        }],
        "competency_matrix": [{
            "area": "Languages",
            "skills": [{
                "name": "Rust", "level": "Advanced",
                "evidence_source": "resume+github", "evidence_comment": "Two services in prod"
            }]
        }],
        "jd_breakdown": {
            "role_title": "Backend Engineer",
            "must_have_skills": ["Rust"],
            "nice_to_have_skills": ["Kafka"],
            "responsibilities": ["Own services"],
            "skill_frequency": [{"skill_name": "Rust", "count": 3}],
            "estimated_level": "Mid",
            "company_archetype": "Startup"
        },
        "company_fit": {"startup": 80.0, "mnc": 55.0, "saas": 70.0, "fintech": 60.0, "research_lab": 30.0},
        "roadmap_effort": {
            "phase_1": [{"category": "Learning", "hours": 20.0}],
            "phase_2": [],
            "phase_3": []
        },
        "roadmap_details": {"phase_1_goals": ["Ship a k8s demo"], "phase_2_goals": [], "phase_3_goals": []},
        "roadmap_timeline": [{"task_name": "k8s", "start_week": 1, "end_week": 4, "category": "Learning"}],
        "employability_profile": {
            "current_visibility_score": 50.0,
            "phase_1_projected_score": 60.0,
            "phase_2_projected_score": 70.0,
            "phase_3_projected_score": 80.0
        },
        "text_summaries": {
            "candidate_name": "Ada",
            "profile_summary": "Solid backend engineer",
            "strengths": ["Rust"],
            "weaknesses": ["Ops"],
            "suggested_roles": ["Backend Engineer"],
            "roadmap_summary": "Learn ops"
        },
        "github_projects": [{
            "name": "model-guess",
            "summary": "Guessed from the resume",
            "tech_stack": [],
            "complexity_rating": 1.0,
            "resume_bullets": [],
            "improvement_suggestions": []
        }],
        "assets": {
            "resume_bullets_optimized": "- Built things",
            "cover_letter": "Dear team",
            "linkedin_summary": "Engineer",
            "outreach_message": "Hi"
        },
        "portfolio_template": "<html></html>",
        "interview_topics": ["Concurrency"]
    })
}

pub fn repo_analysis_json(project_name: &str) -> Value {
    serde_json::json!({
        "project_name": project_name,
        "short_description": "Does useful work",
        "project_type": "CLI",
        "tech_stack": ["Rust"],
        "complexity_rating": 6.0,
        "recommended_resume_bullets": [format!("Built {project_name}")],
        "improvement_suggestions": ["Add CI"]
    })
}

pub fn highlights_json() -> Value {
    serde_json::json!({
        "overall_feedback": "Quantify impact",
        "segments": [{
            "id": "s1",
            "section": "Experience",
            "original_text": "Worked on backend",
            "rating": "yellow",
            "label": "Vague",
            "comment": "No metrics",
            "suggested_text": "Cut p99 latency by 40%"
        }],
        "summary_counts": {"green": 0, "yellow": 1, "red": 0}
    })
}
