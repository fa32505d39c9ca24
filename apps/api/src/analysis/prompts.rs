// Prompt templates for the profile analyzers.
// The response shape is enforced through the request schema, so prompts only
// describe the task. Placeholders are `{name}`, filled with `fill_template`.

/// Per-repository analysis. Replace `{repo_name}`, `{repo_url}`, `{language_summary}`, `{files_bundle}`.
pub const REPO_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are CareerCompass AI, an expert reviewer of GitHub repositories.

Assess the repository below as evidence of the author's engineering ability.
Identify what kind of project it is, the technologies it uses, how complex it is
(complexity_rating from 0 to 10), resume bullets the author could honestly claim,
and concrete improvements that would make it more impressive to a hiring manager.

REPOSITORY: {repo_name} ({repo_url})
LANGUAGES: {language_summary}

FILES:
{files_bundle}"#;

/// Resume highlighting. Sent after the resume attachment.
pub const RESUME_HIGHLIGHTS_PROMPT: &str = "\
Review the attached resume segment by segment. \
Rate each segment green (strong), yellow (needs work) or red (weak or harmful), \
label it, explain the rating, and suggest replacement text where it would help. \
Report the number of segments in each rating.";

/// Placeholder used when the role text is blank.
pub const AUTO_DETECT_ROLE: &str = "UNSPECIFIED - infer the best-fit role from the resume";

/// GitHub digest used when no repository was analyzed.
pub const NO_REPOSITORIES: &str = "No valid GitHub repositories found.";

/// Main profile analysis. Replace `{target_role}` and `{github_summary}`.
pub const PROFILE_PROMPT_TEMPLATE: &str = r#"You are CareerCompass AI, acting as a strict hiring manager at a top-tier technology company.
Give a realistic, evidence-based assessment of the candidate whose resume is attached.

TARGET ROLE / JOB DESCRIPTION:
{target_role}

GITHUB SUMMARY:
{github_summary}

Cover: detected role and market demand, competency scores and skill gaps,
a three-phase 90-day roadmap with effort estimates, application assets
(optimized bullets, cover letter, LinkedIn summary, outreach message),
a portfolio website template, and interview preparation topics."#;
