// Prompt templates for the interview coach.

/// Replace `{role}` and `{topic}`.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"You are an interviewer hiring for a {role} position.
Ask one challenging interview question about: {topic}

Give the question a unique question_id, list three to five technical terms a
strong answer would mention as expected_keywords, and offer two short hints."#;

/// Replace `{question_text}` and `{transcript}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this interview answer.

QUESTION:
{question_text}

CANDIDATE ANSWER (TRANSCRIPT):
{transcript}

Score the answer overall and for clarity and technical accuracy (0-100 each),
estimate the candidate's confidence (0.0 to 1.0), list what went well and what
to improve, and write an ideal example answer."#;

pub const TRANSCRIPTION_PROMPT: &str = "Transcribe this audio exactly. Return ONLY the text.";
