// Interview Coach: question generation, answer evaluation, transcription and speech.
// Question and evaluation calls degrade to fixed fallbacks and speech degrades to no
// audio. Transcription errors propagate.

pub mod coach;
pub mod handlers;
pub mod prompts;

pub use coach::InterviewCoach;
