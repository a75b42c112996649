use crate::domain::{Topic, Transcript};
use remix_errors::AppError;

const SUSPICIOUS_PHRASES: &[&str] = &[
    "ignore previous",
    "ignore all",
    "disregard",
    "forget your",
    "new instructions",
    "system prompt",
    "you are now",
    "pretend to be",
    "jailbreak",
    "developer mode",
    "이전 지시",
    "지시를 무시",
    "시스템 프롬프트",
    "새로운 지시",
];

/// Entry checks for user text. Transcripts go to the model verbatim, so
/// suspicious phrases are only logged, never rewritten.
pub struct InputSanitizer;

impl InputSanitizer {
    pub fn validate_transcript(raw: &str) -> Result<Transcript, AppError> {
        let transcript = Transcript::parse(raw)?;
        Self::flag_injection("transcript", transcript.as_str());
        Ok(transcript)
    }

    pub fn validate_topic(raw: &str) -> Result<Topic, AppError> {
        let topic = Topic::parse(raw)?;
        Self::flag_injection("topic", topic.as_str());
        Ok(topic)
    }

    /// Returns whether the text was flagged.
    pub fn flag_injection(field: &str, input: &str) -> bool {
        let Some(phrase) = Self::find_injection_attempt(input) else {
            return false;
        };
        tracing::warn!(field, phrase, "Potential prompt injection detected");
        true
    }

    fn find_injection_attempt(input: &str) -> Option<&'static str> {
        let lower = input.to_lowercase();
        SUSPICIOUS_PHRASES
            .iter()
            .copied()
            .find(|phrase| lower.contains(phrase))
    }
}
