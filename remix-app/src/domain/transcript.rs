use remix_errors::AppError;
use serde::{Deserialize, Serialize};

/// Source transcript pasted by the user. Kept verbatim, only checked for content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    pub fn parse(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AppError::InvalidInput("대본을 입력해주세요.".to_string()));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Subject of the script to generate, either suggested or typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, AppError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("주제를 입력해주세요.".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_rejects_blank() {
        assert!(Transcript::parse("").is_err());
        assert!(Transcript::parse("   \n\t ").is_err());
    }

    #[test]
    fn test_transcript_is_kept_verbatim() {
        let raw = "  Hook: did you know...\n[body]\n... subscribe!  ";
        let transcript = Transcript::parse(raw).unwrap();
        assert_eq!(transcript.as_str(), raw);
    }

    #[test]
    fn test_topic_is_trimmed() {
        let topic = Topic::parse("  편의점 꿀조합  ").unwrap();
        assert_eq!(topic.as_str(), "편의점 꿀조합");
        assert!(Topic::parse("   ").is_err());
    }
}
