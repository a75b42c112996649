use remix_errors::ModelError;
use serde::{Deserialize, Serialize};

/// Number of topics the analysis prompt asks the model for.
pub const SUGGESTED_TOPIC_COUNT: usize = 5;

/// Why the source video worked, plus candidate topics that fit the same formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub hook_strategy: String,
    pub retention_techniques: Vec<String>,
    pub emotional_arc: String,
    pub pacing_structure: String,
    pub call_to_action_type: String,
    pub suggested_topics: Vec<String>,
}

impl Analysis {
    /// Cleans up an upstream payload: trims list entries, drops blank ones and
    /// removes duplicate topics (first wins). Fails when a description field is
    /// blank or no usable topic is left.
    pub fn normalized(mut self) -> Result<Self, ModelError> {
        let fields = [
            ("hookStrategy", &self.hook_strategy),
            ("emotionalArc", &self.emotional_arc),
            ("pacingStructure", &self.pacing_structure),
            ("callToActionType", &self.call_to_action_type),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ModelError::malformed(format!("{name} is blank")));
        }

        self.retention_techniques = clean_list(self.retention_techniques);
        self.suggested_topics = clean_list(self.suggested_topics);

        if self.suggested_topics.is_empty() {
            return Err(ModelError::malformed("suggestedTopics is empty"));
        }

        Ok(self)
    }

    pub fn topic(&self, index: usize) -> Option<&str> {
        self.suggested_topics.get(index).map(String::as_str)
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if item.is_empty() || cleaned.iter().any(|seen| seen == item) {
            continue;
        }
        cleaned.push(item.to_string());
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Analysis {
        Analysis {
            hook_strategy: "충격적인 질문으로 시작".to_string(),
            retention_techniques: vec!["궁금증 유발".to_string(), "빠른 컷 전환".to_string()],
            emotional_arc: "호기심 → 놀람 → 만족".to_string(),
            pacing_structure: "3초마다 컷".to_string(),
            call_to_action_type: "마지막에 구독 요청".to_string(),
            suggested_topics: vec![
                "편의점 꿀조합".to_string(),
                "자취 요리".to_string(),
                "출근길 루틴".to_string(),
                "반려견 훈련".to_string(),
                "여행 짐싸기".to_string(),
            ],
        }
    }

    #[test]
    fn test_deserializes_camel_case_payload() {
        let json = r#"{
            "hookStrategy": "h",
            "retentionTechniques": ["a", "b"],
            "emotionalArc": "e",
            "pacingStructure": "p",
            "callToActionType": "c",
            "suggestedTopics": ["1", "2", "3", "4", "5"]
        }"#;
        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.hook_strategy, "h");
        assert_eq!(analysis.suggested_topics.len(), 5);
    }

    #[test]
    fn test_missing_field_fails_to_deserialize() {
        let json = r#"{"hookStrategy": "h", "emotionalArc": "e"}"#;
        assert!(serde_json::from_str::<Analysis>(json).is_err());
    }

    #[test]
    fn test_normalized_keeps_clean_analysis() {
        let analysis = sample().normalized().unwrap();
        assert_eq!(analysis, sample());
    }

    #[test]
    fn test_normalized_dedupes_and_trims_topics() {
        let mut analysis = sample();
        analysis.suggested_topics = vec![
            " 편의점 꿀조합 ".to_string(),
            "편의점 꿀조합".to_string(),
            "".to_string(),
            "자취 요리".to_string(),
        ];
        let analysis = analysis.normalized().unwrap();
        assert_eq!(analysis.suggested_topics, vec!["편의점 꿀조합", "자취 요리"]);
    }

    #[test]
    fn test_normalized_rejects_blank_topics() {
        let mut analysis = sample();
        analysis.suggested_topics = vec!["  ".to_string()];
        assert!(matches!(
            analysis.normalized(),
            Err(ModelError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_normalized_rejects_blank_hook() {
        let mut analysis = sample();
        analysis.hook_strategy = " ".to_string();
        let err = analysis.normalized().unwrap_err();
        assert!(err.to_string().contains("hookStrategy"));
    }

    #[test]
    fn test_topic_lookup() {
        let analysis = sample();
        assert_eq!(analysis.topic(2), Some("출근길 루틴"));
        assert_eq!(analysis.topic(SUGGESTED_TOPIC_COUNT), None);
    }
}
