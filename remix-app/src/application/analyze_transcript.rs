use crate::domain::{Analysis, Transcript, SUGGESTED_TOPIC_COUNT};
use crate::infrastructure::llm::{build_analysis_prompt, strip_code_fence, LanguageModel};
use remix_errors::{AppError, ModelError};
use std::sync::Arc;

/// Phase one: extract the viral formula and suggest new topics.
pub struct AnalyzeTranscript {
    model: Arc<dyn LanguageModel>,
}

impl AnalyzeTranscript {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn execute(&self, transcript: &Transcript) -> Result<Analysis, AppError> {
        self.request_analysis(transcript).await.map_err(|e| {
            tracing::error!(model = self.model.name(), error = %e, "Error analyzing transcript");
            AppError::Analysis(e)
        })
    }

    async fn request_analysis(&self, transcript: &Transcript) -> Result<Analysis, ModelError> {
        let request = build_analysis_prompt(transcript);
        let raw = self.model.generate_json(&request).await?;
        let analysis: Analysis = serde_json::from_str(strip_code_fence(&raw))?;
        let analysis = analysis.normalized()?;

        if analysis.suggested_topics.len() != SUGGESTED_TOPIC_COUNT {
            tracing::warn!(
                count = analysis.suggested_topics.len(),
                "Model returned an unexpected number of suggested topics"
            );
        }

        tracing::info!(
            topics = analysis.suggested_topics.len(),
            transcript_chars = transcript.as_str().chars().count(),
            "Transcript analyzed"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::testing::{ScriptedModel, ANALYSIS_JSON};
    use crate::infrastructure::llm::{analysis_schema, TEMPERATURE};

    fn transcript() -> Transcript {
        Transcript::parse("Hook: did you know... [body] ... subscribe!").unwrap()
    }

    #[tokio::test]
    async fn test_returns_parsed_analysis() {
        let model = Arc::new(ScriptedModel::new().respond(ANALYSIS_JSON));
        let use_case = AnalyzeTranscript::new(model.clone());

        let analysis = use_case.execute(&transcript()).await.unwrap();
        assert_eq!(analysis.suggested_topics.len(), 5);
        assert_eq!(analysis.hook_strategy, "첫 3초에 질문을 던진다");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].prompt.contains("Hook: did you know... [body] ... subscribe!"));
        assert_eq!(prompts[0].schema, analysis_schema());
        assert_eq!(prompts[0].temperature, TEMPERATURE);
    }

    #[tokio::test]
    async fn test_accepts_fenced_json() {
        let fenced = format!("```json\n{}\n```", ANALYSIS_JSON);
        let use_case = AnalyzeTranscript::new(Arc::new(ScriptedModel::new().respond(fenced)));
        assert!(use_case.execute(&transcript()).await.is_ok());
    }

    #[tokio::test]
    async fn test_transport_failure_is_analysis_error() {
        let model = ScriptedModel::new().fail(ModelError::Transport("connection reset".to_string()));
        let use_case = AnalyzeTranscript::new(Arc::new(model));

        let err = use_case.execute(&transcript()).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Analysis(ModelError::Transport("connection reset".to_string()))
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_is_analysis_error() {
        let model = ScriptedModel::new().respond(r#"{"hookStrategy": "only one field"}"#);
        let use_case = AnalyzeTranscript::new(Arc::new(model));

        let err = use_case.execute(&transcript()).await.unwrap_err();
        assert!(matches!(err, AppError::Analysis(ModelError::MalformedPayload(_))));
    }

    #[tokio::test]
    async fn test_empty_response_is_analysis_error() {
        let use_case = AnalyzeTranscript::new(Arc::new(
            ScriptedModel::new().fail(ModelError::EmptyResponse),
        ));
        assert_eq!(
            use_case.execute(&transcript()).await.unwrap_err(),
            AppError::Analysis(ModelError::EmptyResponse)
        );
    }
}
