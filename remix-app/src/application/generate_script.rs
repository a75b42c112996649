use crate::domain::{GenerationRequest, Script};
use crate::infrastructure::llm::{build_script_prompt, strip_code_fence, LanguageModel};
use remix_errors::{AppError, ModelError};
use std::sync::Arc;

/// Phase two: write a new script for the chosen topic in the analyzed style.
pub struct GenerateScript {
    model: Arc<dyn LanguageModel>,
}

impl GenerateScript {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn execute(&self, request: &GenerationRequest) -> Result<Script, AppError> {
        self.request_script(request).await.map_err(|e| {
            tracing::error!(
                model = self.model.name(),
                topic = %request.topic,
                error = %e,
                "Error generating script"
            );
            AppError::Generation(e)
        })
    }

    async fn request_script(&self, request: &GenerationRequest) -> Result<Script, ModelError> {
        let prompt = build_script_prompt(request);
        let raw = self.model.generate_json(&prompt).await?;
        let script: Script = serde_json::from_str(strip_code_fence(&raw))?;
        let script = script.validated()?;

        tracing::info!(
            topic = %request.topic,
            sections = script.sections.len(),
            "Script generated"
        );
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Analysis, Topic, Transcript};
    use crate::infrastructure::llm::testing::{ScriptedModel, ANALYSIS_JSON, SCRIPT_JSON};
    use crate::infrastructure::llm::script_schema;

    fn request() -> GenerationRequest {
        GenerationRequest {
            transcript: Transcript::parse("원본 대본").unwrap(),
            topic: Topic::parse("출근길 루틴").unwrap(),
            analysis: serde_json::from_str::<Analysis>(ANALYSIS_JSON).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_returns_script_in_section_order() {
        let model = Arc::new(ScriptedModel::new().respond(SCRIPT_JSON));
        let use_case = GenerateScript::new(model.clone());

        let script = use_case.execute(&request()).await.unwrap();
        assert_eq!(script.title, "출근길 10분이 인생을 바꾼다?");
        assert_eq!(script.sections[0].heading, "Intro");
        assert_eq!(script.sections[0].visual_cue, "close-up");

        let prompts = model.prompts();
        assert!(prompts[0].prompt.contains("출근길 루틴"));
        assert!(prompts[0].prompt.contains("원본 대본"));
        assert_eq!(prompts[0].schema, script_schema());
    }

    #[tokio::test]
    async fn test_script_without_sections_is_rejected() {
        let model = ScriptedModel::new().respond(r#"{"title": "t", "thumbnailIdea": "i", "sections": []}"#);
        let use_case = GenerateScript::new(Arc::new(model));

        let err = use_case.execute(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(ModelError::MalformedPayload(_))));
    }

    #[tokio::test]
    async fn test_upstream_status_is_generation_error() {
        let model = ScriptedModel::new().fail(ModelError::Status {
            status: 503,
            body: "overloaded".to_string(),
        });
        let use_case = GenerateScript::new(Arc::new(model));

        let err = use_case.execute(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(ModelError::Status { status: 503, .. })));
    }
}
