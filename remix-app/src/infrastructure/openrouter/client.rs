use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::infrastructure::llm::{http_client, to_json_schema, LanguageModel, StructuredPrompt};
use remix_errors::ModelError;
use std::time::Duration;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

pub struct OpenRouterClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Self {
        Self {
            http_client: http_client(timeout),
            api_key,
            model,
        }
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenRouterClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_json(&self, request: &StructuredPrompt) -> Result<String, ModelError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ModelError::MissingApiKey {
                provider: "OpenRouter".to_string(),
            })?;

        let body = ChatCompletionRequest::new(
            &self.model,
            request.prompt.clone(),
            request.name,
            to_json_schema(&request.schema),
            request.temperature,
        );

        let response = self
            .http_client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", "https://viral-remixer.local")
            .header("X-Title", "Viral Remixer")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter error: {} - {}", status, body);
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        completion.text().ok_or(ModelError::EmptyResponse)
    }
}
