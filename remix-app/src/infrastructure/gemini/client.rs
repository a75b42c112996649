use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::infrastructure::llm::{http_client, LanguageModel, StructuredPrompt};
use remix_errors::ModelError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: Url,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, base_url: Url, timeout: Duration) -> Self {
        Self {
            http_client: http_client(timeout),
            api_key,
            model,
            base_url,
        }
    }

    fn endpoint(&self) -> Result<Url, ModelError> {
        self.base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|e| ModelError::Transport(format!("invalid endpoint: {}", e)))
    }
}

#[async_trait::async_trait]
impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate_json(&self, request: &StructuredPrompt) -> Result<String, ModelError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ModelError::MissingApiKey {
                provider: "Gemini".to_string(),
            })?;

        let body = GenerateContentRequest::new(
            request.prompt.clone(),
            request.schema.clone(),
            request.temperature,
        );

        let response = self
            .http_client
            .post(self.endpoint()?)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini error: {} - {}", status, body);
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        completion.text().ok_or_else(|| {
            tracing::warn!(
                schema = request.name,
                finish_reason = completion.finish_reason().unwrap_or("unknown"),
                "Gemini returned no text"
            );
            ModelError::EmptyResponse
        })
    }
}
