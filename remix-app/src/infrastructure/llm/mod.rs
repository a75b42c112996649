mod prompt;
mod schema;

pub use prompt::{build_analysis_prompt, build_script_prompt, TEMPERATURE};
pub use schema::{analysis_schema, script_schema, to_json_schema};

use remix_errors::ModelError;
use std::time::Duration;

/// One structured completion: instruction text plus the shape the answer must take.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub name: &'static str,
    pub prompt: String,
    pub schema: serde_json::Value,
    pub temperature: f32,
}

/// Hosted model that answers with JSON text conforming to a response schema.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate_json(&self, request: &StructuredPrompt) -> Result<String, ModelError>;
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

/// Some models wrap JSON in a markdown fence even in JSON mode.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
