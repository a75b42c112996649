use serde::{Deserialize, Serialize};

/// Failure of a single structured call to the hosted model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ModelError {
    #[error("API key for {provider} is not configured")]
    MissingApiKey { provider: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream returned no content")]
    EmptyResponse,

    #[error("upstream payload does not match the expected shape: {0}")]
    MalformedPayload(String),
}

impl ModelError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}
