use crate::infrastructure::{gemini, openrouter};
use remix_errors::AppError;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    Gemini,
    OpenRouter,
}

impl LlmProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenRouter => "OpenRouter",
        }
    }

    pub fn key_var(&self) -> &'static str {
        match self {
            Self::Gemini => "API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(AppError::Internal(format!("unknown LLM_PROVIDER '{}'", other))),
        }
    }
}

/// Runtime settings, read from the environment (and `.env` via dotenvy in the binary).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub model: String,
    pub gemini_base_url: Url,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => LlmProvider::default(),
        };

        let api_key = match provider {
            LlmProvider::Gemini => var("API_KEY").or_else(|| var("GEMINI_API_KEY")),
            LlmProvider::OpenRouter => var("OPENROUTER_API_KEY"),
        };

        let model = var("LLM_MODEL").unwrap_or_else(|| match provider {
            LlmProvider::Gemini => gemini::DEFAULT_MODEL.to_string(),
            LlmProvider::OpenRouter => openrouter::DEFAULT_MODEL.to_string(),
        });

        let base = var("GEMINI_BASE_URL").unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());
        let gemini_base_url = parse_base_url(&base)?;

        let request_timeout = match var("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| AppError::Internal(format!("invalid LLM_TIMEOUT_SECS '{}'", raw)))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            provider,
            api_key,
            model,
            gemini_base_url,
            request_timeout,
        })
    }

    /// A missing key is not fatal: the server starts and model calls fail instead.
    pub fn log_missing_credentials(&self) {
        if self.api_key.is_none() {
            tracing::error!(
                "{} is missing in the environment variables; {} calls will fail",
                self.provider.key_var(),
                self.provider.name()
            );
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized)
        .map_err(|e| AppError::Internal(format!("invalid GEMINI_BASE_URL '{}': {}", raw, e)))
}
