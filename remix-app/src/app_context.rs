use crate::application::{AnalyzeTranscript, GenerateScript, Wizard};
use crate::config::{AppConfig, LlmProvider};
use crate::domain::Phase;
use crate::infrastructure::gemini::GeminiClient;
use crate::infrastructure::llm::LanguageModel;
use crate::infrastructure::openrouter::OpenRouterClient;
use crate::infrastructure::security::{CostTracker, RateLimiter};
use crate::infrastructure::SessionStore;
use remix_errors::AppError;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// Extra time granted to a phase beyond the HTTP timeout before its session
/// counts as abandoned.
const BUSY_GRACE: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppContext {
    pub analyze_transcript: Arc<AnalyzeTranscript>,
    pub generate_script: Arc<GenerateScript>,
    pub wizard: Arc<Wizard>,
    pub rate_limiter: RateLimiter,
    pub cost_tracker: Arc<CostTracker>,
}

impl AppContext {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::with_sessions(model, SessionStore::new())
    }

    pub fn with_sessions(model: Arc<dyn LanguageModel>, sessions: SessionStore) -> Self {
        let analyze_transcript = Arc::new(AnalyzeTranscript::new(model.clone()));
        let generate_script = Arc::new(GenerateScript::new(model));
        let wizard = Arc::new(Wizard::new(
            analyze_transcript.clone(),
            generate_script.clone(),
            sessions,
        ));

        Self {
            analyze_transcript,
            generate_script,
            wizard,
            rate_limiter: RateLimiter::new(),
            cost_tracker: Arc::new(CostTracker::new()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        config.log_missing_credentials();

        let model: Arc<dyn LanguageModel> = match config.provider {
            LlmProvider::Gemini => Arc::new(GeminiClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.gemini_base_url.clone(),
                config.request_timeout,
            )),
            LlmProvider::OpenRouter => Arc::new(OpenRouterClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.request_timeout,
            )),
        };

        tracing::info!(
            "Using {} backend with model {}",
            config.provider.name(),
            config.model
        );
        let sessions =
            SessionStore::new().with_busy_timeout(config.request_timeout + BUSY_GRACE);
        Self::with_sessions(model, sessions)
    }

    pub fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        Ok(Self::from_config(&config))
    }

    /// Rate and budget check performed before every model call.
    pub fn admit(&self, client_ip: IpAddr, phase: Phase) -> Result<(), AppError> {
        self.rate_limiter.check_rate_limit(client_ip)?;
        self.cost_tracker.check_and_increment(phase)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::testing::ScriptedModel;
    use std::net::Ipv4Addr;

    #[test]
    fn test_admit_applies_rate_limit() {
        let mut ctx = AppContext::new(Arc::new(ScriptedModel::new()));
        ctx.rate_limiter = RateLimiter::with_limits(1, 10);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);

        assert!(ctx.admit(ip, Phase::Analysis).is_ok());
        assert!(matches!(
            ctx.admit(ip, Phase::Generation),
            Err(AppError::RateLimited(_))
        ));
    }

    #[test]
    fn test_admit_applies_daily_budget() {
        let mut ctx = AppContext::new(Arc::new(ScriptedModel::new()));
        ctx.cost_tracker = Arc::new(CostTracker::with_limits(1, 100));

        assert!(ctx.admit(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), Phase::Analysis).is_ok());
        assert!(ctx.admit(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), Phase::Analysis).is_err());
    }
}
