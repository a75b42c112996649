use crate::ModelError;
use serde::{Deserialize, Serialize};
use server_fn::codec::JsonEncoding;
use server_fn::error::{FromServerFnError, ServerFnErrorErr};

pub const ANALYSIS_FAILED_MESSAGE: &str =
    "대본 분석 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "대본 생성 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("입력값이 올바르지 않습니다: {0}")]
    InvalidInput(String),

    #[error("대본 분석 실패: {0}")]
    Analysis(ModelError),

    #[error("대본 생성 실패: {0}")]
    Generation(ModelError),

    #[error("'{state}' 단계에서는 '{action}' 요청을 처리할 수 없습니다")]
    InvalidTransition { action: String, state: String },

    #[error("요청 제한: {0}")]
    RateLimited(String),

    #[error("세션을 찾을 수 없습니다")]
    SessionNotFound,

    #[error("내부 오류: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_transition(action: &str, state: &str) -> Self {
        Self::InvalidTransition {
            action: action.to_string(),
            state: state.to_string(),
        }
    }

    /// Requests turned away before any model call ran. The pipeline is left
    /// as it was and the reason is shown as-is.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidTransition { .. }
                | Self::RateLimited(_)
                | Self::SessionNotFound
        )
    }

    /// Message safe to show to the user. Upstream detail never leaks through here.
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidInput(msg) => msg,
            Self::Analysis(_) => ANALYSIS_FAILED_MESSAGE,
            Self::Generation(_) => GENERATION_FAILED_MESSAGE,
            Self::InvalidTransition { .. } => "지금은 그 작업을 할 수 없습니다. 진행 중인 작업이 끝날 때까지 기다려주세요.",
            Self::RateLimited(msg) => msg,
            Self::SessionNotFound => "세션이 만료되었습니다. 처음부터 다시 시작해주세요.",
            Self::Internal(_) => "서버에 문제가 발생했습니다. 잠시 후 다시 시도해주세요.",
        }
    }
}

impl FromServerFnError for AppError {
    type Encoder = JsonEncoding;

    fn from_server_fn_error(value: ServerFnErrorErr) -> Self {
        Self::Internal(value.to_string())
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = match &self {
                AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AppError::Analysis(_) | AppError::Generation(_) => StatusCode::BAD_GATEWAY,
                AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
                AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::SessionNotFound => StatusCode::NOT_FOUND,
                AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = self.user_message().to_string();
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
