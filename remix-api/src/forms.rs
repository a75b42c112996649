//! Plain HTML form flow for browsers running without the wasm bundle.

use crate::pages::{render_error_page, render_wizard_page};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use remix_app::application::SessionId;
use remix_app::domain::{Phase, Pipeline, TopicChoice};
use remix_app::AppContext;
use remix_errors::AppError;
use serde::Deserialize;
use std::net::IpAddr;
use tower_sessions::Session;
use uuid::Uuid;

const WIZARD_KEY: &str = "wizard_id";

#[derive(Deserialize)]
pub struct TranscriptForm {
    transcript: String,
}

#[derive(Deserialize)]
pub struct TopicForm {
    suggested: Option<usize>,
    custom: Option<String>,
}

impl TopicForm {
    fn into_choice(self) -> Result<TopicChoice, AppError> {
        match (self.suggested, self.custom) {
            (Some(index), _) => Ok(TopicChoice::Suggested(index)),
            (None, Some(custom)) => Ok(TopicChoice::Custom(custom)),
            (None, None) => Err(AppError::InvalidInput("주제를 입력해주세요.".to_string())),
        }
    }
}

async fn wizard_id(session: &Session) -> Result<SessionId, AppError> {
    if let Some(id) = existing_wizard_id(session).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session
        .insert(WIZARD_KEY, id)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {}", e)))?;
    tracing::info!(session = %id, "Started wizard session");
    Ok(id)
}

async fn existing_wizard_id(session: &Session) -> Result<Option<SessionId>, AppError> {
    session
        .get::<Uuid>(WIZARD_KEY)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {}", e)))
}

/// Renders the outcome of a wizard action. Refused requests keep the current
/// pipeline on screen with the reason as a notice.
fn respond(ctx: &AppContext, id: SessionId, result: Result<Pipeline, AppError>) -> Response {
    match result {
        Ok(pipeline) => Html(render_wizard_page(&pipeline, None)).into_response(),
        Err(e) => {
            tracing::warn!(session = %id, error = %e, "Wizard request refused");
            let pipeline = ctx.wizard.snapshot(id);
            (
                status_for(&e),
                Html(render_wizard_page(&pipeline, Some(e.user_message()))),
            )
                .into_response()
        }
    }
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    }
}

fn session_failure(e: AppError) -> Response {
    tracing::error!("Session error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render_error_page(e.user_message())),
    )
        .into_response()
}

pub async fn handle_show(ctx: AppContext, session: Session) -> Response {
    match wizard_id(&session).await {
        Ok(id) => Html(render_wizard_page(&ctx.wizard.snapshot(id), None)).into_response(),
        Err(e) => session_failure(e),
    }
}

pub async fn handle_analyze(
    ctx: AppContext,
    client_ip: IpAddr,
    session: Session,
    form: TranscriptForm,
) -> Response {
    let id = match wizard_id(&session).await {
        Ok(id) => id,
        Err(e) => return session_failure(e),
    };

    let result = ctx
        .wizard
        .analyze_admitted(id, &form.transcript, || ctx.admit(client_ip, Phase::Analysis))
        .await;
    respond(&ctx, id, result)
}

pub async fn handle_topic(
    ctx: AppContext,
    client_ip: IpAddr,
    session: Session,
    form: TopicForm,
) -> Response {
    let id = match wizard_id(&session).await {
        Ok(id) => id,
        Err(e) => return session_failure(e),
    };

    let result = match form.into_choice() {
        Ok(choice) => {
            ctx.wizard
                .select_topic_admitted(id, choice, || ctx.admit(client_ip, Phase::Generation))
                .await
        }
        Err(e) => Err(e),
    };
    respond(&ctx, id, result)
}

pub async fn handle_another_topic(ctx: AppContext, session: Session) -> Response {
    match wizard_id(&session).await {
        Ok(id) => {
            let result = ctx.wizard.choose_another_topic(id);
            respond(&ctx, id, result)
        }
        Err(e) => session_failure(e),
    }
}

pub async fn handle_reset(ctx: AppContext, session: Session) -> Response {
    match wizard_id(&session).await {
        Ok(id) => Html(render_wizard_page(&ctx.wizard.reset(id), None)).into_response(),
        Err(e) => session_failure(e),
    }
}

/// `GET /wizard/export`: the finished script as a plain-text download.
pub async fn handle_export(ctx: AppContext, session: Session) -> Response {
    let id = match existing_wizard_id(&session).await {
        Ok(Some(id)) => id,
        Ok(None) => return AppError::SessionNotFound.into_response(),
        Err(e) => return e.into_response(),
    };

    let pipeline = ctx.wizard.snapshot(id);
    match pipeline.script() {
        Some(script) => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"script.txt\""),
            ],
            script.to_plain_text(),
        )
            .into_response(),
        None => AppError::invalid_transition("export", pipeline.stage().as_str()).into_response(),
    }
}
