#![recursion_limit = "256"]

mod forms;
mod pages;

use axum::{
    extract::ConnectInfo,
    routing::{get, post},
    Form, Router,
};
use forms::{TopicForm, TranscriptForm};
use leptos::prelude::*;
use leptos_axum::{generate_route_list, handle_server_fns_with_context, LeptosRoutes};
use remix_app::config::AppConfig;
use remix_app::AppContext;
use remix_ui::pages::{AnalyzeTranscriptFn, GenerateScriptFn};
use remix_ui::App;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let conf = get_configuration(Some("Cargo.toml")).expect("Failed to load Leptos config");
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app_context = AppContext::from_config(&config);

    let routes = generate_route_list(App);

    server_fn::axum::register_explicit::<AnalyzeTranscriptFn>();
    server_fn::axum::register_explicit::<GenerateScriptFn>();
    tracing::info!("Registered server functions: AnalyzeTranscriptFn, GenerateScriptFn");

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(2)));

    let app = Router::new()
        .route("/wizard", get({
            let ctx = app_context.clone();
            move |session: Session| {
                let ctx = ctx.clone();
                async move { forms::handle_show(ctx, session).await }
            }
        }))
        .route("/wizard/export", get({
            let ctx = app_context.clone();
            move |session: Session| {
                let ctx = ctx.clone();
                async move { forms::handle_export(ctx, session).await }
            }
        }))
        .route("/analyze", post({
            let ctx = app_context.clone();
            move |ConnectInfo(peer): ConnectInfo<SocketAddr>, session: Session, form: Form<TranscriptForm>| {
                let ctx = ctx.clone();
                async move { forms::handle_analyze(ctx, peer.ip(), session, form.0).await }
            }
        }))
        .route("/topic", post({
            let ctx = app_context.clone();
            move |ConnectInfo(peer): ConnectInfo<SocketAddr>, session: Session, form: Form<TopicForm>| {
                let ctx = ctx.clone();
                async move { forms::handle_topic(ctx, peer.ip(), session, form.0).await }
            }
        }))
        .route("/another-topic", post({
            let ctx = app_context.clone();
            move |session: Session| {
                let ctx = ctx.clone();
                async move { forms::handle_another_topic(ctx, session).await }
            }
        }))
        .route("/reset", post({
            let ctx = app_context.clone();
            move |session: Session| {
                let ctx = ctx.clone();
                async move { forms::handle_reset(ctx, session).await }
            }
        }))
        .route("/api/{*fn_name}", post({
            let ctx = app_context.clone();
            move |req| {
                let ctx = ctx.clone();
                async move {
                    handle_server_fns_with_context(
                        move || provide_context(ctx.clone()),
                        req
                    ).await
                }
            }
        }))
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            {
                let ctx = app_context.clone();
                move || provide_context(ctx.clone())
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new())
                .layer(session_layer),
        )
        .with_state(leptos_options);

    tracing::info!("Listening on http://{}", addr);
    tracing::info!(
        "Security: Rate limit 5/min, 20/hour. Daily limit: {} requests",
        app_context.cost_tracker.get_remaining_requests()
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

fn shell(options: LeptosOptions) -> impl IntoView {
    use leptos_meta::*;

    view! {
        <!DOCTYPE html>
        <html lang="ko">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🚀</text></svg>"/>
                <style>{pages::CSS}</style>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}
