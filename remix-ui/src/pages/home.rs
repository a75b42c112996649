use crate::components::{
    AnalysisDisplay, ErrorDisplay, LoadingSpinner, ScriptDisplay, TopicSelector, TranscriptInput,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use remix_app::domain::{Analysis, GenerationRequest, Pipeline, Script, Stage, TopicChoice, Transcript};
use remix_errors::{AppError, ModelError};

#[cfg(feature = "ssr")]
async fn client_ip() -> std::net::IpAddr {
    use axum::extract::ConnectInfo;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    match leptos_axum::extract::<ConnectInfo<SocketAddr>>().await {
        Ok(ConnectInfo(addr)) => addr.ip(),
        Err(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
    }
}

#[server(AnalyzeTranscriptFn, "/api", endpoint = "analyze_transcript")]
pub async fn analyze_transcript(transcript: String) -> Result<Analysis, AppError> {
    use remix_app::domain::Phase;
    use remix_app::infrastructure::security::InputSanitizer;
    use remix_app::AppContext;

    let ctx = expect_context::<AppContext>();

    let transcript = InputSanitizer::validate_transcript(&transcript)?;
    ctx.admit(client_ip().await, Phase::Analysis)?;
    ctx.analyze_transcript.execute(&transcript).await
}

#[server(GenerateScriptFn, "/api", endpoint = "generate_script")]
pub async fn generate_script(
    transcript: String,
    topic: String,
    analysis: Analysis,
) -> Result<Script, AppError> {
    use remix_app::domain::Phase;
    use remix_app::infrastructure::security::InputSanitizer;
    use remix_app::AppContext;

    let ctx = expect_context::<AppContext>();

    let request = GenerationRequest {
        transcript: InputSanitizer::validate_transcript(&transcript)?,
        topic: InputSanitizer::validate_topic(&topic)?,
        analysis,
    };
    ctx.admit(client_ip().await, Phase::Generation)?;
    ctx.generate_script.execute(&request).await
}

/// What the page does with a finished server call.
enum Landing<T> {
    Landed(Result<T, AppError>),
    Refused(String),
}

/// Refusals never reached the model, so the pipeline goes back to where it
/// was. Anything else is a phase failure with the fixed message.
fn land<T>(outcome: Result<T, AppError>, phase_failure: fn(ModelError) -> AppError) -> Landing<T> {
    match outcome {
        Err(e) if e.is_refusal() => Landing::Refused(e.user_message().to_string()),
        Err(AppError::Internal(detail)) => {
            Landing::Landed(Err(phase_failure(ModelError::Transport(detail))))
        }
        other => Landing::Landed(other),
    }
}

/// The whole wizard lives in one page. The pipeline is the single source of
/// truth; every view below is derived from it.
#[component]
pub fn HomePage() -> impl IntoView {
    let pipeline = RwSignal::new(Pipeline::new());
    let transcript_text = RwSignal::new(String::new());
    let refusal = RwSignal::new(None::<String>);

    let stage = Memo::new(move |_| pipeline.with(|p| p.stage()));
    let is_analyzing = Signal::derive(move || stage.get() == Stage::Analyzing);
    let is_generating = Signal::derive(move || stage.get() == Stage::GeneratingScript);

    let on_analyze = Callback::new(move |raw: String| {
        let Ok(transcript) = Transcript::parse(raw.clone()) else {
            return;
        };
        let previous = pipeline.with_untracked(|p| p.state().clone());
        let Some(Ok(ticket)) = pipeline.try_update(|p| p.begin_analysis(transcript)) else {
            return;
        };
        refusal.set(None);

        spawn_local(async move {
            let outcome = analyze_transcript(raw).await;
            if let Err(e) = &outcome {
                tracing::error!("Error analyzing transcript: {}", e);
            }
            match land(outcome, AppError::Analysis) {
                Landing::Landed(result) => pipeline.update(|p| {
                    p.finish_analysis(ticket, result);
                }),
                Landing::Refused(message) => {
                    pipeline.update(|p| {
                        p.withdraw(ticket, previous);
                    });
                    refusal.set(Some(message));
                }
            }
        });
    });

    let on_select_topic = Callback::new(move |choice: TopicChoice| {
        let previous = pipeline.with_untracked(|p| p.state().clone());
        let Some(Ok((ticket, request))) = pipeline.try_update(|p| p.begin_generation(choice))
        else {
            return;
        };
        refusal.set(None);

        spawn_local(async move {
            let GenerationRequest {
                transcript,
                topic,
                analysis,
            } = request;
            let outcome =
                generate_script(transcript.into_inner(), topic.to_string(), analysis).await;
            if let Err(e) = &outcome {
                tracing::error!("Error generating script: {}", e);
            }
            match land(outcome, AppError::Generation) {
                Landing::Landed(result) => pipeline.update(|p| {
                    p.finish_generation(ticket, result);
                }),
                Landing::Refused(message) => {
                    pipeline.update(|p| {
                        p.withdraw(ticket, previous);
                    });
                    refusal.set(Some(message));
                }
            }
        });
    });

    let on_another_topic = move |_| {
        pipeline.update(|p| {
            let _ = p.choose_another_topic();
        });
    };

    let on_reset = move |_| {
        pipeline.update(|p| p.reset());
        transcript_text.set(String::new());
        refusal.set(None);
    };

    view! {
        <div class="hero">
            <span class="hero__badge">"Gemini 2.5 Flash"</span>
            <h1 class="hero__title">"떡상 대본 리믹서"</h1>
            <p class="hero__subtitle">
                "잘 나가는 영상의 구조를 분석하고, AI가 추천하는 새로운 주제로 대본을 다시 써드립니다."
            </p>
        </div>

        <Show
            when=move || stage.get().accepts_transcript()
            fallback=move || {
                view! {
                    <div class="progress">
                        <span class="progress__done">"✓ 원본 대본 분석 완료"</span>
                        <button type="button" class="link-button" on:click=on_reset>
                            "처음으로 돌아가기"
                        </button>
                    </div>
                }
            }
        >
            <TranscriptInput value=transcript_text on_submit=on_analyze is_loading=is_analyzing/>
            <Show when=move || is_analyzing.get()>
                <LoadingSpinner message="구조 분석 및 주제 추천받기..."/>
            </Show>
        </Show>

        {move || {
            refusal
                .get()
                .or_else(|| pipeline.with(|p| p.error_message().map(str::to_string)))
                .map(|message| view! { <ErrorDisplay message=message/> })
        }}

        {move || {
            let (analysis, script) = pipeline.with(|p| (p.analysis().cloned(), p.script().cloned()));
            analysis
                .map(|analysis| {
                    let suggestions = analysis.suggested_topics.clone();
                    view! {
                        <div class="workspace">
                            <div class="workspace__left">
                                <AnalysisDisplay analysis=analysis/>
                            </div>
                            <div class="workspace__right">
                                {match script {
                                    Some(script) => {
                                        view! {
                                            <ScriptDisplay script=script/>
                                            <div class="script__actions">
                                                <button type="button" class="link-button" on:click=on_another_topic>
                                                    "다른 주제로 다시 만들기"
                                                </button>
                                            </div>
                                        }
                                            .into_any()
                                    }
                                    None => {
                                        view! {
                                            <TopicSelector
                                                suggestions=suggestions
                                                on_select=on_select_topic
                                                is_generating=is_generating
                                            />
                                        }
                                            .into_any()
                                    }
                                }}
                            </div>
                        </div>
                    }
                })
        }}
    }
}
