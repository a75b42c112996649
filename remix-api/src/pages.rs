use remix_app::domain::{Analysis, Pipeline, Script, Stage};

const FAVICON: &str = "data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🚀</text></svg>";

pub const CSS: &str = r#"
:root {
    --base: #faf4ed;
    --surface: #fffaf3;
    --overlay: #f2e9e1;
    --muted: #9893a5;
    --subtle: #797593;
    --text: #575279;
    --love: #b4637a;
    --gold: #ea9d34;
    --pine: #286983;
    --foam: #56949f;
    --iris: #907aa9;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: 'Pretendard', 'Inter', -apple-system, sans-serif;
    background: var(--base);
    color: var(--text);
    min-height: 100vh;
}
.container { max-width: 1080px; margin: 0 auto; padding: 1.5rem; }
.hero { text-align: center; padding: 2.5rem 0 1.5rem; }
.hero__badge { display: inline-block; font-size: 0.75rem; font-weight: 700; color: var(--iris); background: var(--surface); border: 1px solid var(--overlay); border-radius: 999px; padding: 0.25rem 0.75rem; margin-bottom: 1rem; }
.hero__title { font-size: clamp(2rem, 5vw, 3rem); color: var(--love); font-weight: 800; margin-bottom: 0.75rem; }
.hero__subtitle { color: var(--subtle); font-size: 1.05rem; max-width: 560px; margin: 0 auto; }
.step { display: inline-flex; align-items: center; justify-content: center; width: 1.6rem; height: 1.6rem; border-radius: 50%; background: var(--iris); color: var(--base); font-size: 0.85rem; margin-right: 0.5rem; }
.transcript-form { display: flex; flex-direction: column; gap: 1rem; margin: 1.5rem 0; }
.transcript-form__label { font-weight: 700; font-size: 1.1rem; }
.transcript-form__input {
    min-height: 14rem; padding: 1rem 1.25rem; border: 2px solid var(--overlay);
    border-radius: 8px; background: var(--surface); color: var(--text); font-size: 0.95rem;
    font-family: inherit; resize: vertical;
}
.transcript-form__input:focus, .topics__input:focus { outline: none; border-color: var(--pine); }
.transcript-form__button, .topics__button {
    padding: 1rem 2rem; background: var(--love); color: var(--base);
    border: none; border-radius: 8px; font-size: 1rem; font-weight: 600; cursor: pointer;
}
.transcript-form__button:disabled, .topics__button:disabled, .topics__option:disabled { background: var(--muted); cursor: not-allowed; }
.progress { display: flex; justify-content: space-between; align-items: center; padding: 1rem 1.25rem; margin: 1rem 0; background: var(--surface); border: 2px solid var(--overlay); border-radius: 8px; }
.progress__done { color: var(--pine); font-weight: 700; }
.link-button { background: none; border: none; color: var(--subtle); text-decoration: underline; cursor: pointer; font-size: 0.9rem; }
.workspace { display: grid; gap: 1.5rem; margin: 1.5rem 0; }
@media (min-width: 960px) { .workspace { grid-template-columns: 5fr 7fr; } }
.analysis, .topics, .script { background: var(--surface); border: 2px solid var(--overlay); border-radius: 12px; padding: 1.5rem; }
.analysis__title { color: var(--pine); font-size: 1.2rem; margin-bottom: 1rem; }
.analysis__grid { display: grid; gap: 1rem; }
.analysis__label { font-size: 0.8rem; text-transform: uppercase; color: var(--subtle); margin-bottom: 0.25rem; }
.analysis__text { line-height: 1.6; }
.analysis__tags { display: flex; flex-wrap: wrap; gap: 0.5rem; list-style: none; }
.analysis__tag { background: var(--overlay); border-radius: 4px; padding: 0.25rem 0.5rem; font-size: 0.85rem; }
.analysis__tag--cta { background: #e3eef3; color: var(--pine); }
.topics__title { font-size: 1.2rem; margin-bottom: 0.5rem; }
.topics__hint { color: var(--subtle); margin-bottom: 1rem; }
.topics__grid { display: grid; gap: 0.75rem; }
.topics__option { width: 100%; text-align: left; padding: 1rem; background: var(--base); border: 2px solid var(--overlay); border-radius: 8px; cursor: pointer; color: var(--text); font-size: 1rem; }
.topics__option:hover { border-color: var(--iris); }
.topics__rank { display: block; font-size: 0.75rem; color: var(--iris); font-weight: 700; margin-bottom: 0.25rem; }
.topics__name { font-weight: 600; }
.topics__divider { text-align: center; color: var(--muted); margin: 1.25rem 0; font-size: 0.85rem; }
.topics__custom { display: flex; gap: 0.5rem; }
.topics__input { flex: 1; padding: 0.75rem 1rem; border: 2px solid var(--overlay); border-radius: 8px; background: var(--base); color: var(--text); font-size: 1rem; }
.script__badge { font-size: 0.75rem; font-weight: 700; color: var(--gold); text-transform: uppercase; }
.script__title { color: var(--love); font-size: 1.5rem; margin: 0.5rem 0; }
.script__thumbnail { color: var(--subtle); padding-bottom: 1rem; border-bottom: 2px solid var(--overlay); }
.script__sections { list-style: none; margin-top: 1rem; }
.script__section { padding: 1rem 0; border-bottom: 1px dashed var(--overlay); }
.script__heading { font-size: 1rem; color: var(--pine); margin-bottom: 0.5rem; }
.script__visual { font-size: 0.85rem; color: var(--subtle); background: var(--overlay); border-radius: 4px; padding: 0.5rem; margin-bottom: 0.5rem; }
.script__audio { line-height: 1.8; white-space: pre-wrap; }
.script__export { margin-top: 1rem; }
.script__export summary { cursor: pointer; color: var(--pine); font-weight: 600; }
.script__plain { width: 100%; margin-top: 0.5rem; padding: 0.75rem; font-family: monospace; font-size: 0.85rem; border: 2px solid var(--overlay); border-radius: 8px; background: var(--base); color: var(--text); }
.script__actions { display: flex; gap: 1rem; justify-content: flex-end; margin-top: 1rem; }
.loading { display: flex; flex-direction: column; align-items: center; padding: 2rem; }
.loading__spinner {
    width: 50px; height: 50px; border: 4px solid var(--overlay);
    border-top-color: var(--gold); border-radius: 50%; animation: spin 1s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.loading__text { margin-top: 1rem; color: var(--subtle); font-style: italic; }
.error { background: #fce8ec; border: 2px solid var(--love); border-radius: 8px; padding: 1.25rem; margin: 1rem 0; }
.error__title { color: var(--love); font-weight: 700; margin-bottom: 0.5rem; }
.error__message { color: #8b3d4d; }
"#;

/// Server-rendered wizard for the form routes. Mirrors the Leptos page markup
/// so both paths share one stylesheet.
pub fn render_wizard_page(pipeline: &Pipeline, notice: Option<&str>) -> String {
    let stage = pipeline.stage();
    let mut body = String::from(
        r#"<div class="hero">
            <span class="hero__badge">Gemini 2.5 Flash</span>
            <h1 class="hero__title">떡상 대본 리믹서</h1>
            <p class="hero__subtitle">잘 나가는 영상의 구조를 분석하고, AI가 추천하는 새로운 주제로 대본을 다시 써드립니다.</p>
        </div>"#,
    );

    if stage.accepts_transcript() {
        let transcript = pipeline.transcript().map(|t| t.as_str()).unwrap_or_default();
        body.push_str(&render_transcript_form(transcript, stage.is_busy()));
    } else {
        body.push_str(
            r#"<form class="progress" method="post" action="/reset">
                <span class="progress__done">✓ 원본 대본 분석 완료</span>
                <button type="submit" class="link-button">처음으로 돌아가기</button>
            </form>"#,
        );
    }

    match stage {
        Stage::Analyzing => {
            body.push_str(&render_loading("구조 분석 및 주제 추천받기..."));
            body.push_str(
                r#"<form class="progress" method="post" action="/reset">
                    <span class="progress__done">분석이 오래 걸리나요?</span>
                    <button type="submit" class="link-button">취소하고 처음으로</button>
                </form>"#,
            );
        }
        Stage::GeneratingScript => body.push_str(&render_loading("새로운 대본 생성 중...")),
        _ => {}
    }

    if let Some(message) = notice.or(pipeline.error_message()) {
        body.push_str(&render_error(message));
    }

    if let Some(analysis) = pipeline.analysis() {
        let right = match pipeline.script() {
            Some(script) => render_script(script),
            None => render_topics(analysis, stage.is_busy()),
        };
        body.push_str(&format!(
            r#"<div class="workspace">
                <div class="workspace__left">{left}</div>
                <div class="workspace__right">{right}</div>
            </div>"#,
            left = render_analysis(analysis),
            right = right
        ));
    }

    // Busy pipelines belong to a request still in flight elsewhere; poll until it lands.
    let refresh = if stage.is_busy() {
        r#"<meta http-equiv="refresh" content="3;url=/wizard">"#
    } else {
        ""
    };

    render_page("떡상 대본 리믹서", refresh, &body)
}

pub fn render_error_page(message: &str) -> String {
    let body = format!(
        r#"{error}<a href="/wizard" class="link-button">돌아가기</a>"#,
        error = render_error(message)
    );
    render_page("오류 - 떡상 대본 리믹서", "", &body)
}

fn render_page(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="icon" href="{FAVICON}">
    {head_extra}
    <style>{CSS}</style>
    <script>history.replaceState(null, '', '/wizard');</script>
</head>
<body>
    <main class="container">{body}</main>
</body>
</html>"#,
        title = escape_html(title),
        FAVICON = FAVICON,
        head_extra = head_extra,
        CSS = CSS,
        body = body
    )
}

fn render_transcript_form(transcript: &str, busy: bool) -> String {
    let disabled = if busy { " disabled" } else { "" };
    format!(
        r#"<form class="transcript-form" method="post" action="/analyze">
            <label class="transcript-form__label" for="transcript"><span class="step">1</span>떡상한 영상의 대본을 붙여넣으세요</label>
            <textarea id="transcript" name="transcript" class="transcript-form__input" placeholder="여기에 벤치마킹할 유튜브 영상의 전체 스크립트를 붙여넣으세요 (Ctrl+V)..." required{disabled}>{transcript}</textarea>
            <button type="submit" class="transcript-form__button"{disabled}>분석하고 주제 추천받기</button>
        </form>"#,
        transcript = escape_html(transcript),
        disabled = disabled
    )
}

fn render_loading(message: &str) -> String {
    format!(
        r#"<div class="loading"><div class="loading__spinner"></div><p class="loading__text">{}</p></div>"#,
        escape_html(message)
    )
}

fn render_error(message: &str) -> String {
    format!(
        r#"<div class="error" role="alert"><p class="error__title">앗, 문제가 생겼어요!</p><p class="error__message">{}</p></div>"#,
        escape_html(message)
    )
}

fn render_analysis(analysis: &Analysis) -> String {
    let tags: String = analysis
        .retention_techniques
        .iter()
        .map(|t| format!(r#"<li class="analysis__tag">#{}</li>"#, escape_html(t)))
        .collect();

    format!(
        r#"<section class="analysis">
            <h2 class="analysis__title">떡상 포인트 분석 (Viral Formula)</h2>
            <div class="analysis__grid">
                <div class="analysis__item"><h3 class="analysis__label">초반 훅 (Hook)</h3><p class="analysis__text">{hook}</p></div>
                <div class="analysis__item"><h3 class="analysis__label">호흡 및 편집 박자</h3><p class="analysis__text">{pacing}</p></div>
                <div class="analysis__item"><h3 class="analysis__label">감정선 흐름</h3><p class="analysis__text">{arc}</p></div>
                <div class="analysis__item"><h3 class="analysis__label">이탈 방지 장치 (Retention)</h3>
                    <ul class="analysis__tags">{tags}<li class="analysis__tag analysis__tag--cta">CTA: {cta}</li></ul>
                </div>
            </div>
        </section>"#,
        hook = escape_html(&analysis.hook_strategy),
        pacing = escape_html(&analysis.pacing_structure),
        arc = escape_html(&analysis.emotional_arc),
        tags = tags,
        cta = escape_html(&analysis.call_to_action_type)
    )
}

fn render_topics(analysis: &Analysis, busy: bool) -> String {
    let disabled = if busy { " disabled" } else { "" };
    let options: String = analysis
        .suggested_topics
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            format!(
                r#"<form method="post" action="/topic">
                    <input type="hidden" name="suggested" value="{i}">
                    <button type="submit" class="topics__option"{disabled}><span class="topics__rank">추천 {rank}</span><span class="topics__name">{topic}</span></button>
                </form>"#,
                i = i,
                rank = i + 1,
                topic = escape_html(topic),
                disabled = disabled
            )
        })
        .collect();

    format!(
        r#"<section class="topics">
            <h2 class="topics__title"><span class="step">2</span>어떤 주제로 만들어볼까요?</h2>
            <p class="topics__hint">분석된 구조에 딱 맞는 주제들을 AI가 추천했습니다. 하나를 선택하거나 직접 입력하세요.</p>
            <div class="topics__grid">{options}</div>
            <p class="topics__divider">또는 직접 입력</p>
            <form class="topics__custom" method="post" action="/topic">
                <input type="text" name="custom" class="topics__input" placeholder="원하는 다른 주제가 있다면 입력하세요..." required{disabled}>
                <button type="submit" class="topics__button"{disabled}>생성하기</button>
            </form>
        </section>"#,
        options = options,
        disabled = disabled
    )
}

fn render_script(script: &Script) -> String {
    let sections: String = script
        .sections
        .iter()
        .map(|s| {
            format!(
                r#"<li class="script__section"><h3 class="script__heading">{heading}</h3><p class="script__visual">{visual}</p><p class="script__audio">{audio}</p></li>"#,
                heading = escape_html(&s.heading),
                visual = escape_html(&s.visual_cue),
                audio = escape_html(&s.audio_script)
            )
        })
        .collect();

    format!(
        r#"<article class="script">
            <header class="script__header">
                <span class="script__badge">Generated Script</span>
                <h2 class="script__title">{title}</h2>
                <p class="script__thumbnail"><strong>Thumbnail Idea: </strong>{thumbnail}</p>
            </header>
            <ol class="script__sections">{sections}</ol>
            <details class="script__export">
                <summary>텍스트로 복사하기</summary>
                <textarea class="script__plain" readonly rows="12">{plain}</textarea>
            </details>
        </article>
        <div class="script__actions">
            <a href="/wizard/export" class="link-button">텍스트 파일로 받기</a>
            <form method="post" action="/another-topic"><button type="submit" class="link-button">다른 주제로 다시 만들기</button></form>
        </div>"#,
        title = escape_html(&script.title),
        thumbnail = escape_html(&script.thumbnail_idea),
        sections = sections,
        plain = escape_html(&script.to_plain_text())
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
