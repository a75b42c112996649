use leptos::prelude::*;
use remix_app::domain::Script;

#[component]
pub fn ScriptDisplay(script: Script) -> impl IntoView {
    let plain_text = script.to_plain_text();

    view! {
        <article class="script">
            <header class="script__header">
                <span class="script__badge">"Generated Script"</span>
                <h2 class="script__title">{script.title}</h2>
                <p class="script__thumbnail">
                    <strong>"Thumbnail Idea: "</strong>
                    {script.thumbnail_idea}
                </p>
            </header>
            <ol class="script__sections">
                {script
                    .sections
                    .into_iter()
                    .map(|section| {
                        view! {
                            <li class="script__section">
                                <h3 class="script__heading">{section.heading}</h3>
                                <p class="script__visual">{section.visual_cue}</p>
                                <p class="script__audio">{section.audio_script}</p>
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()}
            </ol>
            <details class="script__export">
                <summary>"텍스트로 복사하기"</summary>
                <textarea class="script__plain" readonly rows="12">{plain_text}</textarea>
            </details>
        </article>
    }
}
