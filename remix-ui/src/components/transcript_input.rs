use leptos::prelude::*;

/// Step one form. Posts to `/analyze` when scripts are unavailable.
#[component]
pub fn TranscriptInput(
    value: RwSignal<String>,
    #[prop(into)] on_submit: Callback<String>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    let on_form_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let transcript = value.get();
        if !transcript.trim().is_empty() {
            on_submit.run(transcript);
        }
    };

    view! {
        <form class="transcript-form" method="post" action="/analyze" on:submit=on_form_submit>
            <label class="transcript-form__label" for="transcript">
                <span class="step">"1"</span>
                "떡상한 영상의 대본을 붙여넣으세요"
            </label>
            <textarea
                id="transcript"
                name="transcript"
                class="transcript-form__input"
                placeholder="여기에 벤치마킹할 유튜브 영상의 전체 스크립트를 붙여넣으세요 (Ctrl+V)..."
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:disabled=move || is_loading.get()
                required
            ></textarea>
            <button
                type="submit"
                class="transcript-form__button"
                prop:disabled=move || is_loading.get()
            >
                {move || if is_loading.get() { "구조 분석 및 주제 추천받기..." } else { "분석하고 주제 추천받기" }}
            </button>
        </form>
    }
}
