use super::LoadingSpinner;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use remix_app::domain::TopicChoice;

/// Step two: pick a suggested topic or type one. Each choice is its own form
/// posting to `/topic`, so the page also works without scripts.
#[component]
pub fn TopicSelector(
    suggestions: Vec<String>,
    #[prop(into)] on_select: Callback<TopicChoice>,
    #[prop(into)] is_generating: Signal<bool>,
) -> impl IntoView {
    let custom_topic = RwSignal::new(String::new());

    let on_custom_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let topic = custom_topic.get();
        if !topic.trim().is_empty() {
            on_select.run(TopicChoice::Custom(topic));
        }
    };

    view! {
        <section class="topics">
            <h2 class="topics__title">
                <span class="step">"2"</span>
                "어떤 주제로 만들어볼까요?"
            </h2>
            <p class="topics__hint">
                "분석된 구조에 딱 맞는 주제들을 AI가 추천했습니다. 하나를 선택하거나 직접 입력하세요."
            </p>
            <div class="topics__grid">
                {suggestions
                    .into_iter()
                    .enumerate()
                    .map(|(index, topic)| {
                        let on_pick = move |ev: SubmitEvent| {
                            ev.prevent_default();
                            on_select.run(TopicChoice::Suggested(index));
                        };
                        view! {
                            <form method="post" action="/topic" on:submit=on_pick>
                                <input type="hidden" name="suggested" value=index.to_string()/>
                                <button
                                    type="submit"
                                    class="topics__option"
                                    prop:disabled=move || is_generating.get()
                                >
                                    <span class="topics__rank">"추천 " {index + 1}</span>
                                    <span class="topics__name">{topic}</span>
                                </button>
                            </form>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
            <p class="topics__divider">"또는 직접 입력"</p>
            <form class="topics__custom" method="post" action="/topic" on:submit=on_custom_submit>
                <input
                    type="text"
                    name="custom"
                    class="topics__input"
                    placeholder="원하는 다른 주제가 있다면 입력하세요..."
                    prop:value=move || custom_topic.get()
                    on:input=move |ev| custom_topic.set(event_target_value(&ev))
                    prop:disabled=move || is_generating.get()
                />
                <button
                    type="submit"
                    class="topics__button"
                    prop:disabled=move || is_generating.get()
                >
                    {move || if is_generating.get() { "생성 중..." } else { "생성하기" }}
                </button>
            </form>
            <Show when=move || is_generating.get()>
                <LoadingSpinner message="새로운 대본 생성 중... 선택한 주제로 구조를 재조립하고 있습니다."/>
            </Show>
        </section>
    }
}
