use leptos::prelude::*;
use remix_app::domain::Analysis;

#[component]
pub fn AnalysisDisplay(analysis: Analysis) -> impl IntoView {
    view! {
        <section class="analysis">
            <h2 class="analysis__title">"떡상 포인트 분석 (Viral Formula)"</h2>
            <div class="analysis__grid">
                <div class="analysis__item analysis__item--hook">
                    <h3 class="analysis__label">"초반 훅 (Hook)"</h3>
                    <p class="analysis__text">{analysis.hook_strategy}</p>
                </div>
                <div class="analysis__item analysis__item--pacing">
                    <h3 class="analysis__label">"호흡 및 편집 박자"</h3>
                    <p class="analysis__text">{analysis.pacing_structure}</p>
                </div>
                <div class="analysis__item analysis__item--wide">
                    <h3 class="analysis__label">"감정선 흐름"</h3>
                    <p class="analysis__text">{analysis.emotional_arc}</p>
                </div>
                <div class="analysis__item analysis__item--wide">
                    <h3 class="analysis__label">"이탈 방지 장치 (Retention)"</h3>
                    <ul class="analysis__tags">
                        {analysis
                            .retention_techniques
                            .into_iter()
                            .map(|technique| view! { <li class="analysis__tag">"#" {technique}</li> })
                            .collect::<Vec<_>>()}
                        <li class="analysis__tag analysis__tag--cta">
                            "CTA: " {analysis.call_to_action_type}
                        </li>
                    </ul>
                </div>
            </div>
        </section>
    }
}
