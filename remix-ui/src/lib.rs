pub mod components;
pub mod pages;

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use pages::HomePage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="떡상 대본 리믹서 | Viral Script Remixer"/>
        <Meta name="description" content="떡상한 영상의 구조를 분석해 새로운 주제의 대본으로 다시 써주는 AI 도구"/>

        <Router>
            <main class="container">
                <Routes fallback=|| "페이지를 찾을 수 없습니다">
                    <Route path=path!("/") view=HomePage/>
                </Routes>
            </main>
        </Router>
    }
}

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
