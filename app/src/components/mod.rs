use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

pub mod dashboard;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Health Risk Analytics Dashboard"/>

        <Router>
            <main class="page">
                <Routes fallback=|| "Page not found.">
                    <Route path=StaticSegment("") view=dashboard::DashboardPage/>
                </Routes>
            </main>
        </Router>
    }
}
