use leptos::prelude::*;

use crate::state::AppState;

/// Page header with optional back and sign-out actions.
#[component]
pub fn TopAppBar(
    header: String,
    #[prop(optional)] back: bool,
    #[prop(optional)] sign_out: bool,
) -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <header class="top-app-bar">
            {back.then(|| view! {
                <button class="app-bar-action" on:click=move |_| state.show_contacts()>
                    <span class="sr-only">"go back"</span>
                    "←"
                </button>
            })}
            <h1>{header}</h1>
            {sign_out.then(|| view! {
                <button class="app-bar-action" on:click=move |_| state.sign_out()>
                    <span class="sr-only">"sign out"</span>
                    "⎋"
                </button>
            })}
        </header>
    }
}
