mod api;
mod components;
mod config;
mod connection;
mod directory;
mod error;
mod models;
mod router;
mod state;
mod storage;
mod store;
mod ws;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatPage;
use components::contacts::ContactsPage;
use components::setup::SetupPage;
use state::{AppState, Page};

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    // The directory is fetched once; socket frames keep it current afterwards.
    state.load_users();

    view! {
        <div class="app-container">
            {move || match state.page.get() {
                Page::Setup => view! { <SetupPage /> }.into_any(),
                Page::Contacts => view! { <ContactsPage /> }.into_any(),
                Page::Chat(contact) => view! { <ChatPage contact=contact /> }.into_any(),
            }}
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
