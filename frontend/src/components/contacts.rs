use leptos::prelude::*;

use crate::components::top_app_bar::TopAppBar;
use crate::state::AppState;

/// Everyone else currently known to the server.
#[component]
pub fn ContactsPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let contacts = Memo::new(move |_| {
        let name = state.name.get();
        state.users.with(|users| users.contacts_for(name.as_deref()))
    });

    view! {
        <TopAppBar header="Melt".to_string() sign_out=true />
        <main class="contacts">
            {move || {
                if state.users.with(|users| users.is_loading()) {
                    view! { <p>"Loading..."</p> }.into_any()
                } else if contacts.with(Vec::is_empty) {
                    view! { <p>"No one available to chat"</p> }.into_any()
                } else {
                    view! {
                        <ul class="contact-list">
                            <For
                                each=move || contacts.get()
                                key=|contact| contact.clone()
                                let:contact
                            >
                                {
                                    let label = contact.clone();
                                    view! {
                                        <li on:click=move |_| state.open_chat(contact.clone())>
                                            {label}
                                        </li>
                                    }
                                }
                            </For>
                        </ul>
                    }.into_any()
                }
            }}
        </main>
    }
}
