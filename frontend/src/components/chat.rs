use leptos::ev;
use leptos::prelude::*;

use crate::components::top_app_bar::TopAppBar;
use crate::state::AppState;

/// The conversation with one contact.
#[component]
pub fn ChatPage(contact: String) -> impl IntoView {
    let state = expect_context::<AppState>();

    let messages = {
        let contact = contact.clone();
        Memo::new(move |_| {
            state
                .conversations
                .with(|conversations| conversations.conversation(&contact).to_vec())
        })
    };

    view! {
        <TopAppBar header=contact back=true />
        <main class="chat">
            {move || {
                if messages.with(Vec::is_empty) {
                    view! {
                        <article class="empty-state">"Start chatting by writing a message"</article>
                    }.into_any()
                } else {
                    view! {
                        <ol class="messages">
                            // Lists only grow, so the position is a stable key.
                            <For
                                each=move || messages.get().into_iter().enumerate()
                                key=|(index, _)| *index
                                let:entry
                            >
                                {
                                    let (_, message) = entry;
                                    let own = state.name.with_untracked(|name| {
                                        name.as_deref() == Some(message.sender.as_str())
                                    });
                                    view! {
                                        <li class="message" class:own=own>{message.text}</li>
                                    }
                                }
                            </For>
                        </ol>
                    }.into_any()
                }
            }}
            <MessageInput />
        </main>
    }
}

/// Message form; Enter submits.
#[component]
fn MessageInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_input.set(String::new());
        state.send_message(text);
    };

    view! {
        <form class="input-row" on:submit=on_submit>
            <label for="message" class="sr-only">"Message"</label>
            <input
                type="text"
                id="message"
                name="message"
                placeholder="Type a message..."
                prop:value=input
                on:input=move |ev| set_input.set(event_target_value(&ev))
            />
            {move || (!state.connected.get()).then(|| view! {
                <span class="offline">"offline"</span>
            })}
        </form>
    }
}
