use leptos::ev;
use leptos::prelude::*;

use crate::state::AppState;

/// Landing page where users pick the name they chat under.
///
/// There is no authentication: whoever picks the same name shares the inbox.
#[component]
pub fn SetupPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        state.sign_in(input.get_untracked());
    };

    view! {
        <div class="alert">
            <h3>"Don't share sensitive information"</h3>
            <p>"Messages are not stored on the server."</p>
            <p>"But anyone using the same name as you will also receive your messages you send and receive."</p>
        </div>
        <main class="setup">
            <form on:submit=on_submit>
                <label for="name">"Name"</label>
                <input
                    id="name"
                    name="name"
                    autocomplete="username"
                    required
                    prop:value=input
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                />
                <button type="submit">"Start"</button>
            </form>
        </main>
    }
}
