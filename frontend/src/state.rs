use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::config::Endpoints;
use crate::connection::{self, ConnectionManager, FrameHandler};
use crate::directory::UserDirectory;
use crate::models::{ChatMessage, Frame};
use crate::router;
use crate::storage;
use crate::store::ConversationStore;
use crate::ws::BrowserConnector;

/// Which page is showing.
#[derive(Clone, Debug, PartialEq)]
pub enum Page {
    Setup,
    Contacts,
    Chat(String),
}

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    /// The identity; `None` means signed out.
    pub name: RwSignal<Option<String>>,
    pub page: RwSignal<Page>,
    pub conversations: RwSignal<ConversationStore>,
    pub users: RwSignal<UserDirectory>,
    pub connected: RwSignal<bool>,

    connection: StoredValue<ConnectionManager<BrowserConnector>, LocalStorage>,
    endpoints: StoredValue<Endpoints>,
}

impl AppState {
    /// Create a new `AppState`, wire its effects and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let endpoints = Endpoints::from_window();
        let name = RwSignal::new(storage::load_identity());
        let initial_page = if name.get_untracked().is_some() {
            Page::Contacts
        } else {
            Page::Setup
        };
        let page = RwSignal::new(initial_page);
        let conversations = RwSignal::new(ConversationStore::new());
        let users = RwSignal::new(UserDirectory::default());
        let connected = RwSignal::new(false);

        let on_frame: FrameHandler = Rc::new(move |frame: Frame| {
            conversations.update(|conversations| {
                users.update(|users| match router::route(&frame, conversations, users) {
                    Ok(routed) => log::debug!("Routed frame: {routed:?}"),
                    Err(e) => log::error!("Dropping frame: {e}"),
                });
            });
        });
        let manager = ConnectionManager::new(BrowserConnector, endpoints.clone(), on_frame);

        let state = Self {
            name,
            page,
            conversations,
            users,
            connected,
            connection: StoredValue::new_local(manager),
            endpoints: StoredValue::new(endpoints),
        };

        // Keep localStorage in step with the identity.
        Effect::new(move |_| storage::persist_identity(name.get().as_deref()));

        // One socket per identity; closed on sign-out.
        Effect::new(move |_| {
            let identity = name.get();
            let result = conversations.try_update(|conversations| {
                state.connection.try_update_value(|manager| {
                    connection::follow_identity(manager, conversations, identity.as_deref())
                })
            });
            if let Some(Some(Err(e))) = result {
                log::error!("{e}");
            }
            let is_connected = state
                .connection
                .try_with_value(|manager| manager.is_connected())
                .unwrap_or(false);
            connected.set(is_connected);
        });

        // Signed out: back to set up, wherever we were.
        Effect::new(move |_| {
            if name.with(Option::is_none) {
                page.set(Page::Setup);
            }
        });

        provide_context(state);
        state
    }

    /// Load the user directory from the backend.
    pub fn load_users(&self) {
        let users = self.users;
        let endpoints = self.endpoints.get_value();
        spawn_local(async move {
            match api::fetch_users(&endpoints).await {
                Ok(list) => users.update(|directory| directory.set_fetched(list)),
                Err(e) => {
                    log::error!("Failed to fetch users: {e}");
                    users.update(|directory| directory.set_fetched(Vec::new()));
                }
            }
        });
    }

    pub fn sign_in(&self, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            return;
        }
        self.name.set(Some(name));
        self.page.set(Page::Contacts);
    }

    pub fn sign_out(&self) {
        self.name.set(None);
    }

    pub fn open_chat(&self, contact: String) {
        self.conversations.update(|conversations| {
            conversations.conversation_mut(&contact);
        });
        self.page.set(Page::Chat(contact));
    }

    pub fn show_contacts(&self) {
        self.page.set(Page::Contacts);
    }

    /// Send `text` to the open chat partner.
    pub fn send_message(&self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        let Some(sender) = self.name.get_untracked() else {
            return;
        };
        let Page::Chat(recipient) = self.page.get_untracked() else {
            return;
        };

        let message = ChatMessage::new(&sender, &recipient, text, js_sys::Date::now() as i64);
        let mut result = None;
        self.conversations.update(|conversations| {
            result = self
                .connection
                .try_with_value(|manager| connection::send_chat(manager, conversations, message));
        });

        match result {
            Some(Ok(true)) | None => {}
            Some(Ok(false)) => log::warn!("Not connected, message to {recipient} kept locally"),
            Some(Err(e)) => log::error!("{e}"),
        }
    }
}
