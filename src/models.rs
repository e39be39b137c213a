use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as it travels over the wire in both directions.
///
/// Clients send it bare; the server wraps it in a [`ClientMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub recipient: Arc<str>,
    pub sender: Arc<str>,
    pub text: String,
    /// UTC unix timestamp in milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time_utc: DateTime<Utc>,
}

/// Frames pushed from the server to a connected client (internally tagged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    ChatMessage { message: Arc<ChatMessage> },
    AddUser { name: Arc<str> },
    RemoveUser { name: Arc<str> },
    /// Own message sent from another connection of the same user.
    SynchronizeMessage { message: Arc<ChatMessage> },
}
