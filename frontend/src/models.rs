use serde::{Deserialize, Serialize};

/// Matches the server's `ChatMessage`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatMessage {
    pub recipient: String,
    pub sender: String,
    pub text: String,
    /// UTC unix timestamp in milliseconds, as returned by `Date.now()`.
    pub time_utc: i64,
}

impl ChatMessage {
    pub fn new(sender: &str, recipient: &str, text: String, time_utc: i64) -> Self {
        Self {
            recipient: recipient.to_string(),
            sender: sender.to_string(),
            text,
            time_utc,
        }
    }
}

/// Frames pushed by the server. Matches the backend `ClientMessage` enum (internally tagged).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    ChatMessage { message: ChatMessage },
    AddUser { name: String },
    RemoveUser { name: String },
    /// Our own message, sent from another client using the same name.
    SynchronizeMessage { message: ChatMessage },
}

/// Payload handed to a socket's frame callback.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Text(String),
    /// Anything the browser did not deliver as a string (blobs, array buffers).
    Binary,
}
