//! Demultiplexes server frames into the conversation store and user directory.

use crate::directory::UserDirectory;
use crate::error::ClientError;
use crate::models::{ChatMessage, Frame, ServerMessage};
use crate::store::ConversationStore;

/// What a frame turned out to be, after it has been applied.
#[derive(Clone, Debug, PartialEq)]
pub enum Routed {
    /// A chat message filed under `contact`.
    Chat { contact: String },
    UserAdded(String),
    UserRemoved(String),
}

/// Parses a raw frame.
///
/// Accepts the tagged server messages as well as a bare chat message, which is
/// what servers speaking the earlier wire version push.
pub fn parse_frame(frame: &Frame) -> Result<ServerMessage, ClientError> {
    let Frame::Text(text) = frame else {
        return Err(ClientError::NonTextFrame);
    };

    match serde_json::from_str::<ServerMessage>(text) {
        Ok(message) => Ok(message),
        Err(tagged_error) => serde_json::from_str::<ChatMessage>(text)
            .map(|message| ServerMessage::ChatMessage { message })
            .map_err(|_| ClientError::MalformedFrame(tagged_error)),
    }
}

/// Applies one server message to client state.
pub fn dispatch(
    message: ServerMessage,
    conversations: &mut ConversationStore,
    directory: &mut UserDirectory,
) -> Routed {
    match message {
        // From someone else: the sender is the chat partner.
        ServerMessage::ChatMessage { message } => {
            let contact = message.sender.clone();
            conversations.push(&contact, message);
            Routed::Chat { contact }
        }
        // From us on another client: the recipient is the chat partner.
        ServerMessage::SynchronizeMessage { message } => {
            let contact = message.recipient.clone();
            conversations.push(&contact, message);
            Routed::Chat { contact }
        }
        ServerMessage::AddUser { name } => {
            directory.add(&name);
            Routed::UserAdded(name)
        }
        ServerMessage::RemoveUser { name } => {
            directory.remove(&name);
            Routed::UserRemoved(name)
        }
    }
}

/// Parses and applies a frame in one step.
pub fn route(
    frame: &Frame,
    conversations: &mut ConversationStore,
    directory: &mut UserDirectory,
) -> Result<Routed, ClientError> {
    let message = parse_frame(frame)?;
    Ok(dispatch(message, conversations, directory))
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
