//! Keeps exactly one WebSocket open for the active identity.

use std::rc::Rc;

use crate::config::Endpoints;
use crate::error::ClientError;
use crate::models::{ChatMessage, Frame};
use crate::store::ConversationStore;

/// Callback receiving every frame of the active socket.
pub type FrameHandler = Rc<dyn Fn(Frame)>;

/// An open socket. Closing must detach the frame handler first so a closed
/// socket never feeds state again.
pub trait Socket {
    fn send_text(&self, text: &str) -> Result<(), ClientError>;
    fn close(&self);
}

/// Opens sockets; the browser binding lives in `ws.rs`.
pub trait Connector {
    type Socket: Socket;

    fn open(&self, url: &str, on_frame: FrameHandler) -> Result<Self::Socket, ClientError>;
}

struct Active<S> {
    identity: String,
    socket: S,
}

pub struct ConnectionManager<C: Connector> {
    connector: C,
    endpoints: Endpoints,
    on_frame: FrameHandler,
    active: Option<Active<C::Socket>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, endpoints: Endpoints, on_frame: FrameHandler) -> Self {
        Self {
            connector,
            endpoints,
            on_frame,
            active: None,
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.identity.as_str())
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Follows an identity change.
    ///
    /// `None` (sign-out) closes the socket and leaves none open. A new name
    /// closes the previous socket before the replacement is opened. The name
    /// already connected is a no-op.
    ///
    /// Returns `Ok(true)` when the identity actually changed, so callers can drop
    /// state that belonged to the previous one.
    pub fn switch_identity(&mut self, identity: Option<&str>) -> Result<bool, ClientError> {
        if self.identity() == identity {
            return Ok(false);
        }

        if let Some(previous) = self.active.take() {
            log::debug!("Closing socket for {}", previous.identity);
            previous.socket.close();
        }

        let Some(identity) = identity else {
            return Ok(true);
        };

        let url = self.endpoints.socket_url(identity);
        log::debug!("Opening socket {url}");
        let socket = self.connector.open(&url, self.on_frame.clone())?;
        self.active = Some(Active {
            identity: identity.to_string(),
            socket,
        });
        Ok(true)
    }

    /// Transmits `message` over the active socket.
    ///
    /// Returns `Ok(false)` without touching the network when no socket is open.
    pub fn send(&self, message: &ChatMessage) -> Result<bool, ClientError> {
        let Some(active) = &self.active else {
            log::debug!("No socket open, message to {} kept local only", message.recipient);
            return Ok(false);
        };

        let json = serde_json::to_string(message).map_err(|e| ClientError::Send(e.to_string()))?;
        active.socket.send_text(&json)?;
        Ok(true)
    }
}

/// Outbound send: the message is appended locally first, then transmitted if a
/// socket is open. Without one it stays local only and `Ok(false)` is returned.
pub fn send_chat<C: Connector>(
    connection: &ConnectionManager<C>,
    conversations: &mut ConversationStore,
    message: ChatMessage,
) -> Result<bool, ClientError> {
    conversations.push(&message.recipient, message.clone());
    connection.send(&message)
}

/// Identity change: conversations belong to the identity that received them,
/// so they are cleared whenever the socket is torn down or replaced.
pub fn follow_identity<C: Connector>(
    connection: &mut ConnectionManager<C>,
    conversations: &mut ConversationStore,
    identity: Option<&str>,
) -> Result<bool, ClientError> {
    let result = connection.switch_identity(identity);
    if !matches!(result, Ok(false)) {
        *conversations = ConversationStore::new();
    }
    result
}

impl<C: Connector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.socket.close();
        }
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
