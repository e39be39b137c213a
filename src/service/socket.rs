use std::sync::Arc;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{delivery, user};
use crate::errors::AppError;
use crate::models::{ChatMessage, ClientMessage};

const ACTOR: &str = "socket";

/// Outbound frames buffered per connection before new ones are dropped.
const SOCKET_QUEUE_CAPACITY: usize = 64;

const REGISTER_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketId(Uuid);

/// One WebSocket connection of a user.
struct Socket {
    id: SocketId,
    name: Arc<str>,
    sink: SplitSink<WebSocket, WsMessage>,
    stream: SplitStream<WebSocket>,
    receiver: mpsc::Receiver<ClientMessage>,
    user: user::Handle,
}

impl Socket {
    async fn push(&mut self, message: ClientMessage) -> Result<(), axum::Error> {
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                error!("Error serializing message: {e}");
                return Ok(());
            }
        };
        self.sink.send(WsMessage::Text(json.into())).await
    }

    /// Returns `false` when the user actor is gone and the socket should stop.
    async fn process_text(&self, text: &str) -> bool {
        let message = match serde_json::from_str::<ChatMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(user = %self.name, "Ignoring malformed chat message: {e}");
                return true;
            }
        };

        match self.user.process_socket_message(self.id, message).await {
            Ok(()) => true,
            Err(e) => {
                error!(user = %self.name, "Error forwarding message to user: {e}");
                false
            }
        }
    }
}

enum Event {
    Outbound(Option<ClientMessage>),
    Inbound(Option<Result<WsMessage, axum::Error>>),
}

async fn run_actor(mut actor: Socket) {
    loop {
        let event = tokio::select! {
            outbound = actor.receiver.recv() => Event::Outbound(outbound),
            inbound = actor.stream.next() => Event::Inbound(inbound),
        };

        match event {
            Event::Outbound(None) => break,
            Event::Outbound(Some(message)) => {
                if let Err(e) = actor.push(message).await {
                    warn!(user = %actor.name, "Error sending through websocket: {e}");
                    break;
                }
            }
            Event::Inbound(Some(Ok(WsMessage::Text(text)))) => {
                if !actor.process_text(text.as_str()).await {
                    break;
                }
            }
            Event::Inbound(Some(Ok(WsMessage::Close(_))) | None) => {
                info!(user = %actor.name, "Websocket closed");
                break;
            }
            Event::Inbound(Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_)))) => {}
            Event::Inbound(Some(Ok(other))) => {
                warn!(user = %actor.name, "Unexpected frame: {other:?}");
            }
            Event::Inbound(Some(Err(e))) => {
                warn!(user = %actor.name, "Websocket receive error: {e}");
                break;
            }
        }
    }

    if let Err(e) = actor.user.remove_socket(actor.id).await {
        debug!(user = %actor.name, "User already gone while detaching socket: {e}");
    }
    if let Err(e) = actor.sink.close().await {
        debug!(user = %actor.name, "Error closing websocket: {e}");
    }
}

#[derive(Clone)]
pub struct Handle {
    pub(super) id: SocketId,
    sender: mpsc::Sender<ClientMessage>,
}

impl Handle {
    /// Queues `message` without waiting; a socket that is not keeping up loses it.
    pub(super) fn try_send(&self, message: ClientMessage) -> Result<(), AppError> {
        self.sender
            .try_send(message)
            .map_err(|e| AppError::from_try_send(ACTOR, e))
    }

    #[cfg(test)]
    pub(super) fn detached() -> (Self, mpsc::Receiver<ClientMessage>) {
        let (sender, receiver) = mpsc::channel(SOCKET_QUEUE_CAPACITY);
        let handle = Self {
            id: SocketId(Uuid::new_v4()),
            sender,
        };
        (handle, receiver)
    }
}

/// Adds `socket` to the user registered as `name`, returning that user.
///
/// The user actor may stop between lookup and attach (its last socket just
/// went away). Its queued messages are then dropped, so the add fails and a
/// fresh lookup replaces the stopped actor.
pub(super) async fn register(
    delivery_service: &delivery::Handle,
    name: Arc<str>,
    socket: Handle,
) -> Result<user::Handle, AppError> {
    let mut attempts = 0;
    loop {
        let user = delivery_service.get_or_insert(name.clone()).await?;
        match user.add_socket(socket.clone()).await {
            Ok(()) => return Ok(user),
            Err(e) if attempts < REGISTER_ATTEMPTS => {
                debug!(user = %name, "Retrying socket registration: {e}");
                attempts += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Registers `socket` under `name` and spawns the actor serving it.
///
/// The socket is attached to the user before the actor starts so the user
/// never sees a removal for a socket it has not been given yet.
pub async fn attach(
    socket: WebSocket,
    name: Arc<str>,
    delivery_service: &delivery::Handle,
) -> Result<(), AppError> {
    let (sender, receiver) = mpsc::channel(SOCKET_QUEUE_CAPACITY);
    let handle = Handle {
        id: SocketId(Uuid::new_v4()),
        sender,
    };
    let user = register(delivery_service, name.clone(), handle.clone()).await?;

    let (sink, stream) = socket.split();
    let actor = Socket {
        id: handle.id,
        name,
        sink,
        stream,
        receiver,
        user,
    };
    info!(user = %actor.name, "Websocket connected");
    tokio::spawn(run_actor(actor));
    Ok(())
}

#[cfg(test)]
#[path = "socket_test.rs"]
mod tests;
