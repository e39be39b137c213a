use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::socket::{self, SocketId};
use super::{delivery, CHANNEL_CAPACITY};
use crate::errors::AppError;
use crate::models::{ChatMessage, ClientMessage};

const ACTOR: &str = "user";

enum Message {
    /// Acknowledged once the socket is in the list; a dropped ack means the actor stopped first.
    AddSocket(socket::Handle, oneshot::Sender<()>),
    ProcessSocketMessage(SocketId, ChatMessage),
    ReceiveMessage(ClientMessage),
    RemoveSocket(SocketId),
}

/// One display name and every connection currently using it.
struct User {
    id: Uuid,
    name: Arc<str>,
    delivery_service: delivery::Handle,
    receiver: mpsc::Receiver<Message>,
    sockets: Vec<socket::Handle>,
}

impl User {
    async fn process_socket_message(&self, origin: SocketId, message: ChatMessage) {
        if message.sender != self.name {
            warn!(
                user = %self.name,
                claimed = %message.sender,
                "Rejecting message with a foreign sender"
            );
            return;
        }

        let message = Arc::new(message);
        let echo = ClientMessage::SynchronizeMessage {
            message: message.clone(),
        };
        for socket in self.sockets.iter().filter(|socket| socket.id != origin) {
            if let Err(e) = socket.try_send(echo.clone()) {
                error!(user = %self.name, "Error synchronizing message to socket: {e}");
            }
        }

        // Talking to yourself only needs the echo above.
        if message.recipient == self.name {
            return;
        }

        let message = Arc::unwrap_or_clone(message);
        if let Err(e) = self.delivery_service.send_message(message).await {
            error!(user = %self.name, "Error handing message to delivery service: {e}");
        }
    }

    fn fan_out(&self, message: ClientMessage) {
        for socket in &self.sockets {
            if let Err(e) = socket.try_send(message.clone()) {
                error!(user = %self.name, "Error sending message to socket: {e}");
            }
        }
    }

    /// Returns `true` once the last socket is gone.
    fn remove_socket(&mut self, id: &SocketId) -> bool {
        match self.sockets.iter().position(|socket| &socket.id == id) {
            Some(position) => {
                self.sockets.swap_remove(position);
            }
            None => warn!(user = %self.name, "Socket not found for removal"),
        }
        self.sockets.is_empty()
    }
}

async fn run_actor(mut actor: User) {
    while let Some(message) = actor.receiver.recv().await {
        match message {
            Message::AddSocket(socket, ack) => {
                actor.sockets.push(socket);
                let _ = ack.send(());
            }
            Message::ProcessSocketMessage(origin, message) => {
                actor.process_socket_message(origin, message).await;
            }
            Message::ReceiveMessage(message) => actor.fan_out(message),
            Message::RemoveSocket(id) => {
                if !actor.remove_socket(&id) {
                    continue;
                }
                // Anything still queued (a reconnect's AddSocket included) is dropped
                // with the receiver; the reconnect sees its ack fail and looks up again.
                let removal = actor.delivery_service.remove_user(actor.name.clone(), actor.id);
                if let Err(e) = removal.await {
                    error!(user = %actor.name, "Error removing user from delivery service: {e}");
                }
                break;
            }
        }
    }
    debug!(user = %actor.name, "User actor stopped");
}

#[derive(Clone)]
pub struct Handle {
    id: Uuid,
    sender: mpsc::Sender<Message>,
}

impl Handle {
    pub fn new(name: Arc<str>, delivery_service: delivery::Handle) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let id = Uuid::new_v4();

        let actor = User {
            id,
            name,
            delivery_service,
            receiver,
            // A user is only created for an incoming connection.
            sockets: Vec::with_capacity(1),
        };

        tokio::spawn(run_actor(actor));

        Self { id, sender }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }

    /// A handle whose actor has already stopped.
    #[cfg(test)]
    pub(super) fn stopped() -> Self {
        let (sender, _) = mpsc::channel(1);
        Self {
            id: Uuid::new_v4(),
            sender,
        }
    }

    pub(super) async fn add_socket(&self, socket: socket::Handle) -> Result<(), AppError> {
        let (ack, added) = oneshot::channel();
        self.send(Message::AddSocket(socket, ack)).await?;
        added.await.map_err(|_| AppError::stopped(ACTOR))
    }

    pub(super) async fn process_socket_message(
        &self,
        origin: SocketId,
        message: ChatMessage,
    ) -> Result<(), AppError> {
        self.send(Message::ProcessSocketMessage(origin, message)).await
    }

    /// Never waits, so the delivery service cannot be held up by a busy user.
    pub(super) fn try_receive_message(&self, message: ClientMessage) -> Result<(), AppError> {
        self.sender
            .try_send(Message::ReceiveMessage(message))
            .map_err(|e| AppError::from_try_send(ACTOR, e))
    }

    pub(super) async fn remove_socket(&self, id: SocketId) -> Result<(), AppError> {
        self.send(Message::RemoveSocket(id)).await
    }

    async fn send(&self, message: Message) -> Result<(), AppError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| AppError::stopped(ACTOR))
    }
}
