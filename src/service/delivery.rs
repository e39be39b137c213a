use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{user, CHANNEL_CAPACITY};
use crate::errors::AppError;
use crate::models::{ChatMessage, ClientMessage};

const ACTOR: &str = "delivery service";

enum Message {
    SendMessage(ChatMessage),
    GetOrInsertUser(Arc<str>, oneshot::Sender<user::Handle>),
    GetUsers(oneshot::Sender<Vec<Arc<str>>>),
    /// Carries the id of the user actor so a stale removal cannot drop its replacement.
    RemoveUser(Arc<str>, Uuid),
}

/// Registry of connected users and router of chat messages between them.
struct DeliveryService {
    receiver: mpsc::Receiver<Message>,
    sender: mpsc::WeakSender<Message>,
    users_by_name: HashMap<Arc<str>, user::Handle>,
}

impl DeliveryService {
    fn route(&self, message: ChatMessage) {
        let Some(recipient) = self.users_by_name.get(&message.recipient) else {
            error!(recipient = %message.recipient, "Recipient not found, dropping message");
            return;
        };

        let message = ClientMessage::ChatMessage {
            message: Arc::new(message),
        };
        if let Err(e) = recipient.try_receive_message(message) {
            error!("Error delivering message to user: {e}");
        }
    }

    fn get_or_insert(&mut self, name: Arc<str>) -> Option<user::Handle> {
        if let Some(existing) = self.users_by_name.get(&name) {
            if !existing.is_stopped() {
                return Some(existing.clone());
            }
            debug!(user = %name, "Replacing stopped user actor");
        }

        let sender = self.sender.upgrade()?;
        let handle = user::Handle::new(name.clone(), Handle { sender });
        let replaced = self.users_by_name.insert(name.clone(), handle.clone());
        if replaced.is_none() {
            info!(user = %name, "User joined");
            self.broadcast_except(&name, ClientMessage::AddUser { name: name.clone() });
        }
        Some(handle)
    }

    fn remove(&mut self, name: Arc<str>, id: Uuid) {
        let registered = self.users_by_name.get(&name).map(user::Handle::id);
        if registered != Some(id) {
            debug!(user = %name, "Ignoring removal of a replaced user actor");
            return;
        }
        self.users_by_name.remove(&name);
        info!(user = %name, "User left");
        self.broadcast_except(&name, ClientMessage::RemoveUser { name: name.clone() });
    }

    fn broadcast_except(&self, skip: &str, message: ClientMessage) {
        for (name, user) in &self.users_by_name {
            if &**name == skip {
                continue;
            }
            if let Err(e) = user.try_receive_message(message.clone()) {
                error!(user = %name, "Error notifying user: {e}");
            }
        }
    }
}

async fn run_actor(mut actor: DeliveryService) {
    while let Some(message) = actor.receiver.recv().await {
        match message {
            Message::SendMessage(message) => actor.route(message),
            Message::GetOrInsertUser(name, respond) => {
                let Some(user) = actor.get_or_insert(name) else {
                    break;
                };
                if respond.send(user).is_err() {
                    error!("Error sending user handle back");
                }
            }
            Message::GetUsers(respond) => {
                let users = actor.users_by_name.keys().cloned().collect();
                if respond.send(users).is_err() {
                    error!("Error sending users back");
                }
            }
            Message::RemoveUser(name, id) => actor.remove(name, id),
        }
    }
    debug!("Delivery service stopped");
}

#[derive(Clone)]
pub struct Handle {
    sender: mpsc::Sender<Message>,
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

impl Handle {
    /// Spawns the delivery service. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);

        let actor = DeliveryService {
            receiver,
            // Weak so the actor stops once every outside handle is gone.
            sender: sender.downgrade(),
            users_by_name: HashMap::new(),
        };

        tokio::spawn(run_actor(actor));

        Self { sender }
    }

    pub async fn get_or_insert(&self, name: Arc<str>) -> Result<user::Handle, AppError> {
        let (respond, response) = oneshot::channel();
        self.sender
            .send(Message::GetOrInsertUser(name, respond))
            .await
            .map_err(|_| AppError::stopped(ACTOR))?;
        response.await.map_err(|_| AppError::dropped(ACTOR))
    }

    pub async fn get_users(&self) -> Result<Vec<Arc<str>>, AppError> {
        let (respond, response) = oneshot::channel();
        self.sender
            .send(Message::GetUsers(respond))
            .await
            .map_err(|_| AppError::stopped(ACTOR))?;
        response.await.map_err(|_| AppError::dropped(ACTOR))
    }

    pub(super) async fn send_message(&self, message: ChatMessage) -> Result<(), AppError> {
        self.sender
            .send(Message::SendMessage(message))
            .await
            .map_err(|_| AppError::stopped(ACTOR))
    }

    pub(super) async fn remove_user(&self, name: Arc<str>, id: Uuid) -> Result<(), AppError> {
        self.sender
            .send(Message::RemoveUser(name, id))
            .await
            .map_err(|_| AppError::stopped(ACTOR))
    }
}

#[cfg(test)]
#[path = "delivery_test.rs"]
mod tests;
