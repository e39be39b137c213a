use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tracing::error;

use crate::service::{delivery, socket};

/// GET `/messages/{name}` — upgrades to the WebSocket carrying `name`'s chats.
///
/// Protocol:
/// - Client sends a bare chat message `{ "recipient", "sender", "text", "time_utc" }`
/// - Server pushes `{ "type": "ChatMessage" | "SynchronizeMessage", "message": {..} }`
///   and `{ "type": "AddUser" | "RemoveUser", "name": "..." }`
pub async fn messages_ws_handler(
    Path(name): Path<String>,
    ws: WebSocketUpgrade,
    State(delivery_service): State<delivery::Handle>,
) -> impl IntoResponse {
    ws.on_upgrade(move |stream| async move {
        if let Err(e) = socket::attach(stream, name.into(), &delivery_service).await {
            error!("Error attaching websocket: {e}");
        }
    })
}

#[cfg(test)]
#[path = "ws_routes_test.rs"]
mod tests;
