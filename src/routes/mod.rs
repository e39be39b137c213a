pub mod api_routes;
pub mod ws_routes;

use axum::routing::get;
use axum::Router;

use crate::service::delivery;
use api_routes::list_users_handler;
use ws_routes::messages_ws_handler;

/// HTTP and WebSocket endpoints, without static file serving or middleware.
pub fn router(delivery_service: delivery::Handle) -> Router {
    Router::new()
        .route("/users", get(list_users_handler))
        .route("/messages/{name}", get(messages_ws_handler))
        .with_state(delivery_service)
}
