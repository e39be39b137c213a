use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::service::delivery;

/// GET `/users` — names of everyone currently connected.
pub async fn list_users_handler(
    State(delivery_service): State<delivery::Handle>,
) -> Result<Json<Vec<Arc<str>>>, AppError> {
    let users = delivery_service.get_users().await?;
    Ok(Json(users))
}
