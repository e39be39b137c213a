use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tracing::error;

/// Failures talking to one of the server's actors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{actor} actor is no longer running")]
    ActorStopped { actor: &'static str },

    #[error("{actor} actor dropped the response")]
    ResponseDropped { actor: &'static str },

    #[error("{actor} actor queue is full")]
    QueueFull { actor: &'static str },
}

impl AppError {
    pub fn stopped(actor: &'static str) -> Self {
        AppError::ActorStopped { actor }
    }

    pub fn dropped(actor: &'static str) -> Self {
        AppError::ResponseDropped { actor }
    }

    /// Maps a failed `try_send`; a full queue means the message was dropped.
    pub fn from_try_send<T>(actor: &'static str, error: TrySendError<T>) -> Self {
        match error {
            TrySendError::Full(_) => AppError::QueueFull { actor },
            TrySendError::Closed(_) => AppError::ActorStopped { actor },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
