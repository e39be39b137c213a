use thiserror::Error;

/// Client-side failures. None of them are retried; they are logged where they surface.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Received a non-text frame")]
    NonTextFrame,

    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    #[error("Failed to open websocket to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Failed to send over websocket: {0}")]
    Send(String),

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Local storage unavailable: {0}")]
    Storage(String),
}
