use gloo_net::http::Request;

use crate::config::Endpoints;
use crate::error::ClientError;

/// Fetches the names of everyone currently connected.
pub async fn fetch_users(endpoints: &Endpoints) -> Result<Vec<String>, ClientError> {
    let resp = Request::get(&endpoints.users_url())
        .send()
        .await
        .map_err(|e| ClientError::Http(format!("Network error: {e}")))?;

    if !resp.ok() {
        return Err(ClientError::Http(format!("Server error: {}", resp.status())));
    }

    resp.json::<Vec<String>>()
        .await
        .map_err(|e| ClientError::Http(format!("Parse error: {e}")))
}
