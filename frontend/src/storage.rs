//! Persists the identity in `localStorage` under the key `name`.

use crate::error::ClientError;

const STORAGE_KEY: &str = "name";

fn local_storage() -> Result<web_sys::Storage, ClientError> {
    let window = web_sys::window().ok_or_else(|| ClientError::Storage("no window".into()))?;
    window
        .local_storage()
        .map_err(|e| ClientError::Storage(format!("{e:?}")))?
        .ok_or_else(|| ClientError::Storage("localStorage disabled".into()))
}

/// The identity saved by a previous session, if any.
pub fn load_identity() -> Option<String> {
    match local_storage().and_then(|storage| {
        storage
            .get_item(STORAGE_KEY)
            .map_err(|e| ClientError::Storage(format!("{e:?}")))
    }) {
        Ok(identity) => identity.filter(|name| !name.is_empty()),
        Err(e) => {
            log::warn!("Could not read identity: {e}");
            None
        }
    }
}

/// Writes `identity` back, removing the key on sign-out.
pub fn persist_identity(identity: Option<&str>) {
    let result = local_storage().and_then(|storage| {
        let written = match identity {
            Some(name) => storage.set_item(STORAGE_KEY, name),
            None => storage.remove_item(STORAGE_KEY),
        };
        written.map_err(|e| ClientError::Storage(format!("{e:?}")))
    });
    if let Err(e) = result {
        log::warn!("Could not persist identity: {e}");
    }
}
