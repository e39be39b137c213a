use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CLIENT_DIR: &str = "./client";
const DEFAULT_DEV_CLIENT_ORIGIN: &str = "http://localhost:5173";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the built client; unknown paths fall back to its `index.html`.
    pub client_dir: PathBuf,
    /// Origin allowed through CORS in debug builds, where the client is served separately.
    pub dev_client_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let client_dir = lookup("CLIENT_DIR")
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_DIR.to_string())
            .into();
        let dev_client_origin =
            lookup("DEV_CLIENT_ORIGIN").unwrap_or_else(|| DEFAULT_DEV_CLIENT_ORIGIN.to_string());

        Self {
            port,
            client_dir,
            dev_client_origin,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.client_dir, PathBuf::from("./client"));
        assert_eq!(config.dev_client_origin, "http://localhost:5173");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn unparsable_port_falls_back_to_default() {
        let config = config_from(&[("PORT", "eighty")]);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn values_are_read_from_environment() {
        let config = config_from(&[
            ("PORT", "8081"),
            ("CLIENT_DIR", "/srv/melt"),
            ("DEV_CLIENT_ORIGIN", "http://127.0.0.1:8080"),
        ]);
        assert_eq!(config.port, 8081);
        assert_eq!(config.client_dir, PathBuf::from("/srv/melt"));
        assert_eq!(config.dev_client_origin, "http://127.0.0.1:8080");
    }
}
