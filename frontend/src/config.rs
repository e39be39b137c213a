//! Where the backend lives.
//!
//! The host defaults to the page's own host and can be pinned at build time
//! with `MELT_BACKEND_HOST` (for a dev server on another port). Transport is
//! secure whenever the page itself is, and always in release builds.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped in a URL path segment (the `encodeURIComponent` set).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    host: String,
    secure: bool,
}

impl Endpoints {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self {
            host: host.into(),
            secure,
        }
    }

    /// Resolves the backend from the build environment and the current page.
    pub fn from_page(page_protocol: &str, page_host: &str) -> Self {
        let secure = page_protocol == "https:" || !cfg!(debug_assertions);
        let host = option_env!("MELT_BACKEND_HOST").unwrap_or(page_host);
        Self::new(host, secure)
    }

    pub fn from_window() -> Self {
        let location = web_sys::window().map(|w| w.location());
        let protocol = location
            .as_ref()
            .and_then(|l| l.protocol().ok())
            .unwrap_or_default();
        let host = location
            .as_ref()
            .and_then(|l| l.host().ok())
            .unwrap_or_default();
        let endpoints = Self::from_page(&protocol, &host);
        log::debug!("Backend at {}", endpoints.users_url());
        endpoints
    }

    pub fn users_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/users", self.host)
    }

    /// The WebSocket endpoint for `identity`: `ws(s)://<host>/messages/<encoded identity>`.
    pub fn socket_url(&self, identity: &str) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        let name = utf8_percent_encode(identity, PATH_SEGMENT);
        format!("{scheme}://{}/messages/{name}", self.host)
    }
}
