use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::connection::{Connector, FrameHandler, Socket};
use crate::error::ClientError;
use crate::models::Frame;

/// Opens real browser WebSockets.
pub struct BrowserConnector;

/// A browser WebSocket together with the closures registered on it.
///
/// The closures are owned here rather than leaked so closing the socket can
/// detach them.
pub struct BrowserSocket {
    ws: WebSocket,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Connector for BrowserConnector {
    type Socket = BrowserSocket;

    fn open(&self, url: &str, on_frame: FrameHandler) -> Result<BrowserSocket, ClientError> {
        let ws = WebSocket::new(url).map_err(|e| ClientError::Connect {
            url: url.to_string(),
            reason: format!("{e:?}"),
        })?;

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let frame = match ev.data().as_string() {
                Some(text) => Frame::Text(text),
                None => Frame::Binary,
            };
            on_frame(frame);
        });
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        // Browsers hand `error` listeners a bare `Event` with no details.
        let on_error = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
            log::error!("WebSocket connection error");
        });
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
            log::debug!("WebSocket closed (code {})", ev.code());
        });
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(BrowserSocket {
            ws,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        })
    }
}

impl Socket for BrowserSocket {
    fn send_text(&self, text: &str) -> Result<(), ClientError> {
        self.ws
            .send_with_str(text)
            .map_err(|e| ClientError::Send(format!("{e:?}")))
    }

    fn close(&self) {
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
        if let Err(e) = self.ws.close() {
            log::debug!("Error closing websocket: {e:?}");
        }
    }
}
