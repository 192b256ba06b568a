use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::error::AppError;

use super::ws_client::{ConnectionState, ISocket, ISocketFactory, SocketEvent, SocketEventHandler};

/// `web_sys::WebSocket` plus the closures wired into it.  The handlers are
/// detached on drop so a retired socket cannot call back.
struct BrowserSocket {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl ISocket for BrowserSocket {
    fn ready_state(&self) -> ConnectionState {
        ConnectionState::from_ready_state(self.ws.ready_state())
    }

    fn send_text(&self, text: &str) -> Result<(), AppError> {
        self.ws
            .send_with_str(text)
            .map_err(|e| AppError::from_js("WebSocket send failed", &e))
    }

    fn close(&self, code: Option<u16>, reason: &str) -> Result<(), AppError> {
        let result = match code {
            Some(code) => self.ws.close_with_code_and_reason(code, reason),
            None => self.ws.close(),
        };
        result.map_err(|e| AppError::from_js("WebSocket close failed", &e))
    }
}

impl Drop for BrowserSocket {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSocketFactory;

impl ISocketFactory for BrowserSocketFactory {
    fn open(&self, url: &str, on_event: SocketEventHandler) -> Result<Rc<dyn ISocket>, AppError> {
        let ws = WebSocket::new(url).map_err(|e| AppError::Transport(format!("{:?}", e)))?;

        let handler = on_event.clone();
        let on_open = Closure::wrap(Box::new(move |_: Event| {
            handler(SocketEvent::Open);
        }) as Box<dyn FnMut(Event)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

        let handler = on_event.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            // Only text frames are meaningful to the chat.
            match event.data().as_string() {
                Some(text) => handler(SocketEvent::Message(text)),
                None => warn_log!("Received non-text WebSocket message"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let handler = on_event.clone();
        let on_error = Closure::wrap(Box::new(move |_: Event| {
            handler(SocketEvent::Error);
        }) as Box<dyn FnMut(Event)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let handler = on_event;
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            handler(SocketEvent::Close {
                code: event.code(),
                reason: event.reason(),
            });
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(Rc::new(BrowserSocket {
            ws,
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        }))
    }
}
