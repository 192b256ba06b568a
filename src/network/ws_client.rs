//! Reconnecting live-update connection.
//!
//! [`ConnectionManager`] owns at most one socket at a time.  Unexpected
//! closes are retried with exponential backoff up to
//! `max_reconnect_attempts`; a normal close (1000) or a manual
//! [`ConnectionManager::disconnect`] never is.  Everything the connection
//! observes is reported as a [`Message`] through the sink, in the order it
//! was observed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::constants::{
    CLOSE_ABNORMAL, CLOSE_NORMAL, CLOSE_REASON_MANUAL, ERR_CONNECTION, ERR_CONNECT_FAILED,
    ERR_NOT_CONNECTED, ERR_RECONNECT_EXHAUSTED, ERR_SEND_FAILED, INITIAL_BACKOFF_MS,
    MAX_BACKOFF_MS, MAX_RECONNECT_ATTEMPTS,
};
use crate::error::AppError;
use crate::messages::Message;
use crate::models::ChatMessage;

use super::scheduler::{IScheduler, ScheduledTask};

/// Transport state as reported by the socket itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl ConnectionState {
    /// Map a `WebSocket.readyState` value.
    pub fn from_ready_state(ready_state: u16) -> Self {
        match ready_state {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Open => write!(f, "Open"),
            ConnectionState::Closing => write!(f, "Closing"),
            ConnectionState::Closed => write!(f, "Closed"),
        }
    }
}

/// Raw events delivered by a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Open,
    Message(String),
    Error,
    Close { code: u16, reason: String },
}

pub type SocketEventHandler = Rc<dyn Fn(SocketEvent)>;

/// A single transport instance.
pub trait ISocket {
    fn ready_state(&self) -> ConnectionState;
    fn send_text(&self, text: &str) -> Result<(), AppError>;
    /// `code == None` closes without a status code.
    fn close(&self, code: Option<u16>, reason: &str) -> Result<(), AppError>;
}

/// Creates sockets.  Events must be delivered asynchronously, never from
/// inside `open`.
pub trait ISocketFactory {
    fn open(&self, url: &str, on_event: SocketEventHandler) -> Result<Rc<dyn ISocket>, AppError>;
}

/// Configuration for the connection manager
#[derive(Debug, Clone, PartialEq)]
pub struct WsConfig {
    pub url: String,
    pub max_reconnect_attempts: u32,
    pub initial_backoff_ms: u32,
    pub max_backoff_ms: u32,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            initial_backoff_ms: INITIAL_BACKOFF_MS,
            max_backoff_ms: MAX_BACKOFF_MS,
        }
    }

    /// Delay before reconnect number `attempt + 1`:
    /// `min(initial * 2^attempt, max)`.
    pub fn backoff_ms(&self, attempt: u32) -> u32 {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms)
    }
}

impl Default for WsConfig {
    fn default() -> Self {
        Self::new(super::config::ws_url())
    }
}

/// Where the manager is in its retry cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Not connected and not trying to be.
    Idle,
    /// A socket exists (connecting or open).
    Active,
    /// Waiting for the reconnect timer.
    Backoff { attempt: u32, delay_ms: u32 },
    /// Gave up after `max_reconnect_attempts`.
    Exhausted,
}

pub type MessageSink = Rc<dyn Fn(Message)>;

struct Inner {
    config: WsConfig,
    factory: Rc<dyn ISocketFactory>,
    scheduler: Rc<dyn IScheduler>,
    sink: MessageSink,
    socket: Option<Rc<dyn ISocket>>,
    /// Bumped whenever a socket is replaced or retired.
    generation: u64,
    attempts: u32,
    reconnect_task: Option<ScheduledTask>,
    lifecycle: Lifecycle,
    outbox: VecDeque<Message>,
    flushing: bool,
}

impl Inner {
    fn state(&self) -> ConnectionState {
        self.socket
            .as_ref()
            .map(|socket| socket.ready_state())
            .unwrap_or(ConnectionState::Closed)
    }
}

enum AfterClose {
    Nothing,
    Schedule(u32),
    GiveUp,
}

/// Cloneable handle; all clones drive the same connection.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Rc<RefCell<Inner>>,
}

impl ConnectionManager {
    pub fn new(
        config: WsConfig,
        factory: Rc<dyn ISocketFactory>,
        scheduler: Rc<dyn IScheduler>,
        sink: MessageSink,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                config,
                factory,
                scheduler,
                sink,
                socket: None,
                generation: 0,
                attempts: 0,
                reconnect_task: None,
                lifecycle: Lifecycle::Idle,
                outbox: VecDeque::new(),
                flushing: false,
            })),
        }
    }

    fn from_weak(weak: &Weak<RefCell<Inner>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.borrow().state()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.borrow().lifecycle
    }

    pub fn attempts(&self) -> u32 {
        self.inner.borrow().attempts
    }

    /// Open the connection unless one is already open or opening.
    ///
    /// A manual connect cancels a pending reconnect and starts counting
    /// attempts from zero again, which is also how to recover once the
    /// retries are exhausted.
    pub fn connect(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            let state = inner.state();
            if matches!(state, ConnectionState::Open | ConnectionState::Connecting) {
                debug_log!("WebSocket already {}, connect ignored", state);
                return;
            }
            inner.reconnect_task = None;
            inner.attempts = 0;
        }
        self.open_socket();
    }

    /// Close with 1000 / "Manual disconnect".  Safe to call in any state.
    pub fn disconnect(&self) {
        let socket = {
            let mut inner = self.inner.borrow_mut();
            inner.reconnect_task = None;
            inner.generation += 1;
            inner.attempts = 0;
            inner.lifecycle = Lifecycle::Idle;
            inner.socket.take()
        };

        if let Some(socket) = socket {
            debug_log!("Closing WebSocket connection...");
            if let Err(err) = socket.close(Some(CLOSE_NORMAL), CLOSE_REASON_MANUAL) {
                warn_log!("WebSocket close failed: {}", err);
            }
        }
        self.emit(Message::ConnectionStatusChanged(false));
    }

    /// Send one text frame.  The outgoing line is logged only when the
    /// socket accepted it.
    pub fn send(&self, text: &str) -> Result<(), AppError> {
        let socket = {
            let inner = self.inner.borrow();
            inner
                .socket
                .clone()
                .filter(|socket| socket.ready_state() == ConnectionState::Open)
        };

        let Some(socket) = socket else {
            warn_log!("Attempted to send message while WebSocket is not connected");
            self.emit(Message::ConnectionErrorSet(Some(ERR_NOT_CONNECTED.to_string())));
            return Err(AppError::NotConnected);
        };

        if let Err(err) = socket.send_text(text) {
            error_log!("Failed to send message: {}", err);
            self.emit(Message::ConnectionErrorSet(Some(ERR_SEND_FAILED.to_string())));
            return Err(err);
        }
        self.emit(Message::ChatMessageAppended(ChatMessage::sent(text)));
        Ok(())
    }

    fn open_socket(&self) {
        let (factory, url, generation) = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.socket = None;
            inner.lifecycle = Lifecycle::Active;
            (inner.factory.clone(), inner.config.url.clone(), inner.generation)
        };

        let weak = Rc::downgrade(&self.inner);
        let on_event: SocketEventHandler = Rc::new(move |event| {
            if let Some(manager) = ConnectionManager::from_weak(&weak) {
                manager.handle_event(generation, event);
            }
        });

        debug_log!("Connecting WebSocket to {}", url);
        match factory.open(&url, on_event) {
            Ok(socket) => {
                self.inner.borrow_mut().socket = Some(socket);
            }
            Err(err) => {
                error_log!("Failed to create WebSocket: {}", err);
                self.inner.borrow_mut().lifecycle = Lifecycle::Idle;
                self.emit(Message::ConnectionErrorSet(Some(ERR_CONNECT_FAILED.to_string())));
            }
        }
    }

    fn handle_event(&self, generation: u64, event: SocketEvent) {
        if self.inner.borrow().generation != generation {
            debug_log!("Ignoring {:?} from retired socket", event);
            return;
        }
        match event {
            SocketEvent::Open => self.on_open(),
            SocketEvent::Message(data) => {
                self.emit(Message::ChatMessageAppended(ChatMessage::received(&data)));
            }
            SocketEvent::Error => self.on_error(),
            SocketEvent::Close { code, reason } => self.on_close(code, &reason),
        }
    }

    fn on_open(&self) {
        debug_log!("WebSocket connected");
        {
            let mut inner = self.inner.borrow_mut();
            inner.attempts = 0;
            inner.lifecycle = Lifecycle::Active;
        }
        self.emit(Message::ConnectionStatusChanged(true));
        self.emit(Message::ConnectionErrorSet(None));
    }

    fn on_error(&self) {
        error_log!("WebSocket error");
        self.emit(Message::ConnectionErrorSet(Some(ERR_CONNECTION.to_string())));

        let socket = self.inner.borrow().socket.clone();
        let Some(socket) = socket else {
            return;
        };
        if let Err(err) = socket.close(None, "") {
            // No close event will follow; retire the socket and handle the
            // close here.
            warn_log!("WebSocket close after error failed: {}", err);
            {
                let mut inner = self.inner.borrow_mut();
                inner.generation += 1;
                inner.socket = None;
            }
            self.on_close(CLOSE_ABNORMAL, "");
        }
    }

    fn on_close(&self, code: u16, reason: &str) {
        debug_log!("WebSocket closed: {} {}", code, reason);
        self.emit(Message::ConnectionStatusChanged(false));

        let next = {
            let mut inner = self.inner.borrow_mut();
            if code == CLOSE_NORMAL {
                inner.lifecycle = Lifecycle::Idle;
                AfterClose::Nothing
            } else if inner.attempts < inner.config.max_reconnect_attempts {
                if inner.reconnect_task.is_some() {
                    AfterClose::Nothing
                } else {
                    let attempt = inner.attempts;
                    let delay_ms = inner.config.backoff_ms(attempt);
                    inner.lifecycle = Lifecycle::Backoff { attempt, delay_ms };
                    AfterClose::Schedule(delay_ms)
                }
            } else {
                inner.lifecycle = Lifecycle::Exhausted;
                AfterClose::GiveUp
            }
        };

        match next {
            AfterClose::Nothing => {}
            AfterClose::Schedule(delay_ms) => {
                debug_log!("Reconnecting in {} ms", delay_ms);
                let scheduler = self.inner.borrow().scheduler.clone();
                let weak = Rc::downgrade(&self.inner);
                let task = scheduler.schedule(
                    delay_ms,
                    Box::new(move || {
                        if let Some(manager) = ConnectionManager::from_weak(&weak) {
                            manager.reconnect_now();
                        }
                    }),
                );
                self.inner.borrow_mut().reconnect_task = Some(task);
            }
            AfterClose::GiveUp => {
                warn_log!("Max reconnection attempts reached");
                self.emit(Message::ConnectionErrorSet(Some(ERR_RECONNECT_EXHAUSTED.to_string())));
            }
        }
    }

    fn reconnect_now(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.reconnect_task = None;
            if !matches!(inner.lifecycle, Lifecycle::Backoff { .. }) {
                return;
            }
            inner.attempts += 1;
            debug_log!("Attempting reconnection (attempt {})", inner.attempts);
        }
        self.open_socket();
    }

    /// Queue `msg` and deliver everything queued, in order.  A message
    /// emitted while the sink is running is delivered after the current one.
    fn emit(&self, msg: Message) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.outbox.push_back(msg);
            if inner.flushing {
                return;
            }
            inner.flushing = true;
        }

        loop {
            let (next, sink) = {
                let mut inner = self.inner.borrow_mut();
                let next = inner.outbox.pop_front();
                if next.is_none() {
                    inner.flushing = false;
                }
                (next, inner.sink.clone())
            };
            match next {
                Some(msg) => sink(msg),
                None => break,
            }
        }
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ConnectionManager")
            .field("url", &inner.config.url)
            .field("state", &inner.state())
            .field("lifecycle", &inner.lifecycle)
            .field("attempts", &inner.attempts)
            .finish()
    }
}
