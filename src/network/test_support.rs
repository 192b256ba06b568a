//! In-memory socket and timer doubles for the connection manager tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::AppError;

use super::scheduler::{IScheduler, ScheduledTask};
use super::ws_client::{ConnectionState, ISocket, ISocketFactory, SocketEvent, SocketEventHandler};

struct MockSocketShared {
    url: String,
    state: Cell<ConnectionState>,
    sent: RefCell<Vec<String>>,
    close_calls: RefCell<Vec<(Option<u16>, String)>>,
    fail_send: Cell<bool>,
    fail_close: Cell<bool>,
    handler: SocketEventHandler,
}

struct MockSocket(Rc<MockSocketShared>);

impl ISocket for MockSocket {
    fn ready_state(&self) -> ConnectionState {
        self.0.state.get()
    }

    fn send_text(&self, text: &str) -> Result<(), AppError> {
        if self.0.fail_send.get() {
            return Err(AppError::Transport("send failed".into()));
        }
        self.0.sent.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn close(&self, code: Option<u16>, reason: &str) -> Result<(), AppError> {
        if self.0.fail_close.get() {
            return Err(AppError::Transport("close failed".into()));
        }
        self.0
            .close_calls
            .borrow_mut()
            .push((code, reason.to_string()));
        self.0.state.set(ConnectionState::Closing);
        Ok(())
    }
}

/// Test-side view of a socket handed to the manager.  Events are delivered
/// only when the test asks for them.
#[derive(Clone)]
pub struct MockSocketHandle(Rc<MockSocketShared>);

impl MockSocketHandle {
    fn deliver(&self, event: SocketEvent) {
        let handler = self.0.handler.clone();
        handler(event);
    }

    pub fn url(&self) -> String {
        self.0.url.clone()
    }

    pub fn open(&self) {
        self.0.state.set(ConnectionState::Open);
        self.deliver(SocketEvent::Open);
    }

    pub fn receive(&self, data: &str) {
        self.deliver(SocketEvent::Message(data.to_string()));
    }

    pub fn error(&self) {
        self.deliver(SocketEvent::Error);
    }

    pub fn close(&self, code: u16) {
        self.0.state.set(ConnectionState::Closed);
        self.deliver(SocketEvent::Close {
            code,
            reason: String::new(),
        });
    }

    pub fn sent(&self) -> Vec<String> {
        self.0.sent.borrow().clone()
    }

    pub fn close_calls(&self) -> Vec<(Option<u16>, String)> {
        self.0.close_calls.borrow().clone()
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.0.fail_send.set(fail);
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.0.fail_close.set(fail);
    }
}

#[derive(Default)]
pub struct MockSocketFactory {
    sockets: RefCell<Vec<MockSocketHandle>>,
    fail_next: Cell<bool>,
}

impl MockSocketFactory {
    /// Make the next `open` fail.
    pub fn fail_next(&self) {
        self.fail_next.set(true);
    }

    pub fn count(&self) -> usize {
        self.sockets.borrow().len()
    }

    /// Most recently opened socket.  Panics when none was opened.
    pub fn last(&self) -> MockSocketHandle {
        self.sockets
            .borrow()
            .last()
            .cloned()
            .expect("no socket opened yet")
    }
}

impl ISocketFactory for MockSocketFactory {
    fn open(&self, url: &str, on_event: SocketEventHandler) -> Result<Rc<dyn ISocket>, AppError> {
        if self.fail_next.replace(false) {
            return Err(AppError::Transport("factory refused".into()));
        }
        let shared = Rc::new(MockSocketShared {
            url: url.to_string(),
            state: Cell::new(ConnectionState::Connecting),
            sent: RefCell::new(Vec::new()),
            close_calls: RefCell::new(Vec::new()),
            fail_send: Cell::new(false),
            fail_close: Cell::new(false),
            handler: on_event,
        });
        self.sockets
            .borrow_mut()
            .push(MockSocketHandle(shared.clone()));
        Ok(Rc::new(MockSocket(shared)))
    }
}

struct PendingTask {
    delay_ms: u32,
    cancelled: Rc<Cell<bool>>,
    task: Option<Box<dyn FnOnce()>>,
}

/// Manual clock: nothing fires until `fire_next` is called.
#[derive(Default)]
pub struct MockScheduler {
    pending: RefCell<Vec<PendingTask>>,
}

impl MockScheduler {
    /// Delays of every timer ever scheduled, in order.
    pub fn delays(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|p| p.delay_ms).collect()
    }

    /// Timers that are neither fired nor cancelled.
    pub fn active_count(&self) -> usize {
        self.pending
            .borrow()
            .iter()
            .filter(|p| p.task.is_some() && !p.cancelled.get())
            .count()
    }

    /// Run the oldest live timer.  Returns `false` when there is none.
    pub fn fire_next(&self) -> bool {
        let task = {
            let mut pending = self.pending.borrow_mut();
            pending
                .iter_mut()
                .find(|p| p.task.is_some() && !p.cancelled.get())
                .and_then(|p| p.task.take())
        };
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl IScheduler for MockScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let cancelled = Rc::new(Cell::new(false));
        self.pending.borrow_mut().push(PendingTask {
            delay_ms,
            cancelled: cancelled.clone(),
            task: Some(task),
        });
        ScheduledTask::new(move || cancelled.set(true))
    }
}
