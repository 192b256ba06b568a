//! One-shot timers behind a trait so the reconnect logic can run against a
//! fake clock in tests.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Handle to a pending timer.  Dropping it cancels the timer.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScheduledTask")
    }
}

pub trait IScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask;
}

/// `setTimeout` via `gloo-timers`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserScheduler;

impl IScheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledTask {
        let slot: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
        let fired_slot = slot.clone();
        let timeout = Timeout::new(delay_ms, move || {
            // The closure is running; leak the handle instead of freeing it
            // from inside itself.
            if let Some(timeout) = fired_slot.borrow_mut().take() {
                timeout.forget();
            }
            task();
        });
        *slot.borrow_mut() = Some(timeout);

        ScheduledTask::new(move || {
            // Dropping the Timeout clears it.
            slot.borrow_mut().take();
        })
    }
}
