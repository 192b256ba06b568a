//! Turns visibility of the feed sentinel into "load the next page".
//!
//! [`ScrollTrigger`] is the edge detector; [`SentinelObserver`] feeds it
//! from an `IntersectionObserver`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// Sentinel counts as visible from 10% overlap, 100px ahead of the viewport.
pub const SENTINEL_THRESHOLD: f64 = 0.1;
pub const SENTINEL_ROOT_MARGIN: &str = "100px";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollTrigger {
    was_visible: bool,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one visibility observation.  Returns `true` at most once per
    /// hidden-to-visible transition, and only when a request may be issued.
    pub fn observe(&mut self, visible: bool, has_more: bool, is_loading: bool) -> bool {
        let rising = visible && !self.was_visible;
        self.was_visible = visible;
        rising && has_more && !is_loading
    }

    /// Forget the last observation so a sentinel that is still on screen
    /// counts as newly visible.
    pub fn reattach(&mut self) {
        self.was_visible = false;
    }
}

/// Whether a load may be requested right now: `(has_more, is_loading)`.
pub type FeedGate = Rc<dyn Fn() -> (bool, bool)>;

/// Browser side of the trigger.  One observer at a time; attaching to a new
/// sentinel disconnects the previous observer first.
pub struct SentinelObserver {
    trigger: Rc<RefCell<ScrollTrigger>>,
    gate: FeedGate,
    on_fire: Rc<dyn Fn()>,
    sentinel: Option<Element>,
    observer: Option<IntersectionObserver>,
    _callback: Option<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>,
}

impl SentinelObserver {
    pub fn new(gate: FeedGate, on_fire: Rc<dyn Fn()>) -> Self {
        Self {
            trigger: Rc::new(RefCell::new(ScrollTrigger::new())),
            gate,
            on_fire,
            sentinel: None,
            observer: None,
            _callback: None,
        }
    }

    /// Observe `sentinel`.  A no-op when it is the element already observed.
    pub fn attach(&mut self, sentinel: &Element) -> Result<(), JsValue> {
        if self.sentinel.as_ref() == Some(sentinel) {
            return Ok(());
        }
        self.disconnect();

        let trigger = self.trigger.clone();
        let gate = self.gate.clone();
        let on_fire = self.on_fire.clone();
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            // The newest entry reflects the current intersection.
            let visible = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .last()
                .map(|entry| entry.is_intersecting())
                .unwrap_or(false);
            let (has_more, is_loading) = gate();
            let fire = trigger.borrow_mut().observe(visible, has_more, is_loading);
            if fire {
                on_fire();
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(SENTINEL_THRESHOLD));
        init.set_root_margin(SENTINEL_ROOT_MARGIN);

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        observer.observe(sentinel);

        self.trigger.borrow_mut().reattach();
        self.sentinel = Some(sentinel.clone());
        self.observer = Some(observer);
        self._callback = Some(callback);
        Ok(())
    }

    /// Re-observe the current sentinel, e.g. after a load finished while it
    /// stayed on screen.  The browser reports the current state right away.
    pub fn reattach(&mut self) {
        let (Some(observer), Some(sentinel)) = (&self.observer, &self.sentinel) else {
            return;
        };
        observer.unobserve(sentinel);
        self.trigger.borrow_mut().reattach();
        observer.observe(sentinel);
    }

    pub fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.sentinel = None;
        self._callback = None;
        self.trigger.borrow_mut().reattach();
    }
}

impl Drop for SentinelObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}
