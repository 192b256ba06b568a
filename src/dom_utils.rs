//! dom_utils.rs – thin helper layer for repetitive DOM operations.
//!
//! Small wrappers for the show / hide / activate patterns plus element
//! lookup that returns `Result` instead of panicking.

use std::rc::Weak;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::constants::{CSS_HIDDEN, CSS_TAB_BUTTON, CSS_TAB_BUTTON_ACTIVE, CSS_VISIBLE};
use crate::messages::Message;
use crate::state::App;

/// Remove the `hidden` class so the element becomes visible.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1(CSS_HIDDEN);
    let _ = el.class_list().add_1(CSS_VISIBLE);
}

/// Hide the element by toggling CSS classes.
pub fn hide(el: &Element) {
    let _ = el.class_list().remove_1(CSS_VISIBLE);
    let _ = el.class_list().add_1(CSS_HIDDEN);
}

pub fn set_visible(el: &Element, visible: bool) {
    if visible {
        show(el)
    } else {
        hide(el)
    }
}

/// Mark a tab button as the active one (adds "tab-button active" class).
pub fn set_active(btn: &Element) {
    btn.set_class_name(CSS_TAB_BUTTON_ACTIVE);
}

/// Remove the `active` modifier from a tab button.
pub fn set_inactive(btn: &Element) {
    btn.set_class_name(CSS_TAB_BUTTON);
}

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Element by id, or an error naming the missing id.
pub fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", id)))
}

/// Fetch an `<input>` element by id and cast it to `HtmlInputElement`.
pub fn html_input(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    by_id(document, id)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not an <input>", id)))
}

/// Create `<tag id=.. class=..>` with optional text.
pub fn create(
    document: &Document,
    tag: &str,
    id: Option<&str>,
    class: &str,
    text: Option<&str>,
) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    if let Some(id) = id {
        el.set_id(id);
    }
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if text.is_some() {
        el.set_text_content(text);
    }
    Ok(el)
}

/// Attach a listener that turns every `event` on `el` into a message.
/// The closure lives as long as the page.
pub fn on_event<F>(el: &Element, event: &str, app: Weak<App>, to_message: F) -> Result<(), JsValue>
where
    F: Fn(&Event) -> Option<Message> + 'static,
{
    let cb = Closure::wrap(Box::new(move |e: Event| {
        let Some(app) = app.upgrade() else {
            return;
        };
        if let Some(msg) = to_message(&e) {
            app.dispatch(msg);
        }
    }) as Box<dyn FnMut(Event)>);
    el.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Shorthand for a click that always dispatches `msg`.
pub fn on_click(el: &Element, app: Weak<App>, msg: Message) -> Result<(), JsValue> {
    on_event(el, "click", app, move |_| Some(msg.clone()))
}

/// Escape text for interpolation into `inner_html`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_neutralises_markup() {
        assert_eq!(
            escape_html(r#"<img src="x" onerror='y'>&"#),
            "&lt;img src=&quot;x&quot; onerror=&#39;y&#39;&gt;&amp;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
