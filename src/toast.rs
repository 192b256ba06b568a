//! Tiny toast / notification helper.
//! Creates a `#toast-root` container once per page and appends toast divs that
//! fade-out after a few seconds.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

const TOAST_LIFETIME_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Info => "toast toast-info",
        }
    }
}

pub fn error(msg: &str) {
    show(msg, ToastKind::Error);
}

/// Best effort; failures are logged, never surfaced.
pub fn show(message: &str, kind: ToastKind) {
    if let Err(e) = try_show(message, kind) {
        warn_log!("Toast failed: {:?}", e);
    }
}

fn try_show(message: &str, kind: ToastKind) -> Result<(), JsValue> {
    let document = crate::dom_utils::document()?;
    ensure_styles(&document)?;
    let root = ensure_root(&document)?;

    let toast = document.create_element("div")?;
    toast.set_class_name(kind.class());
    toast.set_text_content(Some(message));

    // Prepend so newest appears on top.
    root.prepend_with_node_1(&toast)?;

    Timeout::new(TOAST_LIFETIME_MS, move || toast.remove()).forget();
    Ok(())
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id("toast-root") {
        return Ok(el);
    }
    let root = document.create_element("div")?;
    root.set_id("toast-root");
    root.set_class_name("toast-root");
    document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&root)?;
    Ok(root)
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("toast-styles").is_some() {
        return Ok(());
    }

    let css = "
.toast-root{position:fixed;top:16px;right:16px;display:flex;flex-direction:column;gap:8px;z-index:9999;font-family:Arial,Helvetica,sans-serif}
.toast{padding:10px 16px;border-radius:4px;color:#fff;box-shadow:0 2px 4px rgba(0,0,0,.1);opacity:0;animation:toast-in .2s forwards}
.toast-success{background:#16a34a}
.toast-error{background:#dc2626}
.toast-info{background:#2563eb}
@keyframes toast-in{to{opacity:1}}
";

    let style = document.create_element("style")?;
    style.set_id("toast-styles");
    style.set_text_content(Some(css));
    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&style)?,
    };
    Ok(())
}
