use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement, KeyboardEvent};

use crate::constants::{
    CSS_ERROR_TEXT, CSS_MESSAGE_RECEIVED, CSS_MESSAGE_SENT, ID_CHAT_DRAFT_ERROR, ID_CHAT_ERROR,
    ID_CHAT_INPUT, ID_CHAT_MESSAGES, ID_CHAT_PANEL, ID_CHAT_STATUS, MAX_MESSAGE_CHARS,
};
use crate::dom_utils::{by_id, create, escape_html, html_input, on_click, on_event, set_visible};
use crate::messages::Message;
use crate::models::{ChatMessage, MessageDirection};
use crate::state::{App, ChatSessionState};
use crate::utils::format_time;

const ID_CHAT_RECONNECT: &str = "chat-reconnect";

pub fn mount(document: &Document, container: &Element, app: &Rc<App>) -> Result<(), JsValue> {
    let panel = create(document, "aside", Some(ID_CHAT_PANEL), "chat-panel", None)?;

    let header = create(document, "div", None, "chat-header", None)?;
    let title = create(document, "h2", None, "", Some("Echo chat"))?;
    let status = create(document, "span", Some(ID_CHAT_STATUS), "chat-status", None)?;
    header.append_child(&title)?;
    header.append_child(&status)?;
    let clear = create(document, "button", None, "icon-button", Some("Clear"))?;
    on_click(&clear, app.handle(), Message::ClearChatMessages)?;
    let close = create(document, "button", None, "icon-button", Some("×"))?;
    close.set_attribute("aria-label", "Close chat")?;
    on_click(&close, app.handle(), Message::CloseChatPanel)?;
    header.append_child(&clear)?;
    header.append_child(&close)?;

    let error = create(document, "div", Some(ID_CHAT_ERROR), "error-banner", None)?;
    let reconnect = create(document, "button", Some(ID_CHAT_RECONNECT), "secondary-button", Some("Reconnect"))?;
    on_click(&reconnect, app.handle(), Message::ReconnectChat)?;

    let messages = create(document, "div", Some(ID_CHAT_MESSAGES), "chat-messages", None)?;

    let composer = create(document, "div", None, "chat-composer", None)?;
    let input = create(document, "input", Some(ID_CHAT_INPUT), "input", None)?;
    input.set_attribute("type", "text")?;
    input.set_attribute("placeholder", "Type a message...")?;
    input.set_attribute("maxlength", &MAX_MESSAGE_CHARS.to_string())?;
    let send = create(document, "button", None, "primary-button", Some("Send"))?;
    on_click(&send, app.handle(), Message::SubmitChatDraft)?;
    let draft_error = create(document, "p", Some(ID_CHAT_DRAFT_ERROR), CSS_ERROR_TEXT, None)?;
    composer.append_child(&input)?;
    composer.append_child(&send)?;

    panel.append_child(&header)?;
    panel.append_child(&error)?;
    panel.append_child(&reconnect)?;
    panel.append_child(&messages)?;
    panel.append_child(&composer)?;
    panel.append_child(&draft_error)?;
    container.append_child(&panel)?;

    on_event(&input, "input", app.handle(), |e: &Event| {
        let value = e.target()?.dyn_into::<HtmlInputElement>().ok()?.value();
        Some(Message::ChatDraftChanged(value))
    })?;
    on_event(&input, "keydown", app.handle(), |e: &Event| {
        let key = e.dyn_ref::<KeyboardEvent>()?;
        if key.key() == "Enter" && !key.shift_key() {
            e.prevent_default();
            Some(Message::SubmitChatDraft)
        } else {
            None
        }
    })?;
    Ok(())
}

fn message_html(message: &ChatMessage) -> String {
    format!(
        r#"<div class="message-meta"><span>{}</span><time>{}</time></div><div class="message-text">{}</div>"#,
        escape_html(&message.sender),
        format_time(&message.timestamp),
        escape_html(&message.text)
    )
}

pub fn render(document: &Document, chat: &ChatSessionState) -> Result<(), JsValue> {
    let panel = by_id(document, ID_CHAT_PANEL)?;
    set_visible(&panel, chat.is_panel_open);
    if !chat.is_panel_open {
        return Ok(());
    }

    let status = by_id(document, ID_CHAT_STATUS)?;
    if chat.is_connected {
        status.set_text_content(Some("Connected"));
        status.set_class_name("chat-status online");
    } else {
        status.set_text_content(Some("Disconnected"));
        status.set_class_name("chat-status offline");
    }

    let error = by_id(document, ID_CHAT_ERROR)?;
    error.set_text_content(chat.connection_error.as_deref());
    set_visible(&error, chat.connection_error.is_some());
    set_visible(&by_id(document, ID_CHAT_RECONNECT)?, !chat.is_connected);

    let list = by_id(document, ID_CHAT_MESSAGES)?;
    let fragment = document.create_document_fragment();
    for message in &chat.messages {
        let class = match message.direction {
            MessageDirection::Sent => CSS_MESSAGE_SENT,
            MessageDirection::Received => CSS_MESSAGE_RECEIVED,
        };
        let row = create(document, "div", None, class, None)?;
        row.set_inner_html(&message_html(message));
        fragment.append_child(&row)?;
    }
    list.set_inner_html("");
    list.append_child(&fragment)?;
    list.set_scroll_top(list.scroll_height());

    let input = html_input(document, ID_CHAT_INPUT)?;
    if input.value() != chat.draft {
        input.set_value(&chat.draft);
    }
    by_id(document, ID_CHAT_DRAFT_ERROR)?.set_text_content(chat.draft_error.as_deref());
    Ok(())
}
