use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::constants::{ID_CHAT_TOGGLE, ID_LOGOUT, ID_NAV_USER, ID_THEME_TOGGLE};
use crate::dom_utils::{by_id, create, on_click};
use crate::messages::Message;
use crate::models::Theme;
use crate::state::{App, AppState};

pub fn mount(document: &Document, container: &Element, app: &Rc<App>) -> Result<(), JsValue> {
    let nav = create(document, "nav", None, "top-nav", None)?;
    let brand = create(document, "span", None, "brand", Some("Feed"))?;
    nav.append_child(&brand)?;

    let actions = create(document, "div", None, "nav-actions", None)?;
    let user = create(document, "span", Some(ID_NAV_USER), "nav-user", None)?;
    let theme = create(document, "button", Some(ID_THEME_TOGGLE), "icon-button", None)?;
    let chat = create(document, "button", Some(ID_CHAT_TOGGLE), "icon-button", Some("Chat"))?;
    let logout = create(document, "button", Some(ID_LOGOUT), "secondary-button", Some("Log out"))?;

    actions.append_child(&user)?;
    actions.append_child(&theme)?;
    actions.append_child(&chat)?;
    actions.append_child(&logout)?;
    nav.append_child(&actions)?;
    container.append_child(&nav)?;

    on_click(&theme, app.handle(), Message::ToggleTheme)?;
    on_click(&chat, app.handle(), Message::ToggleChatPanel)?;
    on_click(&logout, app.handle(), Message::Logout)?;
    Ok(())
}

pub fn render(document: &Document, state: &AppState) -> Result<(), JsValue> {
    let user = by_id(document, ID_NAV_USER)?;
    let name = state.auth.session.as_ref().map(|s| s.user.display_name());
    user.set_text_content(name.as_deref());

    let theme = by_id(document, ID_THEME_TOGGLE)?;
    theme.set_text_content(Some(match state.theme {
        Theme::Light => "Dark mode",
        Theme::Dark => "Light mode",
    }));

    let chat = by_id(document, ID_CHAT_TOGGLE)?;
    let unread = state.chat.messages.len();
    let label = if state.chat.is_panel_open || unread == 0 {
        "Chat".to_string()
    } else {
        format!("Chat ({})", unread)
    };
    chat.set_text_content(Some(&label));
    Ok(())
}
