use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent};

use crate::constants::{
    CSS_ERROR_TEXT, ID_LOGIN_ERROR, ID_LOGIN_PASSWORD, ID_LOGIN_PASSWORD_ERROR, ID_LOGIN_SUBMIT,
    ID_LOGIN_USERNAME, ID_LOGIN_USERNAME_ERROR,
};
use crate::dom_utils::{by_id, create, html_input, on_click, on_event, set_visible};
use crate::messages::Message;
use crate::models::Credentials;
use crate::state::{App, AuthState};

fn read_credentials() -> Option<Message> {
    let document = crate::dom_utils::document().ok()?;
    let username = html_input(&document, ID_LOGIN_USERNAME).ok()?.value();
    let password = html_input(&document, ID_LOGIN_PASSWORD).ok()?.value();
    Some(Message::LoginRequested(Credentials { username, password }))
}

fn field(
    document: &Document,
    form: &Element,
    label: &str,
    id: &str,
    kind: &str,
    error_id: &str,
) -> Result<(), JsValue> {
    let wrapper = create(document, "div", None, "form-field", None)?;
    let label_el = create(document, "label", None, "", Some(label))?;
    label_el.set_attribute("for", id)?;
    let input = create(document, "input", Some(id), "input", None)?;
    input.set_attribute("type", kind)?;
    input.set_attribute("autocomplete", if kind == "password" { "current-password" } else { "username" })?;
    let error = create(document, "p", Some(error_id), CSS_ERROR_TEXT, None)?;

    wrapper.append_child(&label_el)?;
    wrapper.append_child(&input)?;
    wrapper.append_child(&error)?;
    form.append_child(&wrapper)?;
    Ok(())
}

/// Build the login card inside `container`.
pub fn mount(document: &Document, container: &Element, app: &Rc<App>) -> Result<(), JsValue> {
    let card = create(document, "div", None, "login-card", None)?;
    let heading = create(document, "h1", None, "", Some("Sign in"))?;
    let hint = create(document, "p", None, "hint", Some("Demo account: kminchelle / 0lelplR"))?;
    card.append_child(&heading)?;
    card.append_child(&hint)?;

    let banner = create(document, "div", Some(ID_LOGIN_ERROR), "error-banner", None)?;
    card.append_child(&banner)?;

    field(document, &card, "Username", ID_LOGIN_USERNAME, "text", ID_LOGIN_USERNAME_ERROR)?;
    field(document, &card, "Password", ID_LOGIN_PASSWORD, "password", ID_LOGIN_PASSWORD_ERROR)?;

    let submit = create(document, "button", Some(ID_LOGIN_SUBMIT), "primary-button", Some("Sign in"))?;
    card.append_child(&submit)?;
    container.append_child(&card)?;

    on_event(&submit, "click", app.handle(), |_| read_credentials())?;
    on_click(&banner, app.handle(), Message::DismissAuthError)?;
    for id in [ID_LOGIN_USERNAME, ID_LOGIN_PASSWORD] {
        let input = by_id(document, id)?;
        on_event(&input, "keydown", app.handle(), |e: &Event| {
            let key = e.dyn_ref::<KeyboardEvent>()?.key();
            if key == "Enter" {
                read_credentials()
            } else {
                None
            }
        })?;
    }
    Ok(())
}

pub fn render(document: &Document, auth: &AuthState) -> Result<(), JsValue> {
    let banner = by_id(document, ID_LOGIN_ERROR)?;
    banner.set_text_content(auth.error.as_deref());
    set_visible(&banner, auth.error.is_some());

    let username_error = by_id(document, ID_LOGIN_USERNAME_ERROR)?;
    username_error.set_text_content(auth.form_errors.username.as_deref());
    let password_error = by_id(document, ID_LOGIN_PASSWORD_ERROR)?;
    password_error.set_text_content(auth.form_errors.password.as_deref());

    let submit = by_id(document, ID_LOGIN_SUBMIT)?;
    if auth.is_loading {
        submit.set_attribute("disabled", "")?;
        submit.set_text_content(Some("Signing in..."));
    } else {
        submit.remove_attribute("disabled")?;
        submit.set_text_content(Some("Sign in"));
    }
    Ok(())
}
