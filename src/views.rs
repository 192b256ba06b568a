// src/views.rs
//
// Turns the current `AppState` into DOM changes.  Called after every
// dispatch that changed state.
//
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::components::{chat_panel, feed_view, login_form, top_nav};
use crate::constants::{CSS_DARK, ID_HOME_VIEW, ID_LOADING_VIEW, ID_LOGIN_VIEW, ROUTE_HOME, ROUTE_LOGIN};
use crate::dom_utils::{by_id, document, set_visible};
use crate::models::Theme;
use crate::state::{ActiveView, App, AppState, Renderer};

/// Renderer handed to `App::set_renderer`.
pub fn renderer() -> Renderer {
    Rc::new(|app: &App| {
        if let Err(e) = render(app) {
            error_log!("Render failed: {:?}", e);
        }
    })
}

pub fn render(app: &App) -> Result<(), JsValue> {
    let document = document()?;
    let state = app.state();

    apply_theme(&document, state.theme)?;
    render_active_view(app, &state, &document)?;
    sync_route(state.active_view())
}

fn apply_theme(document: &Document, theme: Theme) -> Result<(), JsValue> {
    if let Some(html) = document.document_element() {
        html.class_list().toggle_with_force(CSS_DARK, theme == Theme::Dark)?;
    }
    Ok(())
}

fn render_active_view(app: &App, state: &AppState, document: &Document) -> Result<(), JsValue> {
    let view = state.active_view();
    set_visible(&by_id(document, ID_LOADING_VIEW)?, view == ActiveView::Loading);
    set_visible(&by_id(document, ID_LOGIN_VIEW)?, view == ActiveView::Login);
    set_visible(&by_id(document, ID_HOME_VIEW)?, view == ActiveView::Home);

    match view {
        ActiveView::Loading => {}
        ActiveView::Login => {
            // Logged out: nothing to paginate until the next login.
            app.feed_view().borrow_mut().detach();
            login_form::render(document, &state.auth)?;
        }
        ActiveView::Home => {
            top_nav::render(document, state)?;
            feed_view::render(document, &state.feed, &mut app.feed_view().borrow_mut())?;
            chat_panel::render(document, &state.chat)?;
        }
    }
    Ok(())
}

/// Keep the address bar on `/login` or `/home` without adding history
/// entries.
fn sync_route(view: ActiveView) -> Result<(), JsValue> {
    let route = match view {
        ActiveView::Loading => return Ok(()),
        ActiveView::Login => ROUTE_LOGIN,
        ActiveView::Home => ROUTE_HOME,
    };
    let Some(window) = web_sys::window() else {
        return Ok(());
    };
    if window.location().pathname()? == route {
        return Ok(());
    }
    window
        .history()?
        .replace_state_with_url(&JsValue::NULL, "", Some(route))
}
