#[macro_use]
pub mod macros;

pub mod command_executors;
pub mod components;
pub mod constants;
pub mod dom_utils;
pub mod error;
pub mod feed;
pub mod messages;
pub mod models;
pub mod network;
pub mod reducers;
pub mod schema_validation;
pub mod state;
pub mod storage;
pub mod toast;
pub mod ui;
pub mod update;
pub mod utils;
pub mod validation;
pub mod views;


use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::command_executors::BrowserEffects;
use crate::messages::Message;
use crate::models::Theme;
use crate::network::browser_socket::BrowserSocketFactory;
use crate::network::config;
use crate::network::scheduler::BrowserScheduler;
use crate::state::App;
use crate::storage::{IKeyValueStore, LocalStorageStore};

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if let Err(e) = config::init_app_config() {
        error_log!("{}", e);
        toast::error(&e.to_string());
    }
    let config = config::current();

    let store: Rc<dyn IKeyValueStore> = Rc::new(LocalStorageStore);
    let app = App::new(
        &config,
        Rc::new(BrowserSocketFactory),
        Rc::new(BrowserScheduler),
        store.clone(),
        Rc::new(BrowserEffects),
    );

    let document = dom_utils::document()?;
    ui::setup::create_base_ui(&document, &app)?;
    app.set_renderer(views::renderer());
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    app.dispatch(Message::ThemeLoaded(initial_theme(&*store)));

    let session = storage::restore_session(&*store);
    app.dispatch(Message::SessionRestored(session));

    debug_log!("Frontend started (feed: {}, chat: {})", config.feed_base_url(), config.ws_url());
    Ok(())
}

/// Stored preference, else the system colour scheme.
fn initial_theme(store: &dyn IKeyValueStore) -> Theme {
    match storage::load_theme(store) {
        Ok(Some(theme)) => return theme,
        Ok(None) => {}
        Err(e) => warn_log!("Ignoring stored theme: {}", e),
    }
    let prefers_dark = web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false);
    if prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

/// Current chat log as plain JS objects, for debugging from the console.
#[wasm_bindgen]
pub fn chat_snapshot() -> Result<JsValue, JsValue> {
    APP.with(|slot| match slot.borrow().as_ref() {
        Some(app) => serde_wasm_bindgen::to_value(&app.state().chat.messages)
            .map_err(|e| JsValue::from_str(&e.to_string())),
        None => Ok(JsValue::NULL),
    })
}

/// Sign out from outside the app, e.g. from an embedding page.
#[wasm_bindgen]
pub fn logout() {
    let app = APP.with(|slot| slot.borrow().clone());
    if let Some(app) = app {
        app.logout();
    }
}
