use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::components::{chat_panel, feed_view, login_form, top_nav};
use crate::constants::{CSS_HIDDEN, ID_APP_ROOT, ID_HOME_VIEW, ID_LOADING_VIEW, ID_LOGIN_VIEW};
use crate::dom_utils::create;
use crate::state::App;

/// Build the static skeleton once: one container per view, each filled by
/// its components.  Visibility is decided later by `views::render`.
pub fn create_base_ui(document: &Document, app: &Rc<App>) -> Result<(), JsValue> {
    if document.get_element_by_id(ID_APP_ROOT).is_some() {
        return Ok(());
    }

    inject_base_styles(document)?;
    let root = create(document, "div", Some(ID_APP_ROOT), "app-root", None)?;

    let loading = create(document, "div", Some(ID_LOADING_VIEW), "loading-view", None)?;
    let spinner = create(document, "div", None, "spinner", None)?;
    loading.append_child(&spinner)?;

    let login = create(document, "div", Some(ID_LOGIN_VIEW), CSS_HIDDEN, None)?;
    login_form::mount(document, &login, app)?;

    let home = create(document, "div", Some(ID_HOME_VIEW), CSS_HIDDEN, None)?;
    top_nav::mount(document, &home, app)?;
    let main = create(document, "main", None, "home-main", None)?;
    feed_view::mount(document, &main, app)?;
    home.append_child(&main)?;
    chat_panel::mount(document, &home, app)?;

    root.append_child(&loading)?;
    root.append_child(&login)?;
    root.append_child(&home)?;

    document
        .body()
        .ok_or_else(|| JsValue::from_str("No body found"))?
        .append_child(&root)?;
    Ok(())
}

const BASE_CSS: &str = "
.hidden{display:none!important}
html.dark body{background:#111827;color:#e5e7eb}
.feed-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:16px}
.card{border:1px solid #e5e7eb;border-radius:8px;overflow:hidden}
.card-image{width:100%;height:160px;object-fit:cover}
.feed-sentinel{height:1px}
.chat-panel{position:fixed;right:16px;bottom:16px;width:360px;max-height:70vh;display:flex;flex-direction:column}
.chat-messages{flex:1;overflow-y:auto}
.sent-message{text-align:right}
.chat-status.online::before{content:'\\25CF ';color:#16a34a}
.chat-status.offline::before{content:'\\25CF ';color:#dc2626}
.error-text{color:#dc2626;font-size:.85em}
";

fn inject_base_styles(document: &Document) -> Result<(), JsValue> {
    let style = create(document, "style", Some("app-base-styles"), "", Some(BASE_CSS))?;
    document
        .head()
        .ok_or_else(|| JsValue::from_str("No head found"))?
        .append_child(&style)?;
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::command_executors::test_support::RecordingEffects;
    use crate::constants::{ID_CHAT_STATUS, ID_FEED_SENTINEL, ID_LOGIN_SUBMIT, ID_NAV_USER};
    use crate::network::config::AppConfig;
    use crate::network::test_support::{MockScheduler, MockSocketFactory};
    use crate::storage::MemoryStore;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn skeleton_mounts_every_view_once() {
        let app = App::new(
            &AppConfig::default(),
            Rc::new(MockSocketFactory::default()),
            Rc::new(MockScheduler::default()),
            Rc::new(MemoryStore::default()),
            Rc::new(RecordingEffects::default()),
        );
        let document = crate::dom_utils::document().unwrap();
        create_base_ui(&document, &app).unwrap();
        create_base_ui(&document, &app).unwrap();

        for id in [ID_LOADING_VIEW, ID_LOGIN_SUBMIT, ID_NAV_USER, ID_FEED_SENTINEL, ID_CHAT_STATUS] {
            assert!(document.get_element_by_id(id).is_some(), "missing #{}", id);
        }
        assert_eq!(document.query_selector_all(".spinner").unwrap().length(), 1);
        assert_eq!(document.query_selector_all("#app-root").unwrap().length(), 1);
    }
}
