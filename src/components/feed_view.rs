//! Home feed: kind tabs, the card grid and the infinite-scroll sentinel.

use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::components::scroll_trigger::{FeedGate, SentinelObserver};
use crate::constants::{
    CSS_CARD, ID_FEED_ERROR, ID_FEED_GRID, ID_FEED_HEADER, ID_FEED_REFRESH, ID_FEED_SENTINEL,
    ID_FEED_STATUS, ID_FEED_TAB_PRODUCTS, ID_FEED_TAB_USERS,
};
use crate::dom_utils::{by_id, create, escape_html, on_click, set_active, set_inactive, set_visible};
use crate::feed::cache::{FeedCache, HasMore};
use crate::messages::Message;
use crate::models::{FeedKind, NormalizedItem};
use crate::state::App;
use crate::utils::{capitalise_first, format_date, format_price};

const ID_FEED_ERROR_TEXT: &str = "feed-error-text";
const ID_FEED_RETRY: &str = "feed-retry";
const ID_FEED_TITLE: &str = "feed-title";

/// Browser-side feed state owned by the `App`: the sentinel observer and
/// the loading flag seen by the previous render.
#[derive(Default)]
pub struct FeedView {
    observer: Option<SentinelObserver>,
    sentinel: Option<Element>,
    was_loading: bool,
}

impl FeedView {
    fn install(&mut self, observer: SentinelObserver, sentinel: Element) {
        self.observer = Some(observer);
        self.sentinel = Some(sentinel);
        self.was_loading = false;
    }

    /// Record the loading flag of this render.  Returns `true` when a load
    /// just finished.
    fn loading_finished(&mut self, loading: bool) -> bool {
        let was_loading = std::mem::replace(&mut self.was_loading, loading);
        was_loading && !loading
    }

    /// Observe the sentinel if it is not observed yet.  After a finished
    /// load with the sentinel still on screen no new intersection event
    /// arrives, so the observer is asked for a fresh one.
    fn sync(&mut self, loading: bool) -> Result<(), JsValue> {
        let finished = self.loading_finished(loading);
        let (Some(observer), Some(sentinel)) = (self.observer.as_mut(), self.sentinel.as_ref()) else {
            return Ok(());
        };
        observer.attach(sentinel)?;
        if finished {
            observer.reattach();
        }
        Ok(())
    }

    /// Stop observing; `sync` re-attaches on the next home render.
    pub fn detach(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.disconnect();
        }
        self.was_loading = false;
    }
}

fn tab_id(kind: FeedKind) -> &'static str {
    match kind {
        FeedKind::Products => ID_FEED_TAB_PRODUCTS,
        FeedKind::Users => ID_FEED_TAB_USERS,
    }
}

fn gate(app: Weak<App>) -> FeedGate {
    Rc::new(move || match app.upgrade() {
        Some(app) => {
            let state = app.state();
            let feed = &state.feed;
            (
                feed.has_more(feed.active_kind()).allows_request(),
                feed.is_loading(),
            )
        }
        None => (false, true),
    })
}

pub fn mount(document: &Document, container: &Element, app: &Rc<App>) -> Result<(), JsValue> {
    let header = create(document, "div", Some(ID_FEED_HEADER), "feed-header", None)?;
    let title = create(document, "h2", Some(ID_FEED_TITLE), "feed-title", None)?;
    header.append_child(&title)?;
    for kind in [FeedKind::Products, FeedKind::Users] {
        let tab = create(document, "button", Some(tab_id(kind)), "tab-button", Some(kind.label()))?;
        on_click(&tab, app.handle(), Message::SwitchFeedKind(kind))?;
        header.append_child(&tab)?;
    }
    let refresh = create(document, "button", Some(ID_FEED_REFRESH), "secondary-button", Some("Refresh"))?;
    on_click(&refresh, app.handle(), Message::RefreshFeed)?;
    header.append_child(&refresh)?;

    let error = create(document, "div", Some(ID_FEED_ERROR), "error-banner", None)?;
    let error_text = create(document, "span", Some(ID_FEED_ERROR_TEXT), "", None)?;
    error.append_child(&error_text)?;
    let retry = create(document, "button", Some(ID_FEED_RETRY), "secondary-button", Some("Retry"))?;
    on_click(&retry, app.handle(), Message::RetryFeed)?;
    error.append_child(&retry)?;

    let grid = create(document, "div", Some(ID_FEED_GRID), "feed-grid", None)?;
    let status = create(document, "p", Some(ID_FEED_STATUS), "feed-status", None)?;
    let sentinel = create(document, "div", Some(ID_FEED_SENTINEL), "feed-sentinel", None)?;

    container.append_child(&header)?;
    container.append_child(&error)?;
    container.append_child(&grid)?;
    container.append_child(&status)?;
    container.append_child(&sentinel)?;

    let fire_handle = app.handle();
    let on_fire: Rc<dyn Fn()> = Rc::new(move || {
        if let Some(app) = fire_handle.upgrade() {
            app.dispatch(Message::LoadMoreRequested);
        }
    });
    let mut observer = SentinelObserver::new(gate(app.handle()), on_fire);
    observer.attach(&sentinel)?;
    app.feed_view().borrow_mut().install(observer, sentinel);
    Ok(())
}

fn card_html(item: &NormalizedItem) -> String {
    let mut html = String::new();
    if let Some(image) = &item.image {
        html.push_str(&format!(
            r#"<img class="card-image" src="{}" alt="{}" loading="lazy">"#,
            escape_html(image),
            escape_html(&item.title)
        ));
    }
    html.push_str(&format!(
        r#"<div class="card-body"><h3 class="card-title">{}</h3><p class="card-text">{}</p>"#,
        escape_html(&item.title),
        escape_html(&item.body)
    ));

    let mut meta = Vec::new();
    if let Some(price) = item.price {
        meta.push(format_price(price));
    }
    if let Some(rating) = item.rating {
        meta.push(format!("★ {:.1}", rating));
    }
    if let Some(category) = &item.category {
        meta.push(capitalise_first(category));
    }
    if let Some(department) = &item.department {
        meta.push(department.clone());
    }
    if let Some(age) = item.age {
        meta.push(format!("Age {}", age));
    }
    if !meta.is_empty() {
        let joined: Vec<String> = meta.iter().map(|m| escape_html(m)).collect();
        html.push_str(&format!(r#"<p class="card-meta">{}</p>"#, joined.join(" · ")));
    }

    html.push_str(&format!(
        r#"<p class="card-footer"><span>{}</span><time>{}</time></p></div>"#,
        escape_html(&item.author),
        escape_html(&format_date(&item.created_at))
    ));
    html
}

fn status_text(feed: &FeedCache) -> String {
    let kind = feed.active_kind();
    let shown = feed.visible_items().len();
    if feed.is_loading() {
        return if shown == 0 {
            format!("Loading {}...", kind.label().to_lowercase())
        } else {
            "Loading more...".to_string()
        };
    }
    match (feed.has_more(kind), feed.total(kind)) {
        (HasMore::No, _) if shown == 0 => format!("No {} found", kind.label().to_lowercase()),
        (HasMore::No, _) => "You've reached the end".to_string(),
        (_, Some(total)) => format!("Showing {} of {}", shown, total),
        _ => String::new(),
    }
}

pub fn render(document: &Document, feed: &FeedCache, view: &mut FeedView) -> Result<(), JsValue> {
    for kind in [FeedKind::Products, FeedKind::Users] {
        let tab = by_id(document, tab_id(kind))?;
        if kind == feed.active_kind() {
            set_active(&tab);
        } else {
            set_inactive(&tab);
        }
    }

    let kind = feed.active_kind();
    let title = match feed.total(kind) {
        Some(total) => format!("{} ({})", kind.label(), total),
        None => kind.label().to_string(),
    };
    by_id(document, ID_FEED_TITLE)?.set_text_content(Some(&title));

    let grid = by_id(document, ID_FEED_GRID)?;
    let fragment = document.create_document_fragment();
    for item in feed.visible_items() {
        let card = create(document, "article", None, CSS_CARD, None)?;
        card.set_attribute("data-id", &item.id)?;
        card.set_inner_html(&card_html(item));
        fragment.append_child(&card)?;
    }
    grid.set_inner_html("");
    grid.append_child(&fragment)?;

    let error = by_id(document, ID_FEED_ERROR)?;
    set_visible(&error, feed.error().is_some());
    by_id(document, ID_FEED_ERROR_TEXT)?.set_text_content(feed.error().map(|e| e.message.as_str()));

    by_id(document, ID_FEED_STATUS)?.set_text_content(Some(&status_text(feed)));

    let sentinel = by_id(document, ID_FEED_SENTINEL)?;
    set_visible(&sentinel, feed.has_more(kind).allows_request());

    view.sync(feed.is_loading())
}
