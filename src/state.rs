// src/state.rs
//
// Application state plus the `App` handle that owns it.  There is no global
// state object: everything reaches the state through an `Rc<App>`.
//
use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::command_executors::{self, IEffects};
use crate::components::feed_view::FeedView;
use crate::feed::cache::FeedCache;
use crate::messages::Message;
use crate::models::{AuthSession, ChatMessage, FeedKind, Theme};
use crate::network::config::AppConfig;
use crate::network::scheduler::IScheduler;
use crate::network::ws_client::{ConnectionManager, ISocketFactory, MessageSink, WsConfig};
use crate::storage::IKeyValueStore;
use crate::update::update;
use crate::validation::LoginFormErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// Session restore has not finished yet.
    Loading,
    Login,
    Home,
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub session: Option<AuthSession>,
    /// Login round-trip in progress.
    pub is_loading: bool,
    pub error: Option<String>,
    pub form_errors: LoginFormErrors,
    /// Set once the stored session has been checked.
    pub restored: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// The message store: chat log plus connection flags.
#[derive(Debug, Clone, Default)]
pub struct ChatSessionState {
    pub messages: Vec<ChatMessage>,
    pub is_connected: bool,
    pub connection_error: Option<String>,
    pub is_panel_open: bool,
    pub draft: String,
    pub draft_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub chat: ChatSessionState,
    pub feed: FeedCache,
    pub theme: Theme,
}

impl AppState {
    pub fn new(page_limit: u32) -> Self {
        Self {
            auth: AuthState::default(),
            chat: ChatSessionState::default(),
            feed: FeedCache::new(FeedKind::Products, page_limit),
            theme: Theme::default(),
        }
    }

    pub fn active_view(&self) -> ActiveView {
        if !self.auth.restored {
            ActiveView::Loading
        } else if self.auth.is_authenticated() {
            ActiveView::Home
        } else {
            ActiveView::Login
        }
    }
}

pub type Renderer = Rc<dyn Fn(&App)>;

/// Owner of the state, the live connection and the session store.
pub struct App {
    weak: Weak<App>,
    state: RefCell<AppState>,
    chat: ConnectionManager,
    store: Rc<dyn IKeyValueStore>,
    effects: Rc<dyn IEffects>,
    renderer: RefCell<Option<Renderer>>,
    feed_view: RefCell<FeedView>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        socket_factory: Rc<dyn ISocketFactory>,
        scheduler: Rc<dyn IScheduler>,
        store: Rc<dyn IKeyValueStore>,
        effects: Rc<dyn IEffects>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<App>| {
            let sink_app = weak.clone();
            let sink: MessageSink = Rc::new(move |msg| {
                if let Some(app) = sink_app.upgrade() {
                    app.dispatch(msg);
                }
            });
            let chat = ConnectionManager::new(
                WsConfig::new(config.ws_url()),
                socket_factory,
                scheduler,
                sink,
            );
            App {
                weak: weak.clone(),
                state: RefCell::new(AppState::new(config.page_limit())),
                chat,
                store,
                effects,
                renderer: RefCell::new(None),
                feed_view: RefCell::new(FeedView::default()),
            }
        })
    }

    pub fn handle(&self) -> Weak<App> {
        self.weak.clone()
    }

    pub fn state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    pub fn chat(&self) -> &ConnectionManager {
        &self.chat
    }

    pub fn store(&self) -> &dyn IKeyValueStore {
        self.store.as_ref()
    }

    pub fn effects(&self) -> &dyn IEffects {
        self.effects.as_ref()
    }

    /// DOM-side feed state (sentinel observer), separate from `AppState`
    /// so reducers stay browser-free.
    pub fn feed_view(&self) -> &RefCell<FeedView> {
        &self.feed_view
    }

    pub fn set_renderer(&self, renderer: Renderer) {
        *self.renderer.borrow_mut() = Some(renderer);
    }

    /// Run the reducers, then the commands they produced, then re-render.
    /// The state borrow is released before any command runs, so commands
    /// may dispatch again.
    pub fn dispatch(&self, msg: Message) {
        let mut commands = Vec::new();
        let changed = {
            let mut state = self.state.borrow_mut();
            update(&mut state, msg, &mut commands)
        };

        for cmd in commands {
            command_executors::execute(self, cmd);
        }

        if changed {
            self.render();
        }
    }

    pub fn render(&self) {
        let renderer = self.renderer.borrow().clone();
        if let Some(renderer) = renderer {
            renderer(self);
        }
    }

    /// Full teardown: close the connection, drop chat and feed state, and
    /// forget the stored session.
    pub fn logout(&self) {
        self.dispatch(Message::Logout);
    }
}
