use std::rc::Weak;

use crate::feed::cache::RequestTag;
use crate::messages::{Command, Message};
use crate::models::Credentials;
use crate::network::api_client::ApiClient;
use crate::network::auth_client::AuthClient;
use crate::state::App;
use crate::storage;

/// Asynchronous side effects.  Each one dispatches its result back into the
/// app if the app is still alive when it completes.
pub trait IEffects {
    fn fetch_page(&self, app: Weak<App>, tag: RequestTag);
    fn login(&self, app: Weak<App>, credentials: Credentials);
}

/// Network-backed effects run on the browser's microtask queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserEffects;

impl IEffects for BrowserEffects {
    fn fetch_page(&self, app: Weak<App>, tag: RequestTag) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = ApiClient::fetch_page(&tag.request).await;
            let Some(app) = app.upgrade() else {
                return;
            };
            match result {
                Ok(page) => app.dispatch(Message::PageLoaded { tag, page }),
                Err(e) => {
                    error_log!("Failed to fetch {}: {}", tag.request.cache_key(), e);
                    app.dispatch(Message::PageFailed {
                        tag,
                        error: e.to_string(),
                    });
                }
            }
        });
    }

    fn login(&self, app: Weak<App>, credentials: Credentials) {
        wasm_bindgen_futures::spawn_local(async move {
            let result = AuthClient::login(credentials).await;
            let Some(app) = app.upgrade() else {
                return;
            };
            match result {
                Ok(session) => app.dispatch(Message::LoginSucceeded(session)),
                Err(e) => app.dispatch(Message::LoginFailed(e.to_string())),
            }
        });
    }
}

/// Run one command.  Called by `App::dispatch` after the state borrow has
/// been released.
pub fn execute(app: &App, cmd: Command) {
    match cmd {
        Command::SendMessage(msg) => app.dispatch(msg),
        Command::FetchPage(tag) => app.effects().fetch_page(app.handle(), tag),
        Command::Login(credentials) => app.effects().login(app.handle(), credentials),
        Command::PersistSession(session) => {
            if let Err(e) = storage::save_session(app.store(), &session) {
                error_log!("Failed to persist session: {}", e);
            }
        }
        Command::ClearSession => {
            if let Err(e) = storage::clear_session(app.store()) {
                error_log!("Failed to clear session: {}", e);
            }
        }
        Command::PersistTheme(theme) => {
            if let Err(e) = storage::save_theme(app.store(), theme) {
                warn_log!("Failed to persist theme: {}", e);
            }
        }
        Command::ConnectChat => app.chat().connect(),
        Command::DisconnectChat => app.chat().disconnect(),
        Command::SendChat(text) => match app.chat().send(&text) {
            Ok(()) => app.dispatch(Message::ChatTextSent),
            Err(e) => app.dispatch(Message::ChatSendFailed(e.to_string())),
        },
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;

    use super::*;

    /// Records requested effects instead of running them.
    #[derive(Default)]
    pub struct RecordingEffects {
        fetched: RefCell<Vec<RequestTag>>,
        logins: RefCell<Vec<Credentials>>,
    }

    impl RecordingEffects {
        pub fn fetched(&self) -> Vec<RequestTag> {
            self.fetched.borrow().clone()
        }

        pub fn logins(&self) -> Vec<Credentials> {
            self.logins.borrow().clone()
        }
    }

    impl IEffects for RecordingEffects {
        fn fetch_page(&self, _app: Weak<App>, tag: RequestTag) {
            self.fetched.borrow_mut().push(tag);
        }

        fn login(&self, _app: Weak<App>, credentials: Credentials) {
            self.logins.borrow_mut().push(credentials);
        }
    }
}
