//! Persistence of the auth session and the theme preference.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::{from_str, to_string};

use crate::constants::{KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_THEME, KEY_USER};
use crate::error::AppError;
use crate::models::{AuthSession, Theme, User};

/// Minimal string key-value store.
pub trait IKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::Storage("no global window".into()))?;
        window
            .local_storage()
            .map_err(|e| AppError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| AppError::Storage("localStorage unavailable".into()))
    }
}

impl IKeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| AppError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| AppError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| AppError::Storage(format!("{:?}", e)))
    }
}

/// In-memory store for tests and hosts without `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl IKeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

pub fn save_session(store: &dyn IKeyValueStore, session: &AuthSession) -> Result<(), AppError> {
    let user = to_string(&session.user).map_err(|e| AppError::Storage(e.to_string()))?;
    store.set(KEY_ACCESS_TOKEN, &session.access_token)?;
    store.set(KEY_REFRESH_TOKEN, &session.refresh_token)?;
    store.set(KEY_USER, &user)?;
    Ok(())
}

/// A session is restored only when both tokens and a parseable user are
/// present.
pub fn load_session(store: &dyn IKeyValueStore) -> Result<Option<AuthSession>, AppError> {
    let access_token = store.get(KEY_ACCESS_TOKEN)?;
    let refresh_token = store.get(KEY_REFRESH_TOKEN)?;
    let user = store.get(KEY_USER)?;

    let (Some(access_token), Some(refresh_token), Some(user)) = (access_token, refresh_token, user)
    else {
        return Ok(None);
    };

    match from_str::<User>(&user) {
        Ok(user) => Ok(Some(AuthSession {
            user,
            access_token,
            refresh_token,
        })),
        Err(e) => {
            warn_log!("Stored user could not be parsed: {}", e);
            Ok(None)
        }
    }
}

/// Session to start with.  A store that cannot be read is cleared, best
/// effort, and treated as logged out.
pub fn restore_session(store: &dyn IKeyValueStore) -> Option<AuthSession> {
    match load_session(store) {
        Ok(session) => session,
        Err(e) => {
            warn_log!("Discarding stored session: {}", e);
            if let Err(e) = clear_session(store) {
                error_log!("Failed to clear session: {}", e);
            }
            None
        }
    }
}

pub fn clear_session(store: &dyn IKeyValueStore) -> Result<(), AppError> {
    store.remove(KEY_ACCESS_TOKEN)?;
    store.remove(KEY_REFRESH_TOKEN)?;
    store.remove(KEY_USER)?;
    Ok(())
}

pub fn save_theme(store: &dyn IKeyValueStore, theme: Theme) -> Result<(), AppError> {
    store.set(KEY_THEME, theme.as_str())
}

pub fn load_theme(store: &dyn IKeyValueStore) -> Result<Option<Theme>, AppError> {
    Ok(store.get(KEY_THEME)?.as_deref().and_then(Theme::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AuthSession {
        AuthSession {
            user: User {
                id: 1,
                username: "kminchelle".into(),
                email: "k@x.com".into(),
                first_name: "Kim".into(),
                last_name: "Minchelle".into(),
                image: None,
            },
            access_token: "a".into(),
            refresh_token: "r".into(),
        }
    }

    /// Every operation fails, as a locked-down `localStorage` does.
    struct BrokenStore;

    impl IKeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::Storage("denied".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), AppError> {
            Err(AppError::Storage("denied".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), AppError> {
            Err(AppError::Storage("denied".into()))
        }
    }

    #[test]
    fn unreadable_store_restores_as_logged_out() {
        assert!(load_session(&BrokenStore).is_err());
        assert!(clear_session(&BrokenStore).is_err());
        assert_eq!(restore_session(&BrokenStore), None);

        let store = MemoryStore::default();
        save_session(&store, &session()).unwrap();
        assert_eq!(restore_session(&store), Some(session()));
    }

    #[test]
    fn session_round_trip_and_clear() {
        let store = MemoryStore::default();
        assert_eq!(load_session(&store).unwrap(), None);

        save_session(&store, &session()).unwrap();
        assert_eq!(load_session(&store).unwrap(), Some(session()));
        assert!(store.get("user").unwrap().unwrap().contains("\"firstName\":\"Kim\""));

        clear_session(&store).unwrap();
        assert_eq!(load_session(&store).unwrap(), None);
        assert_eq!(store.get("accessToken").unwrap(), None);
    }

    #[test]
    fn restore_requires_all_three_keys() {
        for missing in [KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_USER] {
            let store = MemoryStore::default();
            save_session(&store, &session()).unwrap();
            store.remove(missing).unwrap();
            assert_eq!(load_session(&store).unwrap(), None, "missing {}", missing);
        }
    }

    #[test]
    fn unparseable_user_is_not_restored() {
        let store = MemoryStore::default();
        save_session(&store, &session()).unwrap();
        store.set(KEY_USER, "{not json").unwrap();
        assert_eq!(load_session(&store).unwrap(), None);
    }

    #[test]
    fn theme_is_persisted_by_name() {
        let store = MemoryStore::default();
        assert_eq!(load_theme(&store).unwrap(), None);
        save_theme(&store, Theme::Dark).unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(load_theme(&store).unwrap(), Some(Theme::Dark));

        store.set("theme", "sepia").unwrap();
        assert_eq!(load_theme(&store).unwrap(), None);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_store_sets_and_removes() {
        let store = LocalStorageStore;
        store.set("feedchat-test-key", "value").unwrap();
        assert_eq!(store.get("feedchat-test-key").unwrap().as_deref(), Some("value"));
        store.remove("feedchat-test-key").unwrap();
        assert_eq!(store.get("feedchat-test-key").unwrap(), None);
    }
}
