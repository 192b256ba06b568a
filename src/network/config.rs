use std::sync::RwLock;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use crate::constants::{DEFAULT_ECHO_WS_URL, DEFAULT_FEED_BASE_URL, DEFAULT_PAGE_LIMIT};
use crate::error::AppError;

/// Endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    feed_base_url: String,
    ws_url: String,
    page_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            ws_url: DEFAULT_ECHO_WS_URL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Build-time overrides via `FEED_API_BASE_URL` / `ECHO_WS_URL`, falling
    /// back to the public defaults.
    pub fn from_build_env() -> Self {
        Self::with_overrides(option_env!("FEED_API_BASE_URL"), option_env!("ECHO_WS_URL"))
    }

    pub fn with_overrides(feed_base_url: Option<&str>, ws_url: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            feed_base_url: feed_base_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.feed_base_url),
            ws_url: ws_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.ws_url),
            page_limit: defaults.page_limit,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.feed_base_url.starts_with("http://") || self.feed_base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "feed base URL must be http(s): {}",
                self.feed_base_url
            )));
        }
        if !(self.ws_url.starts_with("ws://") || self.ws_url.starts_with("wss://")) {
            return Err(AppError::Config(format!("WebSocket URL must be ws(s): {}", self.ws_url)));
        }
        Ok(())
    }

    pub fn feed_base_url(&self) -> &str {
        &self.feed_base_url
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// `<base>/<endpoint>?skip=<offset>&limit=<limit>`
    pub fn page_url(&self, endpoint: &str, offset: u32, limit: u32) -> String {
        format!(
            "{}/{}?skip={}&limit={}",
            self.feed_base_url, endpoint, offset, limit
        )
    }
}

lazy_static! {
    static ref APP_CONFIG: RwLock<Option<AppConfig>> = RwLock::new(None);
}

fn store(config: AppConfig) -> Result<(), AppError> {
    config.validate()?;
    let mut slot = APP_CONFIG
        .write()
        .map_err(|_| AppError::Config("configuration lock poisoned".to_string()))?;
    *slot = Some(config);
    Ok(())
}

/// Initialise from build-time settings.  Keeps an earlier runtime override.
pub fn init_app_config() -> Result<(), AppError> {
    if APP_CONFIG.read().map(|slot| slot.is_some()).unwrap_or(false) {
        return Ok(());
    }
    store(AppConfig::from_build_env())
}

/// Runtime override from the hosting page.  Empty strings keep the
/// defaults.
#[wasm_bindgen]
pub fn init_app_config_js(feed_base_url: &str, ws_url: &str) -> Result<(), JsValue> {
    store(AppConfig::with_overrides(Some(feed_base_url), Some(ws_url)))?;
    Ok(())
}

/// Current configuration, or the defaults if nothing was stored.
pub fn current() -> AppConfig {
    APP_CONFIG
        .read()
        .ok()
        .and_then(|slot| slot.clone())
        .unwrap_or_default()
}

pub fn ws_url() -> String {
    current().ws_url
}
