//! Crate-wide error type.
//!
//! Everything below the wasm boundary returns `Result<_, AppError>`; the
//! exported functions convert to `JsValue` via the `From` impl.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// The live transport could not be created or failed outright.
    #[error("Transport error: {0}")]
    Transport(String),

    /// `send` was attempted while the transport was not open.
    #[error("Not connected to server")]
    NotConnected,

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("{message}")]
    Auth { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Wrap an opaque JS exception with some context.
    pub fn from_js(context: &str, value: &JsValue) -> Self {
        let detail = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        AppError::Network(format!("{}: {}", context, detail))
    }

    /// HTTP-ish status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } | AppError::Auth { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(err.to_string())
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_and_auth() {
        let http = AppError::Http { status: 503, message: "down".into() };
        let auth = AppError::Auth { status: 401, message: "nope".into() };
        assert_eq!(http.status(), Some(503));
        assert_eq!(auth.status(), Some(401));
        assert_eq!(AppError::NotConnected.status(), None);
        assert_eq!(auth.to_string(), "nope");
    }

    #[test]
    fn serde_errors_become_invalid_response() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::InvalidResponse(_)));
    }
}
