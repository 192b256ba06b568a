//! Small crate-wide convenience macros.
//!
//! Logging goes to the browser console on `wasm32`.  On native targets (unit
//! tests, tooling) the message is formatted and dropped so the pure state
//! machines can be exercised without a JS host.

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Warn,
    Error,
}

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub fn console_log(level: LogLevel, message: &str) {
    let value = wasm_bindgen::JsValue::from_str(message);
    match level {
        LogLevel::Debug => web_sys::console::log_1(&value),
        LogLevel::Warn => web_sys::console::warn_1(&value),
        LogLevel::Error => web_sys::console::error_1(&value),
    }
}

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
pub fn console_log(_level: LogLevel, _message: &str) {}

/// Log a debug line, `format!` style.
///
/// ```rust,ignore
/// debug_log!("WebSocket connected to {}", url);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::macros::console_log($crate::macros::LogLevel::Debug, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::macros::console_log($crate::macros::LogLevel::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::macros::console_log($crate::macros::LogLevel::Error, &format!($($arg)*))
    };
}
