//! Constants for the frontend application
//!
//! This module centralizes commonly used string literals and limits to
//! prevent typos and enable safe refactoring across the codebase.

// Endpoints (defaults; see `network::config` for overrides)
pub const DEFAULT_FEED_BASE_URL: &str = "https://dummyjson.com";
pub const DEFAULT_ECHO_WS_URL: &str = "wss://echo.websocket.events";
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

// Live connection
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const INITIAL_BACKOFF_MS: u32 = 1000;
pub const MAX_BACKOFF_MS: u32 = 30_000;
pub const CLOSE_NORMAL: u16 = 1000;
pub const CLOSE_ABNORMAL: u16 = 1006;
pub const CLOSE_REASON_MANUAL: &str = "Manual disconnect";

// Chat labels and user-facing errors
pub const ECHO_PREFIX: &str = "Echo: ";
pub const SENDER_SELF: &str = "You";
pub const SENDER_ECHO: &str = "Echo Server";
pub const ERR_CONNECTION: &str = "Connection error occurred";
pub const ERR_CONNECT_FAILED: &str = "Failed to establish connection";
pub const ERR_RECONNECT_EXHAUSTED: &str = "Failed to connect after multiple attempts";
pub const ERR_NOT_CONNECTED: &str = "Not connected to server";
pub const ERR_SEND_FAILED: &str = "Failed to send message. Please check your connection.";

// Validation limits
pub const MAX_MESSAGE_CHARS: usize = 500;
pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

// Mock auth collaborator
pub const MOCK_LOGIN_DELAY_MS: u32 = 1000;
pub const MOCK_USERNAME: &str = "kminchelle";
pub const MOCK_PASSWORD: &str = "0lelplR";
pub const MOCK_ACCESS_TOKEN: &str = "mock-token-12345";
pub const MOCK_REFRESH_TOKEN: &str = "mock-refresh-12345";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid username or password";

// Storage keys
pub const KEY_ACCESS_TOKEN: &str = "accessToken";
pub const KEY_REFRESH_TOKEN: &str = "refreshToken";
pub const KEY_USER: &str = "user";
pub const KEY_THEME: &str = "theme";

// Synthesized creation instants for feed items lie within this window.
pub const CREATED_AT_WINDOW_MS: i64 = 10_000_000_000;

// Element IDs (commonly referenced)
pub const ID_APP_ROOT: &str = "app-root";
pub const ID_LOADING_VIEW: &str = "loading-view";
pub const ID_LOGIN_VIEW: &str = "login-view";
pub const ID_HOME_VIEW: &str = "home-view";
pub const ID_LOGIN_USERNAME: &str = "login-username";
pub const ID_LOGIN_PASSWORD: &str = "login-password";
pub const ID_LOGIN_SUBMIT: &str = "login-submit";
pub const ID_LOGIN_ERROR: &str = "login-error";
pub const ID_LOGIN_USERNAME_ERROR: &str = "login-username-error";
pub const ID_LOGIN_PASSWORD_ERROR: &str = "login-password-error";
pub const ID_NAV_USER: &str = "nav-user";
pub const ID_THEME_TOGGLE: &str = "theme-toggle";
pub const ID_CHAT_TOGGLE: &str = "chat-toggle";
pub const ID_LOGOUT: &str = "logout-button";
pub const ID_FEED_TAB_PRODUCTS: &str = "feed-tab-products";
pub const ID_FEED_TAB_USERS: &str = "feed-tab-users";
pub const ID_FEED_HEADER: &str = "feed-header";
pub const ID_FEED_GRID: &str = "feed-grid";
pub const ID_FEED_STATUS: &str = "feed-status";
pub const ID_FEED_ERROR: &str = "feed-error";
pub const ID_FEED_SENTINEL: &str = "feed-sentinel";
pub const ID_FEED_REFRESH: &str = "feed-refresh";
pub const ID_CHAT_PANEL: &str = "chat-panel";
pub const ID_CHAT_STATUS: &str = "chat-status";
pub const ID_CHAT_ERROR: &str = "chat-error";
pub const ID_CHAT_MESSAGES: &str = "chat-messages";
pub const ID_CHAT_INPUT: &str = "chat-input";
pub const ID_CHAT_DRAFT_ERROR: &str = "chat-draft-error";

// CSS Class Names
pub const CSS_HIDDEN: &str = "hidden";
pub const CSS_VISIBLE: &str = "visible";
pub const CSS_DARK: &str = "dark";
pub const CSS_TAB_BUTTON: &str = "tab-button";
pub const CSS_TAB_BUTTON_ACTIVE: &str = "tab-button active";
pub const CSS_CARD: &str = "card";
pub const CSS_MESSAGE_SENT: &str = "message sent-message";
pub const CSS_MESSAGE_RECEIVED: &str = "message received-message";
pub const CSS_ERROR_TEXT: &str = "error-text";

// Routes
pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_HOME: &str = "/home";
