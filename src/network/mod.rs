// Re-export network modules
pub mod api_client;
pub mod auth_client;
pub mod browser_socket;
pub mod config;
pub mod scheduler;
pub mod ws_client;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use api_client::ApiClient;
pub use auth_client::AuthClient;
pub use browser_socket::BrowserSocketFactory;
pub use config::{init_app_config, init_app_config_js, AppConfig};
pub use scheduler::{BrowserScheduler, IScheduler, ScheduledTask};
pub use ws_client::{ConnectionManager, ConnectionState, ISocket, ISocketFactory, Lifecycle, WsConfig};
