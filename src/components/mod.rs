pub mod chat_panel;
pub mod feed_view;
pub mod login_form;
pub mod scroll_trigger;
pub mod top_nav;

pub use scroll_trigger::{ScrollTrigger, SentinelObserver};
