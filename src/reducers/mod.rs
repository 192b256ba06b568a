//! Sub-reducers, one per domain.
//!
//! Each returns `true` when it handled the message.  The root `update.rs`
//! tries them in turn.

pub mod auth;
pub mod chat;
pub mod feed;
pub mod theme;
