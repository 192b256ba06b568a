use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ECHO_PREFIX, SENDER_ECHO, SENDER_SELF};

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Sent,
    Received,
}

/// One line in the chat log.  Created on every send or receive event and
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub direction: MessageDirection,
    pub sender: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(text: String, direction: MessageDirection, sender: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            direction,
            sender: sender.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn sent(text: &str) -> Self {
        Self::new(text.to_string(), MessageDirection::Sent, SENDER_SELF)
    }

    /// Inbound frames are echoed back with a fixed prefix.
    pub fn received(data: &str) -> Self {
        Self::new(format!("{}{}", ECHO_PREFIX, data), MessageDirection::Received, SENDER_ECHO)
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Products,
    Users,
}

impl FeedKind {
    /// Path segment on the remote feed source.
    pub fn endpoint(&self) -> &'static str {
        match self {
            FeedKind::Products => "products",
            FeedKind::Users => "users",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedKind::Products => "Products",
            FeedKind::Users => "Users",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Common shape both remote item kinds are mapped into.  Fields a kind does
/// not have are simply `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub author: String,
    pub rating: Option<f64>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub age: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// One page of normalized items together with the server's counters.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<NormalizedItem>,
    pub total: u32,
    pub offset: u32,
    pub limit: u32,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_messages_carry_echo_prefix() {
        let msg = ChatMessage::received("hi");
        assert_eq!(msg.text, "Echo: hi");
        assert_eq!(msg.sender, "Echo Server");
        assert_eq!(msg.direction, MessageDirection::Received);

        let sent = ChatMessage::sent("hi");
        assert_eq!(sent.text, "hi");
        assert_eq!(sent.sender, "You");
        assert_ne!(sent.id, msg.id);
    }

    #[test]
    fn chat_message_serializes_iso_timestamp() {
        let msg = ChatMessage::sent("x");
        let json = serde_json::to_value(&msg).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
        assert_eq!(json["direction"], "sent");
    }

    #[test]
    fn theme_round_trips_through_str() {
        assert_eq!(Theme::parse(Theme::Dark.as_str()), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
