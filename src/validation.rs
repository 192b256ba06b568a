//! Input validation that runs before any network call.

use unicode_segmentation::UnicodeSegmentation;

use crate::constants::{MAX_MESSAGE_CHARS, MIN_PASSWORD_CHARS, MIN_USERNAME_CHARS};
use crate::error::AppError;

/// Validate a chat line and return the trimmed text to send.
///
/// Length is counted in grapheme clusters so an emoji counts as one
/// character, the way a user reads it.
pub fn validate_message(message: &str) -> Result<&str, AppError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }
    if message.graphemes(true).count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "Message is too long (max {} characters)",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(trimmed)
}

/// Per-field login form errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFormErrors {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginFormErrors {
    pub fn is_valid(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

pub fn validate_login_form(username: &str, password: &str) -> LoginFormErrors {
    let mut errors = LoginFormErrors::default();

    if username.trim().is_empty() {
        errors.username = Some("Username is required".to_string());
    } else if username.graphemes(true).count() < MIN_USERNAME_CHARS {
        errors.username = Some(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_CHARS
        ));
    }

    if password.trim().is_empty() {
        errors.password = Some("Password is required".to_string());
    } else if password.graphemes(true).count() < MIN_PASSWORD_CHARS {
        errors.password = Some(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_CHARS
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_must_not_be_blank() {
        assert!(validate_message("").is_err());
        assert!(validate_message("   \n").is_err());
        assert_eq!(validate_message("  hello ").unwrap(), "hello");
    }

    #[test]
    fn message_length_counts_graphemes() {
        let at_limit = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&at_limit).is_ok());

        let too_long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        let err = validate_message(&too_long).unwrap_err();
        assert_eq!(err.to_string(), "Message is too long (max 500 characters)");

        // 500 family emoji are far more than 500 bytes but still valid.
        let emoji = "👨‍👩‍👧".repeat(MAX_MESSAGE_CHARS);
        assert!(validate_message(&emoji).is_ok());
    }

    #[test]
    fn login_form_rules() {
        let errors = validate_login_form("", "");
        assert_eq!(errors.username.as_deref(), Some("Username is required"));
        assert_eq!(errors.password.as_deref(), Some("Password is required"));

        let errors = validate_login_form("ab", "12345");
        assert_eq!(
            errors.username.as_deref(),
            Some("Username must be at least 3 characters long")
        );
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters long")
        );

        assert!(validate_login_form("kminchelle", "0lelplR").is_valid());
    }
}
