pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

use serde::Serialize;

/// Standard JSON body for successful responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self { message: "Ok".to_string(), data: Some(data) }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { message: message.into(), data: Some(data) }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), data: None }
    }
}

/// Usernames appear in URLs: 3 to 30 characters of lowercase letters, digits, `_` or `-`.
pub(crate) fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    let len = username.chars().count();
    let charset_ok = username.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');

    if !(3..=30).contains(&len) || !charset_ok {
        return Err(validator::ValidationError::new("username")
            .with_message("Must be 3-30 characters of a-z, 0-9, '_' or '-'".into()));
    }
    Ok(())
}
