use crate::api::schemas::validate_username;
use crate::domain::user::{ProfileUpdate, User};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserResponse {
    /// The account holder's own view.
    #[must_use]
    pub fn private(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: Some(user.email),
            avatar: user.avatar,
            bio: user.bio,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// What anyone may see; the email address is withheld.
    #[must_use]
    pub fn public(user: User) -> Self {
        Self { email: None, ..Self::private(user) }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckUsername {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(max = 255, message = "Must be at most 255 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(max = 1000, message = "Must be at most 1000 characters"))]
    pub bio: Option<String>,
}

impl From<UpdateProfile> for ProfileUpdate {
    fn from(payload: UpdateProfile) -> Self {
        Self { name: payload.name, username: payload.username, bio: payload.bio }
    }
}
