use crate::api::schemas::users::UserResponse;
use crate::api::schemas::validate_username;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct Registration {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 72, message = "Must be between 8 and 72 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Login {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 72, message = "Must be at most 72 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub user: UserResponse,
    pub access_token: String,
}
