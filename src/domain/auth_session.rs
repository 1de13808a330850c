use crate::domain::user::User;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of exchanging a refresh token. The refresh token itself is not rotated.
#[derive(Debug, Clone)]
pub struct RefreshedSession {
    pub user: User,
    pub access_token: String,
}
