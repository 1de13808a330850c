//! Signed, expiring session tokens.
//!
//! Access and refresh tokens share one format and differ only in the secret, the
//! lifetime and whether a `unique_id` is embedded.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
    #[error("token encoding failed: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    pub exp: i64,
}

/// Everything needed to mint one token.
#[derive(Debug, Clone)]
pub struct TokenDetails<'a> {
    pub secret: &'a str,
    pub user_id: i64,
    pub unique_id: Option<String>,
    pub duration: Duration,
}

impl TokenDetails<'_> {
    /// Issues a token that expires `duration` from now.
    ///
    /// # Errors
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn generate(&self) -> Result<String, TokenError> {
        self.generate_at(OffsetDateTime::now_utc())
    }

    /// Issues a token as if it had been minted at `issued_at`.
    ///
    /// # Errors
    /// Returns `TokenError::Encoding` if signing fails.
    pub fn generate_at(&self, issued_at: OffsetDateTime) -> Result<String, TokenError> {
        let lifetime = i64::try_from(self.duration.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            user_id: self.user_id,
            unique_id: self.unique_id.clone(),
            exp: issued_at.unix_timestamp().saturating_add(lifetime),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(TokenError::Encoding)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // Only the HMAC family; anything else (including "none") is rejected before the signature check.
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.leeway = 0;
    validation
}

/// Verifies `token` against `secret` and returns its claims.
///
/// # Errors
/// `TokenError::Expired` once `exp` has passed, `TokenError::Invalid` for every other failure.
pub fn parse(secret: &str, token: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
}
