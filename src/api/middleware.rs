//! The auth gate for protected routes.
//!
//! Access tokens are self-contained: the gate checks signature and expiry only and
//! never consults the session cache, so an access token stays usable until it expires.

use crate::api::AppState;
use crate::domain::token::{self, TokenError};
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

/// The authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().copied().ok_or(AppError::MissingToken)
    }
}

/// Extracts the access token from `Authorization`, with or without the `Bearer` scheme.
/// A scheme with no credential counts as no token.
fn access_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        None if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Rejects requests without a valid, unexpired access token.
///
/// # Errors
/// `AppError::MissingToken`, `AppError::TokenExpired` or `AppError::InvalidToken`.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, AppError> {
    let claims = {
        let token = access_token(request.headers()).ok_or(AppError::MissingToken)?;
        token::parse(&state.config.auth.access_token_secret, token).map_err(|e| match e {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid | TokenError::Encoding(_) => AppError::InvalidToken,
        })?
    };

    tracing::Span::current().record("user_id", claims.user_id);
    request.extensions_mut().insert(AuthUser { user_id: claims.user_id });

    Ok(next.run(request).await)
}
