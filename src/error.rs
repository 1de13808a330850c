use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Email already in use")]
    DuplicateEmail,
    #[error("Username already taken")]
    DuplicateUsername,
    #[error("User not found")]
    NoUser,
    #[error("Title has already been used")]
    DuplicateTitle,
    #[error("Post not found")]
    NoPost,
    #[error("Category not found")]
    NoCategory,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Session invalid or expired, please login first")]
    Unauthorized,
    #[error("You need to login first")]
    MissingToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("You don't have permission to do that")]
    Forbidden,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Some fields are invalid")]
    Validation(#[from] ValidationErrors),
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Wraps an unexpected failure with the name of the operation that hit it.
    pub fn internal(context: &'static str, err: impl Into<anyhow::Error>) -> Self {
        Self::Internal { context, source: err.into() }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::DuplicateEmail | Self::DuplicateUsername | Self::DuplicateTitle => StatusCode::CONFLICT,
            Self::NoUser | Self::NoPost | Self::NoCategory => StatusCode::NOT_FOUND,
            Self::InvalidCredentials
            | Self::Unauthorized
            | Self::MissingToken
            | Self::TokenExpired
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            Self::Internal { context, source } => {
                tracing::error!(error = %source, context, "Internal server error");
                json!({ "message": "Something went wrong" })
            }
            Self::Validation(errors) => {
                tracing::debug!(errors = %errors, "Validation failed");
                json!({ "message": "Some fields are invalid", "errors": errors })
            }
            other => {
                tracing::debug!(status = status.as_u16(), message = %other, "Request rejected");
                json!({ "message": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}
