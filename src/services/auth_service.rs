use crate::config::AuthConfig;
use crate::domain::auth_session::{LoginSession, RefreshedSession};
use crate::domain::token::{self, Claims, TokenDetails};
use crate::error::{AppError, Result};
use crate::storage::{SessionCache, StoreError, UserStore};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use opentelemetry::{global, metrics::Counter};
use rand::rngs::OsRng;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
struct Metrics {
    register_total: Counter<u64>,
    login_total: Counter<u64>,
    refresh_total: Counter<u64>,
    logout_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("inkwell-server");
        Self {
            register_total: meter
                .u64_counter("auth_register_total")
                .with_description("Total number of successful registrations")
                .build(),
            login_total: meter
                .u64_counter("auth_login_total")
                .with_description("Total number of successful login attempts")
                .build(),
            refresh_total: meter
                .u64_counter("auth_refresh_total")
                .with_description("Total number of access tokens minted from a refresh token")
                .build(),
            logout_total: meter
                .u64_counter("auth_logout_total")
                .with_description("Total number of successful logout attempts")
                .build(),
        }
    }
}

/// Registration, login and the refresh-session lifecycle.
///
/// Each user has at most one live refresh session: the cache maps the user id to the
/// `unique_id` embedded in the newest refresh token, and a refresh token is honoured
/// only while its `unique_id` matches.
#[derive(Clone, Debug)]
pub struct AuthService {
    config: AuthConfig,
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionCache>,
    metrics: Metrics,
}

impl AuthService {
    pub fn new(config: AuthConfig, users: Arc<dyn UserStore>, sessions: Arc<dyn SessionCache>) -> Self {
        Self { config, users, sessions, metrics: Metrics::new() }
    }

    /// Creates an account. No tokens are issued; the caller logs in separately.
    ///
    /// # Errors
    /// `AppError::DuplicateEmail` if the email or username is taken.
    #[tracing::instrument(skip(self, username, email, password), fields(user_id = tracing::field::Empty))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let password_hash = self.hash_password(password).await?;

        let user_id = self.users.create_user(username, email, &password_hash).await.map_err(|e| match e {
            StoreError::Duplicate => AppError::DuplicateEmail,
            StoreError::Unexpected(e) => AppError::internal("creating user", e),
        })?;

        tracing::Span::current().record("user_id", user_id);
        tracing::info!("User registered");
        self.metrics.register_total.add(1, &[]);
        Ok(())
    }

    /// Verifies credentials and opens a refresh session, replacing any previous one.
    ///
    /// # Errors
    /// `AppError::NoUser` for an unknown email, `AppError::InvalidCredentials` for a wrong password.
    #[tracing::instrument(skip(self, email, password), fields(user_id = tracing::field::Empty))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession> {
        let credentials = self
            .users
            .find_credentials_by_email(email)
            .await
            .map_err(|e| AppError::internal("getting user by email", e))?
            .ok_or(AppError::NoUser)?;

        let user_id = credentials.user.id;
        tracing::Span::current().record("user_id", user_id);

        if !self.verify_password(password, &credentials.password_hash).await? {
            tracing::debug!("Login rejected: password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.issue_access_token(user_id)?;

        let unique_id = Uuid::new_v4().to_string();
        let refresh_token = TokenDetails {
            secret: &self.config.refresh_token_secret,
            user_id,
            unique_id: Some(unique_id.clone()),
            duration: self.config.refresh_token_ttl(),
        }
        .generate()
        .map_err(|e| AppError::internal("generating refresh token", e))?;

        // Without this record the refresh token could never be honoured.
        self.sessions
            .set(user_id, &unique_id, self.config.refresh_token_ttl())
            .await
            .map_err(|e| AppError::internal("caching refresh token", e))?;

        self.metrics.login_total.add(1, &[]);
        Ok(LoginSession { user: credentials.user, access_token, refresh_token })
    }

    /// Mints a new access token. The refresh token and its session record are left as they are.
    ///
    /// # Errors
    /// `AppError::Unauthorized` for an invalid, expired, superseded or logged-out refresh token;
    /// `AppError::NoUser` if the account no longer exists.
    #[tracing::instrument(skip(self, refresh_token), fields(user_id = tracing::field::Empty))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedSession> {
        let claims = self.verify_session(refresh_token).await?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await
            .map_err(|e| AppError::internal("getting user by id", e))?
            .ok_or(AppError::NoUser)?;

        let access_token = self.issue_access_token(user.id)?;

        self.metrics.refresh_total.add(1, &[]);
        Ok(RefreshedSession { user, access_token })
    }

    /// Ends the refresh session the token belongs to.
    ///
    /// # Errors
    /// `AppError::Unauthorized` if the token does not name the live session.
    #[tracing::instrument(skip(self, refresh_token), fields(user_id = tracing::field::Empty))]
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        let claims = self.verify_session(refresh_token).await?;

        self.sessions.delete(claims.user_id).await.map_err(|e| AppError::internal("deleting refresh token", e))?;

        tracing::info!("User logged out");
        self.metrics.logout_total.add(1, &[]);
        Ok(())
    }

    /// Parses a refresh token and checks it against the cached session for its user.
    async fn verify_session(&self, refresh_token: &str) -> Result<Claims> {
        let claims = token::parse(&self.config.refresh_token_secret, refresh_token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            AppError::Unauthorized
        })?;

        tracing::Span::current().record("user_id", claims.user_id);

        let cached =
            self.sessions.get(claims.user_id).await.map_err(|e| AppError::internal("getting refresh token", e))?;

        match (cached, claims.unique_id.as_deref()) {
            (Some(cached), Some(presented)) if cached == presented => Ok(claims),
            _ => {
                tracing::debug!("Refresh session missing or superseded");
                Err(AppError::Unauthorized)
            }
        }
    }

    fn issue_access_token(&self, user_id: i64) -> Result<String> {
        TokenDetails {
            secret: &self.config.access_token_secret,
            user_id,
            unique_id: None,
            duration: self.config.access_token_ttl(),
        }
        .generate()
        .map_err(|e| AppError::internal("generating access token", e))
    }

    /// Hashes a password with Argon2 on the blocking pool.
    ///
    /// # Errors
    /// Returns an internal error if the blocking task dies. Default Argon2 parameters accept
    /// any password under 4 GiB, so no accepted request input makes hashing itself fail.
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AppError::internal("hashing password", anyhow::anyhow!(e)))
        })
        .await
        .map_err(|e| AppError::internal("hashing password", e))?
    }

    /// Checks a password against a stored hash in constant time.
    ///
    /// # Errors
    /// Returns an internal error if the stored hash is unreadable.
    #[tracing::instrument(skip_all, level = "debug")]
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| AppError::internal("parsing password hash", anyhow::anyhow!(e)))?;
            Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
        })
        .await
        .map_err(|e| AppError::internal("verifying password", e))?
    }
}
