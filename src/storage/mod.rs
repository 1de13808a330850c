use crate::config::{CacheConfig, DatabaseConfig};
use crate::domain::post::{Category, NewPost, Post, PostFilter, Window};
use crate::domain::user::{ProfileUpdate, User, UserCredentials};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use thiserror::Error;

pub mod post_repo;
pub mod records;
pub mod session_repo;
pub mod user_repo;

pub use post_repo::PgPostStore;
pub use session_repo::RedisSessionCache;
pub use user_repo::PgUserStore;

pub type DbPool = Pool<Postgres>;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Duplicate,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        {
            return Self::Duplicate;
        }
        Self::Unexpected(err.into())
    }
}

/// Persistent user records. Lookups that find nothing return `Ok(None)`.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<i64, StoreError>;

    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Writes the edit and returns the stored row, or `None` if the user is gone.
    async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Option<User>, StoreError>;
}

/// Posts and their categories. Posts are always read joined with category and author.
#[async_trait]
pub trait PostStore: Send + Sync + std::fmt::Debug {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn find_category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError>;

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError>;

    /// `StoreError::Duplicate` if the slug is taken.
    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError>;

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    /// Matching posts in ascending id order, restricted to `window`.
    async fn list_posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>, StoreError>;

    async fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError>;

    /// Rewrites every author-supplied field. `None` if the post is gone.
    async fn update_post(&self, id: i64, post: &NewPost) -> Result<Option<Post>, StoreError>;

    async fn delete_post(&self, id: i64) -> Result<(), StoreError>;
}

/// Maps a user id to the unique id of its single live refresh session.
#[async_trait]
pub trait SessionCache: Send + Sync + std::fmt::Debug {
    async fn set(&self, user_id: i64, unique_id: &str, ttl: Duration) -> anyhow::Result<()>;

    async fn get(&self, user_id: i64) -> anyhow::Result<Option<String>>;

    async fn delete(&self, user_id: i64) -> anyhow::Result<()>;
}

/// Initializes the database connection pool, retrying with backoff while the server comes up.
///
/// # Errors
/// Returns `sqlx::Error` if every attempt fails.
pub async fn init_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs));

    (|| options.clone().connect(&config.url))
        .retry(ExponentialBuilder::default().with_max_times(config.connect_attempts))
        .when(|e| matches!(e, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut))
        .notify(|e, delay| {
            tracing::warn!(error = %e, ?delay, "Database unavailable, retrying");
        })
        .await
}

/// Opens a managed Redis connection, retrying with backoff while the server comes up.
///
/// # Errors
/// Returns an error if the URL is malformed or every attempt fails.
pub async fn init_cache(config: &CacheConfig) -> anyhow::Result<redis::aio::ConnectionManager> {
    let client = redis::Client::open(config.url.as_str())?;
    let retry_strategy = ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(config.min_backoff_secs))
        .with_max_delay(Duration::from_secs(config.max_backoff_secs))
        .with_max_times(config.connect_attempts);

    let manager = (|| async { client.get_connection_manager().await })
        .retry(retry_strategy)
        .notify(|e, delay| {
            tracing::warn!(error = %e, ?delay, "Session cache unavailable, retrying");
        })
        .await?;

    Ok(manager)
}
