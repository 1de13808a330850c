use crate::domain::user::{ProfileUpdate, User, UserCredentials};
use crate::storage::records::{CredentialsRecord, UserRecord};
use crate::storage::{DbPool, StoreError, UserStore};
use async_trait::async_trait;

const USER_COLUMNS: &str = "id, name, username, email, avatar, bio, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[tracing::instrument(skip(self, email, password_hash), level = "debug")]
    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(skip(self, email), level = "debug")]
    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let record = sqlx::query_as::<_, CredentialsRecord>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let record =
            sqlx::query_as::<_, UserRecord>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(skip(self, update), level = "debug")]
    async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Option<User>, StoreError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users
            SET name = $1, username = $2, bio = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.name.as_deref())
        .bind(&update.username)
        .bind(update.bio.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }
}
