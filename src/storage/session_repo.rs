use crate::storage::SessionCache;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

const KEY_PREFIX: &str = "refresh_token:";

/// Redis-backed session cache. One key per user; a new login overwrites the old value.
#[derive(Clone)]
pub struct RedisSessionCache {
    conn: redis::aio::ConnectionManager,
}

impl std::fmt::Debug for RedisSessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionCache").field("prefix", &KEY_PREFIX).finish_non_exhaustive()
    }
}

impl RedisSessionCache {
    #[must_use]
    pub const fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(user_id: i64) -> String {
        format!("{KEY_PREFIX}{user_id}")
    }

    /// Pings the Redis server to check connectivity.
    ///
    /// # Errors
    /// Returns an error if the ping fails.
    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn set(&self, user_id: i64, unique_id: &str, ttl: Duration) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(Self::key(user_id), unique_id, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn get(&self, user_id: i64) -> anyhow::Result<Option<String>> {
        let mut conn = self.conn.clone();
        let unique_id: Option<String> = conn.get(Self::key(user_id)).await?;
        Ok(unique_id)
    }

    async fn delete(&self, user_id: i64) -> anyhow::Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(Self::key(user_id)).await?;
        Ok(())
    }
}
