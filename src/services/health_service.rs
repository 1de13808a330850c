use crate::config::HealthConfig;
use crate::storage::{DbPool, RedisSessionCache};
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
struct Metrics {
    status: Gauge<i64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("inkwell-server");
        Self {
            status: meter
                .i64_gauge("inkwell_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }

    fn record(&self, component: &'static str, ok: bool) {
        self.status.record(i64::from(ok), &[KeyValue::new("component", component)]);
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    pool: DbPool,
    cache: RedisSessionCache,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(pool: DbPool, cache: RedisSessionCache, config: HealthConfig) -> Self {
        Self { pool, cache, config, metrics: Metrics::new() }
    }

    /// Checks database connectivity.
    ///
    /// # Errors
    /// Returns a string describing the failure if the database is unreachable.
    pub async fn check_db(&self) -> Result<(), String> {
        let db_timeout = Duration::from_millis(self.config.db_timeout_ms);

        let result = match timeout(db_timeout, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(format!("Database connection failed: {e:?}")),
            Err(_) => Err("Database connection timed out".to_string()),
        };
        self.metrics.record("database", result.is_ok());
        result
    }

    /// Checks session cache connectivity.
    ///
    /// # Errors
    /// Returns a string describing the failure if the cache is unreachable.
    pub async fn check_cache(&self) -> Result<(), String> {
        let cache_timeout = Duration::from_millis(self.config.cache_timeout_ms);

        let result = match timeout(cache_timeout, self.cache.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(format!("Cache connection failed: {e:?}")),
            Err(_) => Err("Cache connection timed out".to_string()),
        };
        self.metrics.record("cache", result.is_ok());
        result
    }
}
