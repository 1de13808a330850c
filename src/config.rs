use clap::{Args, Parser, ValueEnum};
use std::time::Duration;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub cache: CacheConfig,

    #[command(flatten)]
    pub auth: AuthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,

    #[command(flatten)]
    pub health: HealthConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "INKWELL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the public API
    #[arg(long, env = "INKWELL_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Port for the management server (health checks)
    #[arg(long, env = "INKWELL_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work after a shutdown signal
    #[arg(long, env = "INKWELL_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    /// Upper bound on a single request, in seconds
    #[arg(long, env = "INKWELL_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Production mode: session cookies are marked Secure
    #[arg(long, env = "INKWELL_PRODUCTION", default_value_t = false)]
    pub production: bool,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[arg(id = "database_url", long = "database-url", env = "INKWELL_DATABASE_URL")]
    pub url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "INKWELL_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// Connections kept open while idle
    #[arg(long, env = "INKWELL_DB_MIN_CONNECTIONS", default_value_t = 2)]
    pub min_connections: u32,

    #[arg(long, env = "INKWELL_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub acquire_timeout_secs: u64,

    /// Lifetime of a pooled connection before it is recycled
    #[arg(long, env = "INKWELL_DB_MAX_LIFETIME_SECS", default_value_t = 300)]
    pub max_lifetime_secs: u64,

    /// Connection attempts at startup before giving up
    #[arg(
        id = "db_connect_attempts",
        long = "db-connect-attempts",
        env = "INKWELL_DB_CONNECT_ATTEMPTS",
        default_value_t = 5
    )]
    pub connect_attempts: usize,
}

#[derive(Clone, Debug, Args)]
pub struct CacheConfig {
    /// Redis connection URL for the session cache
    #[arg(id = "cache_url", long = "cache-url", env = "INKWELL_CACHE_URL", default_value = "redis://127.0.0.1:6379")]
    pub url: String,

    /// Minimum backoff between connection attempts at startup
    #[arg(long, env = "INKWELL_CACHE_MIN_BACKOFF_SECS", default_value_t = 1)]
    pub min_backoff_secs: u64,

    /// Maximum backoff between connection attempts at startup
    #[arg(long, env = "INKWELL_CACHE_MAX_BACKOFF_SECS", default_value_t = 10)]
    pub max_backoff_secs: u64,

    /// Connection attempts before giving up at startup
    #[arg(
        id = "cache_connect_attempts",
        long = "cache-connect-attempts",
        env = "INKWELL_CACHE_CONNECT_ATTEMPTS",
        default_value_t = 5
    )]
    pub connect_attempts: usize,
}

#[derive(Clone, Debug, Args)]
pub struct AuthConfig {
    /// Secret key for signing access tokens
    #[arg(long, env = "INKWELL_ACCESS_TOKEN_SECRET")]
    pub access_token_secret: String,

    /// Access token time-to-live in seconds
    #[arg(long, env = "INKWELL_ACCESS_TOKEN_TTL_SECS", default_value_t = 900)]
    pub access_token_ttl_secs: u64,

    /// Secret key for signing refresh tokens
    #[arg(long, env = "INKWELL_REFRESH_TOKEN_SECRET")]
    pub refresh_token_secret: String,

    /// Refresh token time-to-live in hours
    #[arg(long, env = "INKWELL_REFRESH_TOKEN_TTL_HOURS", default_value_t = 240)]
    pub refresh_token_ttl_hours: u64,
}

impl AuthConfig {
    #[must_use]
    pub const fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    #[must_use]
    pub const fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_hours.saturating_mul(3600))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "INKWELL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint (gRPC). Export is disabled when unset.
    #[arg(long, env = "INKWELL_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    #[arg(long, env = "INKWELL_HEALTH_DB_TIMEOUT_MS", default_value_t = 2000)]
    pub db_timeout_ms: u64,

    #[arg(long, env = "INKWELL_HEALTH_CACHE_TIMEOUT_MS", default_value_t = 2000)]
    pub cache_timeout_ms: u64,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const REQUIRED: [&str; 7] = [
        "inkwell-server",
        "--database-url",
        "postgres://localhost/inkwell",
        "--access-token-secret",
        "access",
        "--refresh-token-secret",
        "refresh",
    ];

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(REQUIRED).unwrap();

        assert_eq!(config.auth.access_token_ttl(), Duration::from_secs(15 * 60));
        assert_eq!(config.auth.refresh_token_ttl(), Duration::from_secs(240 * 3600));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_format, LogFormat::Text);
        assert!(!config.server.production);
    }

    #[test]
    fn test_overrides() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--refresh-token-ttl-hours", "1", "--log-format", "json", "--production"]);
        let config = Config::try_parse_from(args).unwrap();

        assert_eq!(config.auth.refresh_token_ttl(), Duration::from_secs(3600));
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert!(config.server.production);
    }

    #[test]
    fn test_argument_ids_are_unique() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_database_and_cache_flags_are_distinct() {
        let mut args = REQUIRED.to_vec();
        args.extend([
            "--cache-url",
            "redis://cache:6379",
            "--db-connect-attempts",
            "3",
            "--cache-connect-attempts",
            "7",
        ]);
        let config = Config::try_parse_from(args).unwrap();

        assert_eq!(config.database.url, "postgres://localhost/inkwell");
        assert_eq!(config.cache.url, "redis://cache:6379");
        assert_eq!(config.database.connect_attempts, 3);
        assert_eq!(config.cache.connect_attempts, 7);
    }

    #[test]
    fn test_secrets_are_required() {
        let result = Config::try_parse_from(["inkwell-server", "--database-url", "postgres://localhost/inkwell"]);
        assert!(result.is_err());
    }
}
