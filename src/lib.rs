#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

use crate::api::{MgmtState, ServiceContainer};
use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::health_service::HealthService;
use crate::services::post_service::PostService;
use crate::services::user_service::UserService;
use crate::storage::{DbPool, PgPostStore, PgUserStore, PostStore, RedisSessionCache, SessionCache, UserStore};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub mgmt: MgmtState,
}

/// Wires services to their stores. Performs no I/O.
#[must_use]
pub fn build_app(config: &Config, pool: DbPool, cache: RedisSessionCache) -> App {
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let posts: Arc<dyn PostStore> = Arc::new(PgPostStore::new(pool.clone()));
    let sessions: Arc<dyn SessionCache> = Arc::new(cache.clone());

    let services = ServiceContainer {
        auth_service: AuthService::new(config.auth.clone(), Arc::clone(&users), sessions),
        user_service: UserService::new(users),
        post_service: PostService::new(posts),
    };
    let mgmt = MgmtState { health_service: HealthService::new(pool, cache, config.health.clone()) };

    App { services, mgmt }
}

/// Applies pending schema migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Flips the shutdown channel on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
