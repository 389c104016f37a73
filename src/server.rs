//! HTTP server initialization and runtime setup.
//!
//! Handles storage engine selection, migrations, and Axum server lifecycle.

use crate::application::services::{AuthService, RedirectStore};
use crate::config::Config;
use crate::domain::repositories::{RedirectRepository, StatsRepository};
use crate::infrastructure::persistence::{PgRedirectRepository, PgStatsRepository};
use crate::routes::app_router;
use crate::state::{AppState, SharedStore};
use crate::api::middleware::rate_limit::RateLimit;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Connects to PostgreSQL and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(config: &Config, database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Builds a store over PostgreSQL.
pub fn pg_store(pool: PgPool) -> SharedStore {
    let pool = Arc::new(pool);
    let redirects: Arc<dyn RedirectRepository> = Arc::new(PgRedirectRepository::new(pool.clone()));
    let stats: Arc<dyn StatsRepository> = Arc::new(PgStatsRepository::new(pool));
    RedirectStore::new(redirects, stats)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage engine (PostgreSQL when `DATABASE_URL` is set, in-memory otherwise)
/// - Administrator credential hash
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let auth_service = AuthService::new(config.secret.as_deref());

    let state = match config.database_url {
        Some(ref database_url) => {
            let pool = connect_database(&config, database_url).await?;
            AppState::new(pg_store(pool), auth_service, &config.management_host)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, redirects are kept in memory only");
            AppState::in_memory(auth_service, &config.management_host)
        }
    };

    let app = app_router(
        state,
        RateLimit::from_config(config.behind_proxy),
        &config.static_dir,
    );

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
