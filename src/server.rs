//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connections, dependency wiring, and the Axum
//! server lifecycle.

use crate::application::services::{LinkService, ListingPolicy, TokenIdentityResolver};
use crate::config::{Config, StorageKind};
use crate::domain::IdentityResolver;
use crate::domain::repositories::{LinkRepository, OwnerRepository};
use crate::infrastructure::memory::{MemoryLinkRepository, MemoryOwnerRepository};
use crate::infrastructure::persistence::{PgLinkRepository, PgOwnerRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::SaltedHashGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Creates the PostgreSQL pool from the `DB_*` pool settings.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Wires services on top of the given stores.
pub fn build_state(
    config: &Config,
    links: Arc<dyn LinkRepository>,
    owners: Arc<dyn OwnerRepository>,
) -> AppState {
    let identity: Arc<dyn IdentityResolver> = Arc::new(TokenIdentityResolver::new(
        owners,
        config.token_signing_secret.clone(),
    ));

    let link_service = LinkService::new(
        links.clone(),
        identity.clone(),
        Arc::new(SaltedHashGenerator::new()),
        ListingPolicy {
            include_retired: config.list_include_retired,
        },
    );

    AppState {
        link_service: Arc::new(link_service),
        identity,
        link_repository: links,
        base_url: config.base_url.trim_end_matches('/').to_string(),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool + migrations, or in-memory stores)
/// - Services and router
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (links, owners): (Arc<dyn LinkRepository>, Arc<dyn OwnerRepository>) =
        match config.storage {
            StorageKind::Postgres => {
                let pool = connect_pool(&config).await?;
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to apply migrations")?;
                tracing::info!("Migrations applied");

                let pool = Arc::new(pool);
                (
                    Arc::new(PgLinkRepository::new(pool.clone())),
                    Arc::new(PgOwnerRepository::new(pool)),
                )
            }
            StorageKind::Memory => {
                tracing::warn!("Using in-memory storage, data will be lost on shutdown");
                (
                    Arc::new(MemoryLinkRepository::new()),
                    Arc::new(MemoryOwnerRepository::new()),
                )
            }
        };

    let state = build_state(&config, links, owners);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
