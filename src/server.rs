//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, the click pipeline tasks, and the Axum server
//! lifecycle including graceful shutdown.

use crate::config::Config;
use crate::domain::click_publisher::ClickPublisher;
use crate::domain::event::Event;
use crate::domain::event_bus::EventBus;
use crate::domain::stat_consumer::spawn_stat_consumer;
use crate::infrastructure::persistence::PgStatsRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How long shutdown waits for the publisher and the consumer to drain.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the PostgreSQL pool using the configured limits.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
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

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Event bus, stat consumer and click publisher pool
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting requests, the publisher
/// hands its local queue to the bus, and the consumer applies whatever is
/// queued, each bounded by [`DRAIN_TIMEOUT`].
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let event_bus = Arc::new(EventBus::<Event>::new());

    // Subscribe before anything can publish.
    let consumer_token = CancellationToken::new();
    let consumer = spawn_stat_consumer(
        event_bus.subscribe(),
        Arc::new(PgStatsRepository::new(pool.clone())),
        consumer_token.clone(),
    );

    let publisher_token = CancellationToken::new();
    let (click_publisher, publisher_handles) = ClickPublisher::spawn(
        event_bus.clone(),
        config.click_publish_workers,
        config.click_publish_queue,
        publisher_token.clone(),
    );

    let state = AppState::new(
        pool.clone(),
        event_bus.clone(),
        click_publisher,
        &config.admin_token,
    );
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining click pipeline");

    publisher_token.cancel();
    let publishers = async {
        for handle in publisher_handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Click publisher worker failed");
            }
        }
    };
    if timeout(DRAIN_TIMEOUT, publishers).await.is_err() {
        warn!("Click publisher drain timed out after {DRAIN_TIMEOUT:?}");
    }

    consumer_token.cancel();
    match timeout(DRAIN_TIMEOUT, consumer).await {
        Ok(Ok(report)) => info!(
            recorded = report.recorded,
            failed = report.failed,
            skipped = report.skipped,
            "Stat consumer drained"
        ),
        Ok(Err(e)) => error!(error = %e, "Stat consumer task failed"),
        Err(_) => warn!("Stat consumer drain timed out after {DRAIN_TIMEOUT:?}"),
    }

    event_bus.close();
    pool.close().await;

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
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

    info!("Shutdown signal received");
}
