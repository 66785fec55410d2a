// src/main.rs

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use onlinecourse::{
    config::Config,
    routes,
    seed,
    state::AppState,
    store::{MemoryStore, PgStore, SharedStore},
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DB_CONNECT_RETRIES: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment (and .env, if present)
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let store: SharedStore = match &config.database_url {
        Some(database_url) => {
            let pool = connect_with_retry(database_url).await?;
            tracing::info!("Database connected...");

            let store = PgStore::new(pool);
            tracing::info!("Running migrations...");
            store.migrate().await.context("Failed to run database migrations")?;
            tracing::info!("Migrations applied successfully.");

            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    // Seed course catalog
    if let Some(path) = &config.seed_file {
        let catalog = seed::load_catalog(path)
            .await
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        let imported = seed::seed_catalog(store.as_ref(), &catalog).await?;
        tracing::info!("Catalog import finished: {} courses added", imported);
    }

    let addr = config.bind_addr;
    let state = AppState { store, config };

    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn connect_with_retry(database_url: &str) -> anyhow::Result<PgPool> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > DB_CONNECT_RETRIES {
                    return Err(e).with_context(|| {
                        format!("Failed to connect to database after {DB_CONNECT_RETRIES} retries")
                    });
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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
