use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use estate_api::config::AppConfig;
use estate_api::database::{manager, MemoryStore, PgStore, Store};
use estate_api::{app, AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// PostgreSQL at DATABASE_URL
    Postgres,
    /// In-process store; data is lost on exit
    Memory,
}

#[derive(Parser)]
#[command(name = "estate-api")]
#[command(about = "Real-estate listing marketplace API server")]
#[command(version)]
struct Args {
    #[arg(long, env = "HOST", help = "Interface to bind")]
    host: Option<String>,

    #[arg(long, env = "PORT", help = "Port to listen on")]
    port: Option<u16>,

    #[arg(long, value_enum, default_value_t = StoreKind::Postgres, help = "Backing store")]
    store: StoreKind,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and JWT_SECRET are picked up locally
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("estate_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting Estate API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match args.store {
        StoreKind::Postgres => {
            let pool = manager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            let store = PgStore::new(pool);
            store.ensure_schema().await.context("failed to prepare schema")?;
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; all data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store.clone()).context("failed to initialise session tokens")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Estate API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
