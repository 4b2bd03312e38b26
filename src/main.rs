//! sessreg — registry service for distributed election sessions.
//!
//! Startup order: parse CLI, load config, initialize logging, open the
//! session store (directory-creation failure is fatal here, by policy),
//! then serve until SIGINT/SIGTERM triggers a graceful shutdown.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

/// Command-line arguments for the sessreg server.
#[derive(Parser, Debug)]
#[command(
    name = "sessreg",
    version,
    about = "Registry service for distributed election sessions"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "sessreg.yaml")]
    config: String,

    /// Override the bind address (host:port).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = sessreg::config::load_config(&cli.config)?;

    // RUST_LOG wins over the configured level when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    if config.logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Loaded configuration from {}", cli.config);

    let store = sessreg::store::FileStore::new(&config.store.directory)?;
    info!("Session store opened at {}", config.store.directory);

    let bind_addr = cli
        .bind
        .unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    let state = Arc::new(sessreg::AppState {
        config: config.clone(),
        store: Arc::new(store),
    });
    let app = sessreg::server::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("sessreg listening on {}", bind_addr);

    // Graceful shutdown: stop accepting new connections on SIGINT/SIGTERM,
    // let in-flight requests finish, then exit. The store needs no cleanup;
    // every write is already durable once its rename lands.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sessreg shut down");

    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C), then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}
