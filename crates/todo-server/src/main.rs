//! Binary entry point for todo-server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use todo_app::{ServerConfig, TodoService};
use todo_server::{AppState, router};
use todo_store_memory::MemoryStore;

/// In-memory todo tracking over HTTP.
#[derive(Parser, Debug)]
#[command(name = "todo-server", version, about)]
struct Cli {
    /// Configuration file (defaults to ./todo-server.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration file.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Log filter directive, overriding the configuration file.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(filter) = cli.log {
        config.logging.filter = filter;
    }

    install_tracing(&config.logging.filter);

    tokio::runtime::Runtime::new()
        .context("failed to start tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: ServerConfig) -> Result<()> {
    let service = TodoService::new(MemoryStore::new());
    let state = AppState::new(service, config.pagination);
    let app = router(state, &config.server)?;

    let listener = TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    info!(addr = %config.server.bind, "todo-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("todo-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl-C, shutting down");
}

fn install_tracing(default_filter: &str) {
    // RUST_LOG takes precedence over the configured filter.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
