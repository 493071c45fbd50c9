//! UTXO ledger indexer service.
//!
//! This is the main entry point for the ledger-node binary.

use anyhow::{Context, Result};
use clap::Parser;
use ledger_api::AppState;
use ledger_state::ChainEngine;
use ledger_storage::Database;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::NodeConfig;

/// UTXO ledger indexer: accepts blocks in height order, tracks balances,
/// and supports rollback and reset.
#[derive(Parser, Debug)]
#[command(name = "ledger-node")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of the ledger store (directory, created if missing)
    #[arg(long, env = "DATABASE_URL")]
    database_url: PathBuf,

    /// HTTP bind address
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Reject blocks carrying negative output values
    #[arg(long)]
    reject_negative_values: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = NodeConfig::from_args(&args);

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ledger node v{}", env!("CARGO_PKG_VERSION"));
    info!("Store: {:?}", config.database_url);
    info!("API: {}", config.bind_address);

    // Open the store; a failure here is fatal and exits non-zero.
    std::fs::create_dir_all(&config.database_url)
        .with_context(|| format!("creating store directory {:?}", config.database_url))?;
    let storage = Arc::new(
        Database::open(&config.database_url)
            .with_context(|| format!("opening store at {:?}", config.database_url))?,
    );

    // Replay the persisted journal into memory.
    let engine = Arc::new(
        ChainEngine::open(storage)
            .context("loading chain state")?
            .with_policy(config.policy),
    );
    info!(height = engine.current_height(), "Chain state ready");

    let router = ledger_api::build_api(AppState::new(engine));

    let bind_addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_address))?;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;

    info!("Listening on {}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving API")?;

    info!("Ledger node stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown signal received");
}

/// Parse a log level name, defaulting to INFO for unknown names.
pub(crate) fn parse_log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
