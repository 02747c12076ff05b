//! holonetd: the Holonet daemon.
//!
//! Serves the aggregation gateway over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use holonet::HolonetError;
use holonet::server::config::Config;
use holonet::server::{AppState, router};

/// Holonet daemon: cached, relation-aware upstream gateway.
#[derive(Parser)]
#[command(name = "holonetd")]
#[command(version = holonet::PKG_VERSION)]
#[command(about = "Holonet aggregation gateway daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "HOLONET_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;

    // Parse address
    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| HolonetError::Configuration(format!("Invalid address: {e}")))?;

    let state = Arc::new(AppState::from_config(&config)?);

    info!(
        version = %holonet::version_string(),
        %addr,
        upstream = %config.upstream.base_url,
        ttl_secs = config.cache.ttl_secs,
        max_depth = config.enrich.max_depth,
        "holonetd starting"
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
