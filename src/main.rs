//! Ideas relay server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                     IDEAS RELAY                       │
//!                        │                                                       │
//!   Browser request      │  ┌────────────┐   ┌──────────────────────────────┐   │
//!   ─────────────────────┼─▶│ request-id │──▶│ /api/ideas       ─────────────┼───┼──▶ ideas API
//!                        │  │ trace      │   │ /api/image-proxy              │   │
//!                        │  │ timeout    │   │   allow-list → plan → relay ──┼───┼──▶ image host(s)
//!                        │  │ headers    │   │   └─ placeholder ─────────────┼───┼──▶ placeholder
//!                        │  └────────────┘   │ /api/logo-proxy  ─────────────┼───┼──▶ site logo
//!                        │                   │ /api/banner, /health          │   │
//!                        │                   └──────────────────────────────┘   │
//!                        │                                                       │
//!                        │  config (TOML, hot reload) · tracing · metrics        │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use ideas_relay::config::watcher::ConfigWatcher;
use ideas_relay::config::{load_config, AppConfig};
use ideas_relay::lifecycle::signals::spawn_signal_handler;
use ideas_relay::observability::{logging, metrics};
use ideas_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "ideas-relay", version, about = "Ideas page API and image relay")]
struct Args {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("ideas-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        allowed_prefixes = ?config.image_proxy.allowed_prefixes,
        disguises = config.image_proxy.disguises.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Hot reload only makes sense when there is a file to watch.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_handler(shutdown.clone());

    let tls_enabled = config.listener.tls.is_some();
    let bind_address: SocketAddr = config.listener.bind_address.parse()?;
    let server = HttpServer::new(config)?;

    if tls_enabled {
        server
            .run_tls(bind_address, config_updates, shutdown.subscribe())
            .await?;
    } else {
        let listener = TcpListener::bind(bind_address).await?;
        tracing::info!(address = %listener.local_addr()?, "Listening for connections");
        server
            .run(listener, config_updates, shutdown.subscribe())
            .await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
