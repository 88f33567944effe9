//! Domain redirect service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │                  REDIRECTOR                   │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐   │
//!   ───────────────────┼─▶│  http   │──▶│ redirect │──▶│ redirect  │   │
//!                      │  │ server  │   │middleware│   │   table   │   │
//!                      │  └─────────┘   └────┬─────┘   └───────────┘   │
//!                      │                     │                         │
//!   301/302 + Location │        match        │  no match               │
//!   ◀──────────────────┼─────────────────────┤                         │
//!                      │                     ▼                         │
//!                      │              ┌──────────────┐                 │
//!   Upstream Response  │              │ pass-through │─────────────────┼──▶ Upstream
//!   ◀──────────────────┼──────────────│  (or 404)    │                 │    (optional)
//!                      │              └──────────────┘                 │
//!                      │                                               │
//!                      │  config (TOML, hot reload) · observability    │
//!                      │  lifecycle (signals, graceful shutdown)       │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use redirector::config::validation::validate_config;
use redirector::config::{load_config, watcher::ConfigWatcher, RedirectorConfig};
use redirector::lifecycle::{signals, Shutdown};
use redirector::observability::{logging, metrics};
use redirector::HttpServer;

#[derive(Parser)]
#[command(name = "redirector")]
#[command(about = "Answers requests with configured domain and path redirects", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "REDIRECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Reload the configuration when the file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RedirectorConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("redirector v{} starting", env!("CARGO_PKG_VERSION"));

    // Load-time warnings were emitted before a subscriber existed.
    for warning in validate_config(&config).unwrap_or_default() {
        tracing::warn!(%warning, "Redirect entry will not match as configured");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        redirects = config.redirects.len(),
        request_timeout_secs = config.timeouts.request_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Config updates from the file watcher and SIGHUP share one channel.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            signals::spawn_reload_on_hangup(path.clone(), watcher.sender());
            let handle = if args.watch { Some(watcher.run()?) } else { None };
            (updates, handle)
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_shutdown_on_signal(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
