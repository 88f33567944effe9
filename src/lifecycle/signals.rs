//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGTERM / SIGINT and trigger graceful shutdown
//! - Reload configuration on SIGHUP
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::watcher::reload;
use crate::config::RedirectorConfig;
use crate::lifecycle::Shutdown;

/// Resolves once SIGINT (Ctrl+C) or, on Unix, SIGTERM is received.
pub async fn wait_for_termination() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}

/// Spawn a task that triggers `shutdown` on the first termination signal.
pub fn spawn_shutdown_on_signal(shutdown: Arc<Shutdown>) {
    tokio::spawn(async move {
        wait_for_termination().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });
}

/// Spawn a task that reloads `path` into `tx` on every SIGHUP.
#[cfg(unix)]
pub fn spawn_reload_on_hangup(path: PathBuf, tx: mpsc::UnboundedSender<RedirectorConfig>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler");
                return;
            }
        };

        while hangups.recv().await.is_some() {
            tracing::info!(path = ?path, "SIGHUP received, reloading config");
            let (path, tx) = (path.clone(), tx.clone());
            // File IO off the runtime threads.
            let _ = tokio::task::spawn_blocking(move || reload(&path, &tx)).await;
        }
    });
}

#[cfg(not(unix))]
pub fn spawn_reload_on_hangup(_path: PathBuf, _tx: mpsc::UnboundedSender<RedirectorConfig>) {}
