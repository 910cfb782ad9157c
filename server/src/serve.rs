//! HTTP server lifecycle.

use crate::config::ServerConfig;
use anyhow::Context;
use axum::Router;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Bind and serve `app` until a shutdown signal arrives.
///
/// After the signal, in-flight requests get `shutdown_timeout` to finish;
/// whatever is still running then is dropped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = signalled_tx.send(());
            })
            .await
    });

    // Resolves on the signal, or when the server exits on its own.
    let _ = signalled_rx.await;

    finish_within(server, config.shutdown_timeout()).await?;

    info!("Server stopped");
    Ok(())
}

/// Wait up to `grace` for the server task, then abort it.
///
/// Returns once the task has ended either way, so nothing it owns outlives the call.
async fn finish_within(
    mut server: JoinHandle<std::io::Result<()>>,
    grace: Duration,
) -> anyhow::Result<()> {
    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => joined.context("Server task failed")?.context("Server error")?,
        Err(_) => {
            warn!(
                timeout_secs = grace.as_secs(),
                "Graceful shutdown timed out, dropping in-flight requests"
            );
            server.abort();
            // Resolves with a cancellation error once the task has been dropped.
            let _ = server.await;
        }
    }
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed, that source is ignored and the other
/// one is still awaited.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
