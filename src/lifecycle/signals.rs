//! OS signal handling.
//!
//! Ctrl-C (SIGINT) triggers graceful shutdown.

use crate::lifecycle::Shutdown;

/// Wait for Ctrl-C, then broadcast shutdown.
pub async fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl-C, shutting down");
            shutdown.trigger();
        }
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
    }
}
