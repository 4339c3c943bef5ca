//! OS signal handling.
//!
//! # Design Decisions
//! - SIGINT and SIGTERM both mean "stop accepting and drain"
//! - No reload signal: configuration is immutable after startup, so the way
//!   to change the upstream origin is to restart the process

/// Wait for a shutdown-worthy OS signal (Ctrl+C, or SIGTERM on Unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
