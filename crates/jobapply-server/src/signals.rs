use std::time::Instant;
use tokio::signal;
use tracing::{error, info};

/// Future that resolves when the process receives Ctrl+C or SIGTERM
///
/// Use this with axum's `with_graceful_shutdown` to drain connections. If a
/// handler cannot be installed, that signal is never reported.
pub async fn shutdown_signal(started: Instant) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    info!(
        signal = received,
        uptime_secs = started.elapsed().as_secs(),
        "shutdown initiated"
    );
}
