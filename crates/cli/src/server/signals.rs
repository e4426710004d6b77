use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// SIGHUP requests a stub zone refresh; SIGINT/SIGTERM cancel `shutdown`.
pub fn install(refresh: Arc<Notify>, shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let hup_shutdown = shutdown.clone();
        tokio::spawn(async move {
            let mut sighup = match signal(SignalKind::hangup()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "Failed to register SIGHUP handler");
                    return;
                }
            };
            loop {
                tokio::select! {
                    _ = hup_shutdown.cancelled() => break,
                    received = sighup.recv() => {
                        if received.is_none() {
                            break;
                        }
                        info!("Received SIGHUP, refreshing stub zones");
                        refresh.notify_one();
                    }
                }
            }
        });

        tokio::spawn(async move {
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "Failed to register SIGTERM handler");
                    wait_ctrl_c(shutdown).await;
                    return;
                }
            };
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down"),
            }
            shutdown.cancel();
        });
    }

    #[cfg(not(unix))]
    {
        let _ = refresh;
        tokio::spawn(wait_ctrl_c(shutdown));
    }
}

async fn wait_ctrl_c(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, shutting down");
            shutdown.cancel();
        }
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
