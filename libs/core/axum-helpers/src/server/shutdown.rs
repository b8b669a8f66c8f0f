use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

/// Drain flag shared between the server and its cleanup task.
///
/// The flag flips to `true` once; receivers created with
/// [`subscribe`](Self::subscribe) observe it even if they subscribe late.
#[derive(Clone, Debug)]
pub struct ShutdownCoordinator {
    draining: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (draining, _) = watch::channel(false);
        Self { draining }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.draining.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.draining.borrow()
    }

    /// Marks the server as draining. Repeated calls are no-ops.
    pub fn shutdown(&self) {
        if !self.draining.send_replace(true) {
            info!("Server draining, new connections refused");
        }
    }

    /// Waits for SIGTERM or SIGINT, then marks the server as draining.
    pub async fn wait_for_signal(self) {
        shutdown_signal().await;
        self.shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and its branch never fires.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("SIGTERM handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("SIGINT received"),
        _ = terminate => info!("SIGTERM received"),
    }
}
