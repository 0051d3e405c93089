//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a stop request to running servers.
///
/// Tests use it to stop servers they spawned; in production Ctrl+C does
/// the same job.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve on Ctrl+C or when `signal` fires (or its sender is dropped).
pub async fn wait_for_shutdown(mut signal: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Keep serving until an explicit shutdown arrives.
                let _ = signal.recv().await;
            }
            tracing::info!("Shutdown signal received");
        }
        _ = signal.recv() => {
            tracing::info!("Shutdown requested");
        }
    }
}
