//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown of the HTTP entry point.
///
/// Provides a broadcast channel that long-running tasks can subscribe to.
/// The health-refresh loop is not a subscriber; it lives as long as its
/// dispatcher.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
