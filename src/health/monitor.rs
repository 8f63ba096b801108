//! Periodic health refresh.
//!
//! # Responsibilities
//! - Probe every backend once per tick, one after another
//! - Publish the refreshed backend set as a single snapshot
//! - Log only when a backend's health flips

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use arc_swap::ArcSwap;
use futures_util::FutureExt;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::load_balancer::backend::{Backend, HealthStatus};
use crate::load_balancer::BackendSet;
use crate::observability::metrics;

/// Drives the health-refresh loop over a shared backend set.
pub struct HealthMonitor {
    backends: Arc<ArcSwap<BackendSet>>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(backends: Arc<ArcSwap<BackendSet>>, interval: Duration) -> Self {
        Self { backends, interval }
    }

    /// Run forever. The first tick fires one interval after start.
    pub async fn run(self) {
        tracing::info!(interval = ?self.interval, "Health monitor starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }

    /// Probe every backend sequentially and publish the result.
    ///
    /// Returns the number of backends whose health flipped in this tick.
    pub async fn refresh(&self) -> usize {
        let current = self.backends.load_full();
        let mut next: BackendSet = Vec::with_capacity(current.len());
        let mut transitions = 0;

        for backend in current.iter() {
            let healthy = probe(backend).await;
            if healthy != backend.is_healthy() {
                log_transition(backend, healthy);
                transitions += 1;
            }
            metrics::record_backend_health(backend.url().as_str(), healthy);
            next.push(Arc::new(
                backend.with_status(HealthStatus::probed(healthy, SystemTime::now())),
            ));
        }

        // Single writer: nothing else stores into the set, so no update is lost.
        self.backends.store(Arc::new(next));
        transitions
    }
}

/// A probe that panics counts as a failed probe.
async fn probe(backend: &Backend) -> bool {
    AssertUnwindSafe(backend.health_check().check())
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            tracing::error!(backend = %backend.url(), "Health check panicked");
            false
        })
}

fn log_transition(backend: &Backend, healthy: bool) {
    if healthy {
        tracing::info!(backend = %backend.url(), "Backend is now healthy");
    } else {
        tracing::warn!(backend = %backend.url(), "Backend is now unhealthy");
    }
}
