//! Backend registry and request dispatch.
//!
//! # Responsibilities
//! - Own the ordered backend set for the process lifetime
//! - Start the health-refresh loop on construction
//! - Pick a backend per request and hand the request to its forwarder
//! - Answer `503` when no backend is selectable

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::HealthCheckConfig;
use crate::health::monitor::HealthMonitor;
use crate::http::client::{build_client, ClientError};
use crate::load_balancer::backend::{parse_backend_url, Backend, BackendError};
use crate::load_balancer::{BackendSet, Strategy};
use crate::observability::metrics;

/// Body returned when every backend is believed to be down.
pub const NO_BACKENDS_BODY: &str = "No available backends";

/// Error type for dispatcher construction.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Routes requests across a fixed set of backends.
///
/// Readers load an immutable snapshot of the set; the health loop replaces
/// the whole snapshot once per tick, so a selection never sees a half-updated
/// tick and never waits behind a slow one.
#[derive(Debug)]
pub struct Dispatcher {
    backends: Arc<ArcSwap<BackendSet>>,
    strategy: Box<dyn Strategy>,
    monitor: JoinHandle<()>,
}

impl Dispatcher {
    /// Build one backend per URL and start health monitoring.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<I>(
        urls: I,
        strategy: Box<dyn Strategy>,
        config: &HealthCheckConfig,
    ) -> Result<Self, DispatchError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let client = build_client()?;

        let backends = urls
            .into_iter()
            .map(|raw| {
                let url = parse_backend_url(raw.as_ref())?;
                Ok(Backend::http(url, client.clone(), config.timeout()))
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        Ok(Self::with_backends(backends, strategy, config.interval()))
    }

    /// Start dispatching over pre-built backends, refreshing health every
    /// `interval`. Every backend starts out healthy.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_backends(
        backends: Vec<Backend>,
        strategy: Box<dyn Strategy>,
        interval: Duration,
    ) -> Self {
        let set: BackendSet = backends.into_iter().map(Arc::new).collect();
        tracing::info!(
            backends = set.len(),
            strategy = ?strategy,
            "Dispatcher created"
        );

        let backends = Arc::new(ArcSwap::from_pointee(set));
        let monitor = HealthMonitor::new(backends.clone(), interval);
        let monitor = tokio::spawn(monitor.run());

        Self {
            backends,
            strategy,
            monitor,
        }
    }

    /// Current snapshot of the backend set.
    pub fn backends(&self) -> Arc<BackendSet> {
        self.backends.load_full()
    }

    /// Ask the strategy for the next backend.
    pub fn select(&self) -> Option<Arc<Backend>> {
        let snapshot = self.backends.load();
        self.strategy.next_backend(&snapshot)
    }

    /// Serve one request.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();

        let Some(backend) = self.select() else {
            tracing::warn!(method = %method, uri = %request.uri(), "No available backends");
            metrics::record_request(method.as_str(), 503, "none", start);
            return no_backends();
        };

        tracing::debug!(backend = %backend.url(), method = %method, uri = %request.uri(), "Forwarding request");
        let response = backend.forwarder().forward(request).await;
        metrics::record_request(
            method.as_str(),
            response.status().as_u16(),
            backend.url().as_str(),
            start,
        );
        response
    }

    #[cfg(test)]
    fn publish(&self, set: BackendSet) {
        self.backends.store(Arc::new(set));
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.monitor.abort();
    }
}

fn no_backends() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        NO_BACKENDS_BODY,
    )
        .into_response()
}
