//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Hold the forwarding handle and health check bound at construction
//! - Carry the health state observed by the most recent probe

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use thiserror::Error;
use url::Url;

use crate::health::check::{HealthCheck, HttpHealthCheck};
use crate::http::client::HttpClient;
use crate::http::forward::Forwarder;

/// Error type for backend address parsing.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {scheme:?} in backend URL {url:?}")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("backend URL {0:?} has no host")]
    MissingHost(String),
}

/// Parse a backend base URL. Accepts `http` and `https` upstreams.
pub fn parse_backend_url(raw: &str) -> Result<Url, BackendError> {
    let url = Url::parse(raw).map_err(|source| BackendError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(BackendError::MissingHost(raw.to_string()));
    }
    Ok(url)
}

/// Health belief about a backend, replaced as a whole by each refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    /// `None` until the first probe has run.
    pub last_checked: Option<SystemTime>,
}

impl HealthStatus {
    /// Optimistic state every backend starts in.
    pub const fn initial() -> Self {
        Self {
            healthy: true,
            last_checked: None,
        }
    }

    pub fn probed(healthy: bool, at: SystemTime) -> Self {
        Self {
            healthy,
            last_checked: Some(at),
        }
    }
}

/// A single backend server.
///
/// A `Backend` is immutable: the health loop publishes a fresh value with the
/// new [`HealthStatus`], sharing the same forwarder and health check.
#[derive(Clone)]
pub struct Backend {
    url: Url,
    forwarder: Forwarder,
    health_check: Arc<dyn HealthCheck>,
    /// Stored for future weighted strategies; no current strategy reads it.
    weight: u32,
    status: HealthStatus,
}

impl Backend {
    /// Create a backend with an explicit forwarder and health check.
    pub fn new(url: Url, forwarder: Forwarder, health_check: Arc<dyn HealthCheck>) -> Self {
        Self {
            url,
            forwarder,
            health_check,
            weight: 1,
            status: HealthStatus::initial(),
        }
    }

    /// Create a backend that forwards with `client` and is probed with an
    /// HTTP GET against its base URL.
    pub fn http(url: Url, client: HttpClient, probe_timeout: Duration) -> Self {
        let forwarder = Forwarder::new(url.clone(), client.clone());
        let health_check = Arc::new(HttpHealthCheck::with_client(
            url.clone(),
            probe_timeout,
            client,
        ));
        Self::new(url, forwarder, health_check)
    }

    /// Copy of this backend carrying a different health status.
    pub fn with_status(&self, status: HealthStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    pub fn health_check(&self) -> &dyn HealthCheck {
        self.health_check.as_ref()
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn is_healthy(&self) -> bool {
        self.status.healthy
    }

    pub fn last_checked(&self) -> Option<SystemTime> {
        self.status.last_checked
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("url", &self.url.as_str())
            .field("weight", &self.weight)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
