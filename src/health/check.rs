//! Backend reachability probes.
//!
//! # Responsibilities
//! - Define the `HealthCheck` capability
//! - Implement it as a single HTTP GET with a bounded timeout
//!
//! # Design Decisions
//! - One probe per call, no retries inside a check
//! - Success means exactly `200 OK`; any other status, transport error, or
//!   timeout collapses to `false`

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode, Uri};
use tokio::time;
use url::Url;

use crate::http::client::HttpClient;

/// Default per-probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Answers "is this backend reachable right now?".
#[async_trait]
pub trait HealthCheck: Send + Sync + fmt::Debug {
    /// Run one probe. Must complete in bounded time.
    async fn check(&self) -> bool;
}

/// Health check that GETs the backend's base URL.
pub struct HttpHealthCheck {
    url: Url,
    timeout: Duration,
    client: HttpClient,
}

impl HttpHealthCheck {
    /// Create a check for `url` with the default 5 second timeout.
    pub fn new(url: Url, client: HttpClient) -> Self {
        Self::with_client(url, DEFAULT_PROBE_TIMEOUT, client)
    }

    /// Create a check that shares an existing client.
    pub fn with_client(url: Url, timeout: Duration, client: HttpClient) -> Self {
        Self {
            url,
            timeout,
            client,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build_request(&self) -> Result<Request<Body>, axum::http::Error> {
        let uri: Uri = self.url.as_str().parse()?;
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::USER_AGENT, "lb-proxy-health-check")
            .body(Body::empty())
    }
}

#[async_trait]
impl HealthCheck for HttpHealthCheck {
    async fn check(&self) -> bool {
        let request = match self.build_request() {
            Ok(req) => req,
            Err(e) => {
                tracing::trace!(url = %self.url, error = %e, "Failed to build health check request");
                return false;
            }
        };

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status != StatusCode::OK {
                    tracing::trace!(url = %self.url, status = %status, "Health check failed: unexpected status");
                }
                status == StatusCode::OK
            }
            Ok(Err(e)) => {
                tracing::trace!(url = %self.url, error = %e, "Health check failed: connection error");
                false
            }
            Err(_) => {
                tracing::trace!(url = %self.url, timeout = ?self.timeout, "Health check failed: timeout");
                false
            }
        }
    }
}

impl fmt::Debug for HttpHealthCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpHealthCheck")
            .field("url", &self.url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}
