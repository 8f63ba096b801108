//! Shared upstream HTTP client.
//!
//! One client serves every backend's forwarder and health check. It speaks
//! plain HTTP and HTTPS (rustls, webpki roots) to upstreams; the load
//! balancer itself never terminates TLS.

use axum::body::Body;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

/// Client type used for forwarding and probing.
pub type HttpClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Error type for client construction.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to configure TLS for upstream connections: {0}")]
    Tls(#[from] rustls::Error),
}

/// Build a client that accepts both `http` and `https` upstream URLs.
pub fn build_client() -> Result<HttpClient, ClientError> {
    let connector = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(Client::builder(TokioExecutor::new()).build(connector))
}
