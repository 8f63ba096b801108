//! Single-host request forwarding.
//!
//! # Responsibilities
//! - Rewrite the inbound URI onto the backend's base URL
//! - Strip hop-by-hop headers and record the client in `x-forwarded-for`
//! - Stream the upstream response back, minus its hop-by-hop headers
//!
//! # Design Decisions
//! - One client per process, shared by every backend's forwarder
//! - Transport failures become `502 Bad Gateway`; nothing is retried

use std::fmt;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Request, StatusCode, Uri, Version,
};
use axum::response::{IntoResponse, Response};
use url::{Position, Url};

use crate::http::client::HttpClient;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Headers that apply to a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Forwarding handle bound to one backend.
#[derive(Clone)]
pub struct Forwarder {
    target: Url,
    client: HttpClient,
}

impl Forwarder {
    pub fn new(target: Url, client: HttpClient) -> Self {
        Self { target, client }
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Forward `request` to the bound backend and return its response.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let (mut parts, body) = request.into_parts();

        parts.uri = match rewrite_uri(&self.target, &parts.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(backend = %self.target, uri = %parts.uri, error = %e, "Failed to rewrite request URI");
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        if let Some(peer) = peer {
            append_forwarded_for(&mut parts.headers, peer);
        }

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::warn!(backend = %self.target, error = %e, "Upstream request failed");
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }
}

impl fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forwarder")
            .field("target", &self.target.as_str())
            .finish_non_exhaustive()
    }
}

/// Map an inbound URI onto `target`: scheme and authority come from the
/// target, paths are joined with a single slash, queries are joined with `&`.
pub fn rewrite_uri(target: &Url, incoming: &Uri) -> Result<Uri, axum::http::Error> {
    let authority = &target[Position::BeforeHost..Position::AfterPort];
    let path = join_paths(target.path(), incoming.path());

    let path_and_query = match (target.query().unwrap_or(""), incoming.query().unwrap_or("")) {
        ("", "") => path,
        (t, "") => format!("{path}?{t}"),
        ("", i) => format!("{path}?{i}"),
        (t, i) => format!("{path}?{t}&{i}"),
    };

    Uri::builder()
        .scheme(target.scheme())
        .authority(authority)
        .path_and_query(path_and_query)
        .build()
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // Headers named by `Connection` are connection-scoped too.
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let ip = peer.ip().to_string();
    let value = match headers.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(prior) => format!("{prior}, {ip}"),
        None => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
