//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → load_balancer::Dispatcher (pick a backend)
//!     → forward.rs (rewrite + proxy to backend)
//!     → Backend response streamed to client
//! ```

pub mod client;
pub mod forward;
pub mod server;

pub use client::{build_client, ClientError, HttpClient};
pub use forward::Forwarder;
pub use server::HttpServer;
