//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → dispatcher.rs (load current backend snapshot)
//!     → Strategy picks one backend:
//!         - round_robin.rs (rotate through healthy backends)
//!     → http::forward (proxy to the chosen backend)
//!     → 503 when nothing is selectable
//! ```
//!
//! # Design Decisions
//! - The backend set is fixed at construction; only health changes
//! - Strategies are stateless with respect to the set; they read health flags
//! - Unhealthy backends are skipped, never removed

use std::fmt;
use std::sync::Arc;

pub mod backend;
pub mod dispatcher;
pub mod round_robin;

pub use backend::{Backend, BackendError, HealthStatus};
pub use dispatcher::{DispatchError, Dispatcher};
pub use round_robin::RoundRobin;

/// Ordered, fixed-length backend sequence. Order matters for selection.
pub type BackendSet = Vec<Arc<Backend>>;

/// Picks the backend that serves the next request.
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Select a backend from `backends`, or `None` if none is usable.
    fn next_backend(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>>;
}
