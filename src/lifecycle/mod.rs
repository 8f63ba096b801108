//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build dispatcher (starts health loop) → Bind listener
//!
//! Shutdown:
//!     signals.rs (SIGINT/SIGTERM)
//!     → shutdown.rs broadcast
//!     → HTTP server stops accepting and drains
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - In-flight probes and forwarded requests are never cancelled

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
