//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (monitor.rs)
//!     → Probe each backend in order (check.rs)
//!     → Build a new backend snapshot with fresh HealthStatus
//!     → Atomically publish it to the dispatcher
//! ```
//!
//! # Design Decisions
//! - A single failed probe marks a backend unhealthy for the tick; no debouncing
//! - Probes run one at a time; a slow backend delays the rest of its tick
//! - Probing happens outside any lock, so dispatch never waits on a tick

pub mod check;
pub mod monitor;

pub use check::{HealthCheck, HttpHealthCheck};
pub use monitor::HealthMonitor;
