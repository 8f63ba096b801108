//! Round-robin HTTP load balancer with background health checking.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────┐    ┌────────────┐    ┌───────────┐
//!     ───────────────────▶│  http    │───▶│ Dispatcher │───▶│ Forwarder │───▶ Backend
//!                         │  server  │    │ + Strategy │    └───────────┘
//!                         └──────────┘    └─────▲──────┘
//!                                               │ snapshot swap
//!                                        ┌──────┴───────┐
//!                                        │HealthMonitor │───▶ probe each backend
//!                                        └──────────────┘
//! ```

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::Config;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::{Dispatcher, RoundRobin, Strategy};
