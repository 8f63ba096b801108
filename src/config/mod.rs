//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables or TOML file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → consumed once at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Any validation failure is fatal at startup
//! - No reload: backends are fixed for the process lifetime

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{Config, HealthCheckConfig, ObservabilityConfig};
