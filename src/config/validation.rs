//! Configuration validation.
//!
//! Semantic checks only; serde handles the syntax. Every problem is reported,
//! not just the first one.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::Config;
use crate::load_balancer::backend::{parse_backend_url, BackendError};

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("at least one backend is required")]
    NoBackends,
    #[error("backend #{index}: {source}")]
    Backend {
        index: usize,
        #[source]
        source: BackendError,
    },
    #[error("port must be non-zero")]
    ZeroPort,
    #[error("health_check.{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }
    for (index, raw) in config.backends.iter().enumerate() {
        if let Err(source) = parse_backend_url(raw) {
            errors.push(ValidationError::Backend { index, source });
        }
    }

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("interval_secs"));
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("timeout_secs"));
    }

    if let Some(raw) = &config.observability.metrics_address {
        if raw.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(raw.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
