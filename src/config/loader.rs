//! Configuration loading from disk or the process environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value {value:?} for {key}")]
    Env { key: &'static str, value: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub const ENV_PORT: &str = "PORT";
pub const ENV_BACKENDS: &str = "BACKENDS";
pub const ENV_HEALTH_INTERVAL: &str = "HEALTH_CHECK_INTERVAL_SECS";
pub const ENV_HEALTH_TIMEOUT: &str = "HEALTH_CHECK_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_METRICS_ADDRESS: &str = "METRICS_ADDRESS";

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<Config, ConfigError> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build a configuration from an arbitrary key lookup, falling back to
/// defaults for absent keys.
pub fn load_from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(port) = parse_var(&lookup, ENV_PORT)? {
        config.port = port;
    }
    if let Some(raw) = lookup(ENV_BACKENDS) {
        config.backends = raw.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(secs) = parse_var(&lookup, ENV_HEALTH_INTERVAL)? {
        config.health_check.interval_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, ENV_HEALTH_TIMEOUT)? {
        config.health_check.timeout_secs = secs;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
    if let Some(addr) = lookup(ENV_METRICS_ADDRESS).filter(|a| !a.is_empty()) {
        config.observability.metrics_address = Some(addr);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = load_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.backends,
            vec!["http://localhost:8081", "http://localhost:8082"]
        );
        assert_eq!(config.health_check.interval_secs, 10);
        assert_eq!(config.health_check.timeout_secs, 5);
        assert!(config.observability.metrics_address.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = load_from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("BACKENDS", "http://a:1, http://b:2 ,http://c:3"),
            ("HEALTH_CHECK_INTERVAL_SECS", "2"),
            ("METRICS_ADDRESS", "127.0.0.1:9090"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.backends, vec!["http://a:1", "http://b:2", "http://c:3"]);
        assert_eq!(config.health_check.interval_secs, 2);
        assert_eq!(config.listen_address(), "0.0.0.0:9000");
        assert_eq!(
            config.observability.metrics_address.as_deref(),
            Some("127.0.0.1:9090")
        );
    }

    #[test]
    fn test_non_numeric_port_is_an_error() {
        let err = load_from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "PORT", .. }));
    }

    #[test]
    fn test_malformed_backend_is_fatal() {
        let err = load_from_lookup(lookup_from(&[("BACKENDS", "http://ok:1,::not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
    }

    #[test]
    fn test_malformed_metrics_address_is_fatal() {
        let err = load_from_lookup(lookup_from(&[("METRICS_ADDRESS", "not-an-addr")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ref e)
                if matches!(e[..], [ValidationError::MetricsAddress(_)])
        ));
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            port = 7000
            backends = ["http://127.0.0.1:7001"]

            [health_check]
            interval_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.health_check.interval_secs, 3);
        assert_eq!(config.health_check.timeout_secs, 5);
        assert_eq!(config.observability.log_level, "info");
    }
}
