//! Configuration loading from disk and the process environment.
//!
//! File values come first, then environment variables override them. An
//! unset variable keeps the current value; a target URL variable that is set
//! but blank clears the target so validation refuses to start.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, ServiceConfig, AUTH_TARGET, BOOKING_TARGET};
use crate::config::validation::{
    validate_config, validate_service_config, ValidationError,
};

pub const ENV_PORT: &str = "PORT";
pub const ENV_DATABASE_URI: &str = "MONGODB_URI";
pub const ENV_AUTH_SERVICE_URL: &str = "AUTH_SERVICE_URL";
pub const ENV_BOOKING_SERVICE_URL: &str = "BOOKING_SERVICE_URL";
pub const ENV_UPSTREAM_TIMEOUT_SECS: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_SEED_ADMIN: &str = "SEED_ADMIN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value `{value}` for {key}: {reason}")]
    Env {
        key: &'static str,
        value: String,
        reason: String,
    },

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

/// Parse gateway configuration from a TOML file, without validating it.
pub fn read_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Build the gateway configuration from an optional file plus the process environment.
pub fn load_gateway_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };
    apply_gateway_env(&mut config, |key| std::env::var(key).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build a downstream service configuration from the process environment.
pub fn load_service_config(defaults: ServiceConfig) -> Result<ServiceConfig, ConfigError> {
    let mut config = defaults;
    apply_service_env(&mut config, |key| std::env::var(key).ok())?;

    validate_service_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply gateway environment overrides using `lookup` to read variables.
pub fn apply_gateway_env<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parse_var(&lookup, ENV_PORT)? {
        config.listener.port = port;
    }
    if let Some(secs) = parse_var(&lookup, ENV_UPSTREAM_TIMEOUT_SECS)? {
        config.timeouts.upstream_secs = secs;
    }

    for (key, target) in [
        (ENV_AUTH_SERVICE_URL, AUTH_TARGET),
        (ENV_BOOKING_SERVICE_URL, BOOKING_TARGET),
    ] {
        if let Some(url) = lookup(key) {
            config.targets.insert(target.to_string(), url.trim().to_string());
        }
    }
    Ok(())
}

/// Apply service environment overrides using `lookup` to read variables.
pub fn apply_service_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parse_var(&lookup, ENV_PORT)? {
        config.listener.port = port;
    }
    if let Some(uri) = non_blank(&lookup, ENV_DATABASE_URI) {
        config.database_uri = uri;
    }
    if let Some(seed) = parse_var(&lookup, ENV_SEED_ADMIN)? {
        config.seed_admin = seed;
    }
    Ok(())
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(lookup, key) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e: T::Err| ConfigError::Env {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_unset_variables_keep_defaults() {
        let mut config = GatewayConfig::default();
        apply_gateway_env(&mut config, env(&[])).unwrap();

        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.targets[AUTH_TARGET], "http://auth-service:3001");
        assert_eq!(config.targets[BOOKING_TARGET], "http://booking-service:3002");
    }

    #[test]
    fn test_env_overrides_targets_and_port() {
        let mut config = GatewayConfig::default();
        apply_gateway_env(
            &mut config,
            env(&[
                ("PORT", "8080"),
                ("AUTH_SERVICE_URL", "http://127.0.0.1:4001"),
                ("BOOKING_SERVICE_URL", " http://127.0.0.1:4002 "),
                ("UPSTREAM_TIMEOUT_SECS", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.targets[AUTH_TARGET], "http://127.0.0.1:4001");
        assert_eq!(config.targets[BOOKING_TARGET], "http://127.0.0.1:4002");
        assert_eq!(config.timeouts.upstream_secs, 3);
    }

    #[test]
    fn test_blank_target_fails_validation() {
        let mut config = GatewayConfig::default();
        apply_gateway_env(&mut config, env(&[("AUTH_SERVICE_URL", "")])).unwrap();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingTargetUrl("auth".into())]);
    }

    #[test]
    fn test_bad_port_is_reported() {
        let mut config = GatewayConfig::default();
        let err = apply_gateway_env(&mut config, env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "PORT", .. }));
    }

    #[test]
    fn test_service_env() {
        let mut config = ServiceConfig::booking();
        apply_service_env(
            &mut config,
            env(&[("MONGODB_URI", "mongodb://db:27017/test"), ("SEED_ADMIN", "false")]),
        )
        .unwrap();

        assert_eq!(config.listener.port, 3002);
        assert_eq!(config.database_uri, "mongodb://db:27017/test");
        assert!(!config.seed_admin);
    }

    #[test]
    fn test_read_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
name = "Edge"

[listener]
port = 9000

[targets]
auth = "http://10.0.0.1:3001"
booking = "http://10.0.0.2:3002"

[[routes]]
name = "auth"
paths = ["/api/login"]
target = "auth"
"#
        )
        .unwrap();

        let config = read_config(file.path()).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.name, "Edge");
        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.timeouts.upstream_secs, 30);
    }

    #[test]
    fn test_file_with_unknown_target_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[targets]
auth = "http://10.0.0.1:3001"

[[routes]]
name = "booking"
paths = ["/api/bookings"]
target = "booking"
"#
        )
        .unwrap();

        let errors = validate_config(&read_config(file.path()).unwrap()).unwrap_err();
        let err = ConfigError::Validation(errors);
        assert!(err.to_string().contains("unknown target `booking`"), "{err}");
    }
}
