//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference configured targets)
//! - Reject absent or unusable target URLs so the gateway never binds half-configured
//! - Detect paths claimed by more than one route
//!
//! Returns all validation errors, not just the first.

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use crate::config::schema::{GatewayConfig, ServiceConfig};
use crate::store::MEMORY_SCHEME;

/// Paths served by the gateway itself; routes may not claim them.
pub const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target `{0}` has no URL configured")]
    MissingTargetUrl(String),

    #[error("target `{name}` has invalid URL `{url}`: {reason}")]
    InvalidTargetUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("route `{route}` references unknown target `{target}`")]
    UnknownTarget { route: String, target: String },

    #[error("route `{0}` has no paths")]
    EmptyRoute(String),

    #[error("path `{path}` in route `{route}` must start with '/'")]
    InvalidPath { route: String, path: String },

    #[error("path `{path}` in route `{route}` is served by the gateway itself")]
    ReservedPath { route: String, path: String },

    #[error("path `{path}` is claimed by both `{first}` and `{second}`")]
    OverlappingPath {
        path: String,
        first: String,
        second: String,
    },

    #[error("upstream timeout must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("invalid database URI `{uri}`: {reason}")]
    InvalidDatabaseUri { uri: String, reason: String },
}

/// Validate a gateway configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, url) in &config.targets {
        if let Err(e) = parse_target_url(name, url) {
            errors.push(e);
        }
    }

    let mut owners: HashMap<&str, &str> = HashMap::new();
    for route in &config.routes {
        if !config.targets.contains_key(&route.target) {
            errors.push(ValidationError::UnknownTarget {
                route: route.name.clone(),
                target: route.target.clone(),
            });
        }

        if route.paths.is_empty() {
            errors.push(ValidationError::EmptyRoute(route.name.clone()));
        }

        for path in &route.paths {
            if !path.starts_with('/') {
                errors.push(ValidationError::InvalidPath {
                    route: route.name.clone(),
                    path: path.clone(),
                });
            } else if RESERVED_PATHS.contains(&path.as_str()) {
                errors.push(ValidationError::ReservedPath {
                    route: route.name.clone(),
                    path: path.clone(),
                });
            }

            if let Some(first) = owners.insert(path.as_str(), route.name.as_str()) {
                if first != route.name {
                    errors.push(ValidationError::OverlappingPath {
                        path: path.clone(),
                        first: first.to_string(),
                        second: route.name.clone(),
                    });
                }
            }
        }
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a downstream service configuration.
pub fn validate_service_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    parse_database_uri(&config.database_uri)
        .map(|_| ())
        .map_err(|e| vec![e])
}

/// Parse a target base URL. Only plain `http` targets are accepted.
pub fn parse_target_url(name: &str, raw: &str) -> Result<Url, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingTargetUrl(name.to_string()));
    }

    let invalid = |reason: String| ValidationError::InvalidTargetUrl {
        name: name.to_string(),
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(url)
}

/// Parse the persistence service connection string.
pub fn parse_database_uri(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidDatabaseUri {
        uri: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() == MEMORY_SCHEME {
        return Ok(url);
    }
    if !url.scheme().starts_with("mongodb") {
        return Err(invalid("scheme must be mongodb, mongodb+srv or memory"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}
