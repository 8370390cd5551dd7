//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled route rules and their resolved targets
//! - Look up the target for a request path
//! - Return the matched target or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Rules are scanned in declaration order; first match wins
//! - Construction fails when a rule points at a target without a usable URL

use std::sync::Arc;

use axum::http::uri::{Authority, Scheme};
use axum::http::{HeaderValue, Uri};
use url::{Position, Url};

use crate::config::loader::ConfigError;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{parse_target_url, validate_config, ValidationError};
use crate::routing::matcher::{ExactPathMatcher, Matcher};

/// A downstream service the gateway forwards to.
#[derive(Debug)]
pub struct ServiceTarget {
    name: String,
    base_url: Url,
    authority: Authority,
    host_header: HeaderValue,
}

impl ServiceTarget {
    pub fn new(name: impl Into<String>, base_url: Url) -> Result<Self, ValidationError> {
        let name = name.into();
        let invalid = |reason: String| ValidationError::InvalidTargetUrl {
            name: name.clone(),
            url: base_url.to_string(),
            reason,
        };

        // "host[:port]" exactly as written in the URL
        let authority_str = &base_url[Position::BeforeHost..Position::AfterPort];
        let authority: Authority = authority_str.parse().map_err(|e| invalid(format!("{e}")))?;
        let host_header =
            HeaderValue::from_str(authority.as_str()).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            name,
            base_url,
            authority,
            host_header,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Value written to the `Host` header of forwarded requests.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// Build the upstream URI for an inbound path and query.
    ///
    /// A base URL path (e.g. `http://svc:3001/v1`) is prepended to the inbound path.
    pub fn upstream_uri(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        let base_path = self.base_url.path().trim_end_matches('/');
        let path_and_query = if path_and_query.starts_with('/') {
            format!("{base_path}{path_and_query}")
        } else {
            format!("{base_path}/{path_and_query}")
        };

        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// A compiled route rule.
#[derive(Debug)]
pub struct RouteRule {
    name: String,
    matcher: Box<dyn Matcher>,
    target: Arc<ServiceTarget>,
}

impl RouteRule {
    pub fn new(name: impl Into<String>, matcher: Box<dyn Matcher>, target: Arc<ServiceTarget>) -> Self {
        Self {
            name: name.into(),
            matcher,
            target,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &ServiceTarget {
        &self.target
    }
}

/// Ordered, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Compile a validated route table from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let mut targets = Vec::with_capacity(config.targets.len());
        for (name, raw) in &config.targets {
            let url = parse_target_url(name, raw).map_err(|e| ConfigError::Validation(vec![e]))?;
            let target = ServiceTarget::new(name.clone(), url)
                .map_err(|e| ConfigError::Validation(vec![e]))?;
            targets.push(Arc::new(target));
        }

        let mut rules = Vec::with_capacity(config.routes.len());
        for route in &config.routes {
            let target = targets
                .iter()
                .find(|t| t.name() == route.target)
                .cloned()
                .ok_or_else(|| {
                    ConfigError::Validation(vec![ValidationError::UnknownTarget {
                        route: route.name.clone(),
                        target: route.target.clone(),
                    }])
                })?;

            rules.push(RouteRule::new(
                route.name.clone(),
                Box::new(ExactPathMatcher::new(route.paths.iter().cloned())),
                target,
            ));
        }

        Ok(Self::new(rules))
    }

    /// Resolve the target for a request path. `None` means no rule owns the path.
    pub fn resolve(&self, path: &str) -> Option<&ServiceTarget> {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.target())
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}
