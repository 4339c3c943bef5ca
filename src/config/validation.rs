//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check origin URLs are usable as forwarding bases
//! - Check prefix shapes and detect shadowed prefixes
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs once at startup, after CLI/env overrides are applied

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::EdgeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Listener bind address does not parse as a socket address.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// An origin is not usable as a forwarding base.
    #[error("invalid {field} origin '{value}': {reason}")]
    InvalidOrigin {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// App prefix has the wrong shape.
    #[error("app prefix '{0}' must start with '/' and carry no trailing slash")]
    InvalidAppPrefix(String),

    /// API prefix has the wrong shape.
    #[error("api prefix '{0}' must start and end with '/'")]
    InvalidApiPrefix(String),

    /// App prefix lives inside the API namespace and can never match.
    #[error("app prefix '{app}' is shadowed by api prefix '{api}'")]
    ShadowedAppPrefix { app: String, api: String },

    /// A timeout is configured as zero.
    #[error("upstream {0} timeout must be non-zero")]
    ZeroTimeout(&'static str),

    /// Metrics listener address does not parse as a socket address.
    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    check_origin("upstream", &config.upstream.origin, &mut errors);
    if let Some(origin) = &config.passthrough.origin {
        check_origin("passthrough", origin, &mut errors);
    }

    let app = &config.routing.app_prefix;
    if !app.starts_with('/') || app.len() < 2 || app.ends_with('/') {
        errors.push(ValidationError::InvalidAppPrefix(app.clone()));
    }

    let api = &config.routing.api_prefix;
    if !api.starts_with('/') || api.len() < 2 || !api.ends_with('/') {
        errors.push(ValidationError::InvalidApiPrefix(api.clone()));
    }

    // Classification checks the API prefix first; an app prefix inside that
    // namespace would never be reached.
    if api.len() >= 2 && app.starts_with(api.as_str()) {
        errors.push(ValidationError::ShadowedAppPrefix {
            app: app.clone(),
            api: api.clone(),
        });
    }

    if config.upstream.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that an origin string is an absolute http(s) URL with a host and
/// nothing after it, the only shape `upstream_url` can splice paths onto.
fn check_origin(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let url = match Url::parse(value) {
        Ok(url) => url,
        Err(_) => {
            errors.push(ValidationError::InvalidOrigin {
                field,
                value: value.to_string(),
                reason: "not an absolute URL",
            });
            return;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        errors.push(ValidationError::InvalidOrigin {
            field,
            value: value.to_string(),
            reason: "scheme must be http or https",
        });
        return;
    }

    if url.host_str().is_none() {
        errors.push(ValidationError::InvalidOrigin {
            field,
            value: value.to_string(),
            reason: "missing host",
        });
        return;
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::InvalidOrigin {
            field,
            value: value.to_string(),
            reason: "must not carry a path, query, or fragment",
        });
    }
}
