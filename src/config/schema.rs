//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! proxy. All types derive Serde traits for deserialization from config
//! files, and every section has defaults so a minimal (or empty) config is
//! usable as-is.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The fixed upstream origin the app namespace is forwarded to.
    pub upstream: UpstreamConfig,

    /// Path prefixes that carve the app's namespace out of the shared domain.
    pub routing: RoutingConfig,

    /// Fallback origin for paths outside the app namespace.
    pub passthrough: PassthroughConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the citation backend: scheme + host (+ port), no path.
    /// Overridable with `--upstream-origin` / `EDGE_UPSTREAM_ORIGIN`.
    pub origin: String,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total request timeout (connect + response) in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "https://ann-arbor-parking.onrender.com".to_string(),
            connect_secs: 5,
            timeout_secs: 30,
        }
    }
}

/// Path-classification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Prefix identifying app pages on the shared domain (no trailing slash).
    /// `<app_prefix>/x` forwards upstream as `/x`; the bare prefix redirects
    /// to its trailing-slash form.
    pub app_prefix: String,

    /// Prefix forwarded upstream unchanged, with CORS added to the response.
    /// Must start and end with `/`.
    pub api_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app_prefix: "/a2-parking".to_string(),
            api_prefix: "/api/".to_string(),
        }
    }
}

/// Fallback-origin configuration for paths outside the app namespace.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PassthroughConfig {
    /// Origin unrelated requests are handed to verbatim (the static site).
    /// When unset, unrelated paths get a 404 instead.
    pub origin: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
