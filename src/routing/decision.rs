//! Path classification and upstream URL assembly.
//!
//! The decision table, with the default prefixes:
//!
//! ```text
//! | Inbound path        | Decision        | Upstream path |
//! |---------------------|-----------------|---------------|
//! | /api/<rest>         | ApiPassthrough  | /api/<rest>   |
//! | /a2-parking (exact) | RedirectToSlash | none (301)    |
//! | /a2-parking/<rest>  | AppPrefixed     | /<rest>       |
//! | anything else       | Unrelated       | none          |
//! ```
//!
//! # Design Decisions
//! - Prefixes are compiled into an immutable table at startup
//! - Evaluation order is fixed: API prefix, exact app prefix, app pages
//! - Matching is boundary-aware: `/a2-parkingfoo` is unrelated, it never
//!   splices a malformed upstream URL
//! - No regex; plain prefix tests keep classification O(path length)

use crate::config::RoutingConfig;

/// Classification of one inbound path.
///
/// Computed exactly once per request and never re-evaluated mid-flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision<'p> {
    /// API traffic: forwarded with the path unchanged, CORS headers added to
    /// the relayed response.
    ApiPassthrough { upstream_path: &'p str },

    /// The bare app prefix: 301 to the trailing-slash form, query preserved.
    RedirectToSlash,

    /// An app page: forwarded with the prefix stripped.
    AppPrefixed { upstream_path: &'p str },

    /// Outside the app namespace: handed to the passthrough origin (or 404),
    /// never to the fixed upstream.
    Unrelated,
}

/// The immutable prefix table inbound paths are classified against.
#[derive(Debug, Clone)]
pub struct RouteTable {
    app_prefix: String,
    api_prefix: String,
}

impl RouteTable {
    /// Build the table from validated configuration.
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            app_prefix: config.app_prefix.clone(),
            api_prefix: config.api_prefix.clone(),
        }
    }

    /// The app prefix, as configured (no trailing slash).
    pub fn app_prefix(&self) -> &str {
        &self.app_prefix
    }

    /// Classify a path. First match wins, in fixed priority order.
    ///
    /// A stripped app path always starts with `/`: the bare prefix is caught
    /// by the redirect arm, and non-boundary lookalikes fall through to
    /// [`RouteDecision::Unrelated`].
    pub fn decide<'p>(&self, path: &'p str) -> RouteDecision<'p> {
        if path.starts_with(self.api_prefix.as_str()) {
            return RouteDecision::ApiPassthrough {
                upstream_path: path,
            };
        }

        if path == self.app_prefix {
            return RouteDecision::RedirectToSlash;
        }

        if let Some(rest) = path.strip_prefix(self.app_prefix.as_str()) {
            if rest.starts_with('/') {
                return RouteDecision::AppPrefixed {
                    upstream_path: rest,
                };
            }
        }

        RouteDecision::Unrelated
    }
}

/// Strip the trailing slash an origin URL may carry so [`upstream_url`] can
/// splice rewritten paths onto it directly.
pub fn normalize_origin(origin: &str) -> &str {
    origin.trim_end_matches('/')
}

/// Assemble the outbound URL: origin + rewritten path + original query.
pub fn upstream_url(origin: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{}{}?{}", origin, path, q),
        None => format!("{}{}", origin, path),
    }
}
