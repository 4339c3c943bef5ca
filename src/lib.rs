//! Edge proxy for the A2 parking citation map.
//!
//! Sits on a shared domain and carves out the citation app's namespace:
//! `/api/` requests are forwarded to the citation backend unchanged and come
//! back with CORS headers, `/a2-parking/` requests are forwarded with the
//! prefix stripped, the bare prefix is redirected to its canonical
//! trailing-slash form, and everything else falls through to the rest of the
//! site. Stateless across requests: no sessions, no retries, no caches.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
