//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, per-request dispatch)
//!     → request.rs (request ID, forwardable header set)
//!     → routing::RouteTable (what is this path?)
//!     → server.rs forward / redirect / fall through
//!     → response.rs (verbatim relay, hop-by-hop strip, CORS for API)
//!     → client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
