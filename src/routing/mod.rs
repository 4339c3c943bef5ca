//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → decision.rs (classify against the prefix table)
//!     → Return: ApiPassthrough | RedirectToSlash | AppPrefixed | Unrelated
//!
//! Table compilation (at startup):
//!     RoutingConfig
//!     → validated prefixes
//!     → frozen as an immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - The table is compiled at startup and immutable at runtime
//! - Deterministic: the same path always gets the same decision
//! - First match wins, in fixed priority order (API before app pages)

pub mod decision;

pub use decision::{normalize_origin, upstream_url, RouteDecision, RouteTable};
