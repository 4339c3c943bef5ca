//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse args → Load config → Apply overrides → Validate → Serve
//!
//! Shutdown:
//!     SIGINT / SIGTERM (signals.rs)
//!         → Shutdown::trigger (shutdown.rs)
//!         → serve loop stops accepting, drains in-flight requests, exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
