//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI / environment overrides (upstream origin, bind address)
//!     → validation.rs (semantic checks, all errors reported)
//!     → EdgeConfig (validated, immutable)
//!     → shared with the server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal (or absent) configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::EdgeConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::PassthroughConfig;
pub use schema::RoutingConfig;
pub use schema::UpstreamConfig;
pub use validation::{validate_config, ValidationError};
