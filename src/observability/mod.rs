//! Observability subsystem.
//!
//! Structured logs come from `tracing` spans and events emitted where the
//! work happens; the subscriber is configured at startup in `main`. This
//! module owns what is left: the Prometheus metrics surface.

pub mod metrics;
