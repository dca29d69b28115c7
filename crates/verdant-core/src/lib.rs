//! Shared domain types for the Verdant sensor-collection daemon.
//!
//! This crate holds the types that cross worker boundaries: the
//! [`Observation`] record produced once per collection cycle by the
//! collector and consumed exactly once by the persistence writer, plus the
//! default tuning constants both sides agree on.

pub mod constants;
pub mod types;

pub use types::Observation;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
