//! lm-core: stable foundation for longmpc.
//!
//! Contains:
//! - units (uom SI types + constructors + road-speed conversions)
//! - numeric (Real + finiteness helpers)
//! - timing (opt-in solve-time accounting)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LmError, LmResult};
pub use numeric::*;
pub use units::*;
