//! Receding-horizon longitudinal optimizer.
//!
//! This crate defines the calling contract of the optimization engine used by
//! the longitudinal controller ([`OptimizationEngine`]) and ships a native
//! implementation of it ([`ShootingSolver`]): single shooting over a piecewise
//! constant jerk profile on a fixed, non-uniform 21-node time grid, advanced by
//! exactly one damped Gauss-Newton iteration per control tick.

pub mod cost;
pub mod engine;
pub mod error;
pub mod gauss_newton;
pub mod horizon;
pub mod initialization;
pub mod jacobian;
pub mod lead;
pub mod shooting;
pub mod types;

pub use engine::OptimizationEngine;
pub use error::{SolverError, SolverResult};
pub use gauss_newton::{GaussNewtonConfig, GaussNewtonStep};
pub use horizon::{HORIZON_NODES, HORIZON_STEPS};
pub use initialization::{IdmParams, SeedStrategy};
pub use lead::LeadPrediction;
pub use shooting::{ShootingConfig, ShootingSolver};
pub use types::{CostWeights, CurrentState, EgoState, LeadState, SolutionBuffer, StepStats};
