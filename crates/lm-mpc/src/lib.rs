//! Receding-horizon longitudinal controller for following a lead vehicle.
//!
//! Every control tick the controller hands the latest ego and lead kinematics
//! to a warm-started optimizer, lets it advance one iteration over a 10 s
//! horizon, and returns the first actionable step of the plan.
//!
//! # Architecture
//!
//! - [`lead_dynamics`]: decay constant for the lead's current acceleration
//! - [`trajectory`]: re-anchors the raw horizon solution into the caller's frame
//! - [`validity`]: the numerical safety gate for a sampled plan
//! - [`controller`]: lifecycle (`reset` → `init` → `run`) and buffer ownership
//!
//! The optimizer itself sits behind [`lm_solver::OptimizationEngine`]; the
//! controller works with any implementation of it.
//!
//! # Calling discipline
//!
//! - `reset` at engagement, `init` on every new lead acquisition, then `run`
//!   once per tick.
//! - Check validity after every `run`. What to do with an invalid plan is the
//!   caller's decision.
//! - Read the trajectory before the next `run`; the solution buffer is reused.

pub mod controller;
pub mod error;
pub mod lead_dynamics;
pub mod trajectory;
pub mod validity;

pub use controller::{Command, ControllerState, LongitudinalMpc, TickOutput};
pub use error::{MpcError, MpcResult};
pub use lead_dynamics::{LEAD_ACCEL_TAU, estimate_tau};
pub use trajectory::{Trajectory, TrajectorySample, extract};
pub use validity::{CheckedTrajectory, Sequence, Validity, check, is_valid};

pub use lm_solver::{CostWeights, OptimizationEngine, ShootingConfig, ShootingSolver};
