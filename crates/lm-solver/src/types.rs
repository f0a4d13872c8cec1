//! Data exchanged with the optimizer.

use crate::error::{SolverError, SolverResult};
use crate::horizon::{HORIZON_NODES, HORIZON_STEPS};
use lm_core::ensure_finite;
use serde::{Deserialize, Serialize};

/// Cost weights applied to the squared residual terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Time-to-collision term.
    pub ttc: f64,
    /// Distance-keeping term.
    pub distance: f64,
    /// Acceleration term.
    pub acceleration: f64,
    /// Jerk term.
    pub jerk: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            ttc: 5.0,
            distance: 0.1,
            acceleration: 10.0,
            jerk: 20.0,
        }
    }
}

impl CostWeights {
    pub fn new(ttc: f64, distance: f64, acceleration: f64, jerk: f64) -> SolverResult<Self> {
        let weights = Self {
            ttc,
            distance,
            acceleration,
            jerk,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> SolverResult<()> {
        let named = [
            ("ttc", self.ttc),
            ("distance", self.distance),
            ("acceleration", self.acceleration),
            ("jerk", self.jerk),
        ];
        for (name, w) in named {
            ensure_finite(w, name)?;
            if w < 0.0 {
                return Err(SolverError::InvalidArg {
                    what: format!("cost weight {name} must be non-negative, got {w}"),
                });
            }
        }
        Ok(())
    }
}

/// Ego kinematics. Persisted by the controller as the warm-start seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EgoState {
    /// m/s
    pub velocity: f64,
    /// m/s^2, negative = braking
    pub acceleration: f64,
}

/// Lead vehicle kinematics relative to the ego vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadState {
    /// Gap to the lead in meters, positive ahead.
    pub distance: f64,
    /// m/s
    pub velocity: f64,
    /// m/s^2
    pub acceleration: f64,
}

/// Kinematic snapshot handed to one solve step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentState {
    pub ego: EgoState,
    pub lead: LeadState,
}

/// Raw horizon solution, written in place by every solve step.
///
/// Ego positions are relative to the ego position at the start of the solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionBuffer {
    pub x_ego: [f64; HORIZON_NODES],
    pub v_ego: [f64; HORIZON_NODES],
    pub a_ego: [f64; HORIZON_NODES],
    pub x_lead: [f64; HORIZON_NODES],
    pub v_lead: [f64; HORIZON_NODES],
    /// Jerk applied over each interval.
    pub j_ego: [f64; HORIZON_STEPS],
    /// Total cost of the stored plan.
    pub cost: f64,
}

impl Default for SolutionBuffer {
    fn default() -> Self {
        Self {
            x_ego: [0.0; HORIZON_NODES],
            v_ego: [0.0; HORIZON_NODES],
            a_ego: [0.0; HORIZON_NODES],
            x_lead: [0.0; HORIZON_NODES],
            v_lead: [0.0; HORIZON_NODES],
            j_ego: [0.0; HORIZON_STEPS],
            cost: 0.0,
        }
    }
}

impl SolutionBuffer {
    /// Overwrite every entry with NaN; how a failed iteration reports itself.
    pub fn poison(&mut self) {
        self.x_ego.fill(f64::NAN);
        self.v_ego.fill(f64::NAN);
        self.a_ego.fill(f64::NAN);
        self.x_lead.fill(f64::NAN);
        self.v_lead.fill(f64::NAN);
        self.j_ego.fill(f64::NAN);
        self.cost = f64::NAN;
    }
}

/// Diagnostics of a single solve step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// Cost of the warm start before the iteration.
    pub cost_before: f64,
    /// Cost of the accepted plan.
    pub cost_after: f64,
    /// Accepted fraction of the Gauss-Newton step (0 = rejected).
    pub step_length: f64,
    /// Backtracking halvings performed.
    pub line_search_iters: usize,
}

impl StepStats {
    pub(crate) fn failed() -> Self {
        Self {
            cost_before: f64::NAN,
            cost_after: f64::NAN,
            step_length: 0.0,
            line_search_iters: 0,
        }
    }

    /// False when the iteration poisoned the buffer.
    pub fn is_finite(&self) -> bool {
        self.cost_after.is_finite()
    }
}
