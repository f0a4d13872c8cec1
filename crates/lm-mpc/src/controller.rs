//! Controller lifecycle and buffer ownership.
//!
//! ```text
//! Uninitialized --reset--> Ready --init--> Warm --run--> Running --run--> Running
//!        any state --reset--> Ready
//! ```

use crate::error::{MpcError, MpcResult};
use crate::lead_dynamics::estimate_tau;
use crate::trajectory::{Trajectory, extract};
use crate::validity::{CheckedTrajectory, Validity, check};
use lm_core::timing::TimingStats;
use lm_solver::{
    CostWeights, CurrentState, EgoState, LeadState, OptimizationEngine, ShootingSolver,
    SolutionBuffer, StepStats,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Lifecycle state of a [`LongitudinalMpc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    /// Constructed, no cost weights yet.
    Uninitialized,
    /// Weights configured, no feasible seed.
    Ready,
    /// Seeded, no solve since.
    Warm,
    /// At least one solve since the last seed.
    Running,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Uninitialized => "uninitialized",
            ControllerState::Ready => "ready",
            ControllerState::Warm => "warm",
            ControllerState::Running => "running",
        }
    }
}

/// Command to apply over the next control period (plan index 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// m/s
    pub velocity: f64,
    /// m/s^2
    pub acceleration: f64,
}

impl Command {
    pub fn is_finite(&self) -> bool {
        self.velocity.is_finite() && self.acceleration.is_finite()
    }
}

/// Command of one tick tagged with the validity of the plan it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    pub command: Command,
    pub validity: Validity,
}

/// Receding-horizon longitudinal controller driving one optimization engine.
///
/// Owns the current-state snapshot and the solution buffer; both are reused
/// across ticks. One instance per engine, one caller at a time.
#[derive(Debug)]
pub struct LongitudinalMpc<E: OptimizationEngine = ShootingSolver> {
    engine: E,
    state: ControllerState,
    weights: Option<CostWeights>,
    cur_state: CurrentState,
    solution: SolutionBuffer,
    last_tau: Option<f64>,
    last_stats: Option<StepStats>,
    solve_timing: TimingStats,
}

impl Default for LongitudinalMpc<ShootingSolver> {
    fn default() -> Self {
        Self::new(ShootingSolver::default())
    }
}

impl<E: OptimizationEngine> LongitudinalMpc<E> {
    /// Wrap `engine`; the controller starts `Uninitialized`.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: ControllerState::Uninitialized,
            weights: None,
            cur_state: CurrentState::default(),
            solution: SolutionBuffer::default(),
            last_tau: None,
            last_stats: None,
            solve_timing: TimingStats::new(),
        }
    }

    /// Configure cost weights and clear all optimization memory.
    ///
    /// Callable from any state; on success the controller is `Ready`. On error
    /// the previous state is kept.
    pub fn reset(&mut self, weights: CostWeights) -> MpcResult<()> {
        self.engine.init(weights)?;
        self.weights = Some(weights);
        self.cur_state = CurrentState::default();
        self.solution = SolutionBuffer::default();
        self.last_tau = None;
        self.last_stats = None;
        self.transition(ControllerState::Ready);
        Ok(())
    }

    /// Seed a feasible plan for a newly acquired lead.
    ///
    /// Must follow `reset`, and must be repeated whenever the scenario jumps
    /// (new lead, resume after disengagement).
    pub fn init(
        &mut self,
        v_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
    ) -> MpcResult<()> {
        if self.state == ControllerState::Uninitialized {
            return Err(MpcError::NotConfigured { what: "init" });
        }
        let tau = estimate_tau(a_lead, v_lead);
        self.engine
            .init_with_simulation(v_ego, x_lead, v_lead, a_lead, tau)?;
        self.cur_state.ego = EgoState {
            velocity: v_ego,
            acceleration: 0.0,
        };
        self.last_tau = Some(tau);
        debug!(v_ego, x_lead, v_lead, a_lead, tau, "seeded");
        self.transition(ControllerState::Warm);
        Ok(())
    }

    /// Same as [`init`](Self::init); named after the engine operation it drives.
    pub fn init_with_simulation(
        &mut self,
        v_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
    ) -> MpcResult<()> {
        self.init(v_ego, x_lead, v_lead, a_lead)
    }

    /// Advance the plan by one optimizer iteration and return the next command.
    ///
    /// The command is not checked: it may be non-finite when the optimizer
    /// failed. Use [`run_checked`](Self::run_checked) or check the trajectory
    /// before applying it.
    pub fn run(
        &mut self,
        v_ego: f64,
        a_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
    ) -> MpcResult<Command> {
        match self.state {
            ControllerState::Uninitialized => {
                return Err(MpcError::NotConfigured { what: "run" });
            }
            ControllerState::Ready => return Err(MpcError::NotSeeded),
            ControllerState::Warm | ControllerState::Running => {}
        }

        let tau = estimate_tau(a_lead, v_lead);
        self.cur_state.ego = EgoState {
            velocity: v_ego,
            acceleration: a_ego,
        };
        self.cur_state.lead = LeadState {
            distance: x_lead,
            velocity: v_lead,
            acceleration: a_lead,
        };

        let stats = self
            .solve_timing
            .measure(|| self.engine.solve_step(&self.cur_state, tau, &mut self.solution))?;

        self.last_tau = Some(tau);
        self.last_stats = Some(stats);
        if self.state == ControllerState::Warm {
            self.transition(ControllerState::Running);
        }

        let command = Command {
            velocity: self.solution.v_ego[1],
            acceleration: self.solution.a_ego[1],
        };
        debug!(
            tau,
            cost = stats.cost_after,
            v_cmd = command.velocity,
            a_cmd = command.acceleration,
            "tick"
        );
        Ok(command)
    }

    /// [`run`](Self::run) plus the validity of the resulting plan.
    pub fn run_checked(
        &mut self,
        v_ego: f64,
        a_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
    ) -> MpcResult<TickOutput> {
        let command = self.run(v_ego, a_ego, x_lead, v_lead, a_lead)?;
        let validity = check(&self.get_trajectory(0.0, 0.0));
        if let Validity::NonFinite { sequence, index } = validity {
            warn!(sequence = sequence.as_str(), index, "plan is not finite");
        }
        Ok(TickOutput { command, validity })
    }

    /// Most recent plan in the caller's frame.
    ///
    /// Pure read; before any solve this is the zeroed buffer.
    pub fn get_trajectory(&self, cur_t: f64, cur_x: f64) -> Trajectory {
        extract(&self.solution, cur_t, cur_x)
    }

    /// [`get_trajectory`](Self::get_trajectory) with its validity verdict.
    pub fn checked_trajectory(&self, cur_t: f64, cur_x: f64) -> CheckedTrajectory {
        CheckedTrajectory::new(self.get_trajectory(cur_t, cur_x))
    }

    /// Whether every sequence of the current plan is finite.
    pub fn is_trajectory_valid(&self) -> bool {
        check(&self.get_trajectory(0.0, 0.0)).is_valid()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Ego snapshot the engine solved from; zeroed by `reset`.
    pub fn ego_state(&self) -> EgoState {
        self.cur_state.ego
    }

    /// Cost weights from the last successful `reset`.
    pub fn weights(&self) -> Option<&CostWeights> {
        self.weights.as_ref()
    }

    /// Decay constant used by the last `init` or `run`.
    pub fn last_tau(&self) -> Option<f64> {
        self.last_tau
    }

    /// Statistics of the last solver iteration.
    pub fn last_stats(&self) -> Option<&StepStats> {
        self.last_stats.as_ref()
    }

    /// Wall time spent in the engine (recorded only with timing enabled).
    pub fn solve_timing(&self) -> &TimingStats {
        &self.solve_timing
    }

    /// Underlying optimization engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn transition(&mut self, next: ControllerState) {
        if self.state != next {
            info!(from = self.state.as_str(), to = next.as_str(), "controller state");
        }
        self.state = next;
    }
}
