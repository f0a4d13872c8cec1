//! Calling contract of the receding-horizon optimizer.

use crate::error::SolverResult;
use crate::types::{CostWeights, CurrentState, SolutionBuffer, StepStats};

/// A warm-started trajectory optimizer advanced one iteration per tick.
///
/// Implementations must:
/// - reject `init_with_simulation` and `solve_step` until `init` has run
///   (`SolverError::NotInitialized`);
/// - perform exactly one optimization iteration per `solve_step`, starting from
///   their own retained warm-start memory, and advance that memory afterwards;
/// - report numerical failure by writing non-finite values into the buffer,
///   never by returning an error.
pub trait OptimizationEngine {
    /// Reset internal optimization state and warm-start memory.
    fn init(&mut self, weights: CostWeights) -> SolverResult<()>;

    /// Seed the warm-start memory with a physically feasible trajectory
    /// obtained by forward simulation of the given snapshot.
    fn init_with_simulation(
        &mut self,
        v_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
        tau: f64,
    ) -> SolverResult<()>;

    /// One optimization iteration; writes the full horizon into `out`.
    fn solve_step(
        &mut self,
        state: &CurrentState,
        tau: f64,
        out: &mut SolutionBuffer,
    ) -> SolverResult<StepStats>;
}

impl<E: OptimizationEngine + ?Sized> OptimizationEngine for Box<E> {
    fn init(&mut self, weights: CostWeights) -> SolverResult<()> {
        (**self).init(weights)
    }

    fn init_with_simulation(
        &mut self,
        v_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
        tau: f64,
    ) -> SolverResult<()> {
        (**self).init_with_simulation(v_ego, x_lead, v_lead, a_lead, tau)
    }

    fn solve_step(
        &mut self,
        state: &CurrentState,
        tau: f64,
        out: &mut SolutionBuffer,
    ) -> SolverResult<StepStats> {
        (**self).solve_step(state, tau, out)
    }
}
