//! Native single-shooting implementation of [`OptimizationEngine`].

use crate::cost::{LongitudinalCost, rollout};
use crate::engine::OptimizationEngine;
use crate::error::{SolverError, SolverResult};
use crate::gauss_newton::{GaussNewtonConfig, gauss_newton_step};
use crate::horizon::{FINE_DT, HORIZON_STEPS, interval_at, node_time};
use crate::initialization::{IdmParams, SeedStrategy};
use crate::lead::predict_lead;
use crate::types::{CostWeights, CurrentState, SolutionBuffer, StepStats};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tuning of the shooting solver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShootingConfig {
    pub seed: SeedStrategy,
    pub idm: IdmParams,
    pub gauss_newton: GaussNewtonConfig,
}

/// Single shooting over the jerk profile, one Gauss-Newton iteration per call.
///
/// The warm-start memory is the jerk profile of the last accepted plan,
/// shifted forward by one fine interval so it lines up with the next tick.
#[derive(Debug, Clone)]
pub struct ShootingSolver {
    config: ShootingConfig,
    weights: Option<CostWeights>,
    jerks: DVector<f64>,
}

impl Default for ShootingSolver {
    fn default() -> Self {
        Self::new(ShootingConfig::default())
    }
}

impl ShootingSolver {
    pub fn new(config: ShootingConfig) -> Self {
        Self {
            config,
            weights: None,
            jerks: DVector::zeros(HORIZON_STEPS),
        }
    }

    pub fn config(&self) -> &ShootingConfig {
        &self.config
    }

    /// Configured weights, `None` before `init`.
    pub fn weights(&self) -> Option<&CostWeights> {
        self.weights.as_ref()
    }

    /// Jerk profile the next solve step starts from.
    pub fn warm_start(&self) -> &[f64] {
        self.jerks.as_slice()
    }

    fn require_weights(&self, what: &'static str) -> SolverResult<CostWeights> {
        self.weights
            .ok_or(SolverError::NotInitialized { what })
    }

    /// Advance the warm start by one fine interval.
    fn shifted(jerks: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(HORIZON_STEPS, |k, _| {
            jerks[interval_at(node_time(k) + FINE_DT)]
        })
    }
}

impl OptimizationEngine for ShootingSolver {
    fn init(&mut self, weights: CostWeights) -> SolverResult<()> {
        weights.validate()?;
        self.weights = Some(weights);
        self.jerks = DVector::zeros(HORIZON_STEPS);
        debug!(?weights, "shooting solver initialized");
        Ok(())
    }

    fn init_with_simulation(
        &mut self,
        v_ego: f64,
        x_lead: f64,
        v_lead: f64,
        a_lead: f64,
        tau: f64,
    ) -> SolverResult<()> {
        self.require_weights("init_with_simulation called before init")?;

        let lead = predict_lead(x_lead, v_lead, a_lead, tau);
        let seed = self
            .config
            .seed
            .seed_jerks(v_ego, &lead, &self.config.idm);
        self.jerks = DVector::from_row_slice(&seed);
        debug!(
            strategy = self.config.seed.as_str(),
            v_ego, x_lead, v_lead, a_lead, tau, "seeded warm start"
        );
        Ok(())
    }

    fn solve_step(
        &mut self,
        state: &CurrentState,
        tau: f64,
        out: &mut SolutionBuffer,
    ) -> SolverResult<StepStats> {
        let weights = self.require_weights("solve_step called before init")?;

        let ego = state.ego;
        let lead = predict_lead(
            state.lead.distance,
            state.lead.velocity,
            state.lead.acceleration,
            tau,
        );
        let cost = LongitudinalCost::new(&weights, &lead, ego.velocity, ego.acceleration);

        let step = match gauss_newton_step(
            &self.jerks,
            |j| cost.residuals(j),
            &self.config.gauss_newton,
        ) {
            Ok(step) => step,
            Err(e) => {
                warn!(error = %e, "solve step failed, poisoning solution");
                out.poison();
                self.jerks.fill(f64::NAN);
                return Ok(StepStats::failed());
            }
        };

        let plan = rollout(ego.velocity, ego.acceleration, step.x.as_slice());
        out.x_ego = plan.x;
        out.v_ego = plan.v;
        out.a_ego = plan.a;
        out.x_lead = lead.x;
        out.v_lead = lead.v;
        out.j_ego.copy_from_slice(step.x.as_slice());
        out.cost = step.cost_after;

        self.jerks = Self::shifted(&step.x);

        let stats = StepStats {
            cost_before: step.cost_before,
            cost_after: step.cost_after,
            step_length: step.step_length,
            line_search_iters: step.line_search_iters,
        };
        debug!(
            cost_before = stats.cost_before,
            cost_after = stats.cost_after,
            step_length = stats.step_length,
            "solve step"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EgoState, LeadState};

    fn snapshot(v_ego: f64, a_ego: f64, distance: f64, v_lead: f64) -> CurrentState {
        CurrentState {
            ego: EgoState {
                velocity: v_ego,
                acceleration: a_ego,
            },
            lead: LeadState {
                distance,
                velocity: v_lead,
                acceleration: 0.0,
            },
        }
    }

    #[test]
    fn solve_before_init_is_rejected() {
        let mut solver = ShootingSolver::default();
        let mut out = SolutionBuffer::default();
        let err = solver
            .solve_step(&snapshot(20.0, 0.0, 100.0, 0.0), 1.5, &mut out)
            .unwrap_err();
        assert!(matches!(err, SolverError::NotInitialized { .. }));
        assert!(solver.init_with_simulation(20.0, 100.0, 0.0, 0.0, 1.5).is_err());
    }

    #[test]
    fn init_rejects_bad_weights() {
        let mut solver = ShootingSolver::default();
        let weights = CostWeights {
            ttc: -1.0,
            ..CostWeights::default()
        };
        assert!(solver.init(weights).is_err());
        assert!(solver.weights().is_none());
    }

    #[test]
    fn init_clears_warm_start() {
        let mut solver = ShootingSolver::default();
        solver.init(CostWeights::default()).unwrap();
        solver.init_with_simulation(20.0, 60.0, 0.0, 0.0, 1.5).unwrap();
        assert!(solver.warm_start().iter().any(|j| *j != 0.0));

        solver.init(CostWeights::default()).unwrap();
        assert!(solver.warm_start().iter().all(|j| *j == 0.0));
    }

    #[test]
    fn step_brakes_for_stopped_car() {
        let mut solver = ShootingSolver::default();
        solver.init(CostWeights::default()).unwrap();
        solver.init_with_simulation(20.0, 100.0, 0.0, 0.0, 1.5).unwrap();

        let mut out = SolutionBuffer::default();
        let stats = solver
            .solve_step(&snapshot(20.0, 0.0, 100.0, 0.0), 1.5, &mut out)
            .unwrap();

        assert!(stats.is_finite());
        assert!(stats.cost_after <= stats.cost_before);
        assert_eq!(out.x_ego[0], 0.0);
        assert_eq!(out.v_ego[0], 20.0);
        assert_eq!(out.x_lead[0], 100.0);
        assert!(out.a_ego[1] < 0.0);
        assert!(out.v_ego[20] < 20.0);
    }

    #[test]
    fn warm_start_is_shifted_plan() {
        let mut solver = ShootingSolver::default();
        solver.init(CostWeights::default()).unwrap();
        solver.init_with_simulation(20.0, 100.0, 0.0, 0.0, 1.5).unwrap();

        let mut out = SolutionBuffer::default();
        solver
            .solve_step(&snapshot(20.0, 0.0, 100.0, 0.0), 1.5, &mut out)
            .unwrap();

        let warm = solver.warm_start();
        assert_eq!(warm[0], out.j_ego[1]);
        assert_eq!(warm[3], out.j_ego[4]);
        assert_eq!(warm[4], out.j_ego[5]);
        assert_eq!(warm[5], out.j_ego[5]);
        assert_eq!(warm[19], out.j_ego[19]);
    }

    #[test]
    fn non_finite_input_poisons_buffer() {
        let mut solver = ShootingSolver::default();
        solver.init(CostWeights::default()).unwrap();

        let mut out = SolutionBuffer::default();
        let stats = solver
            .solve_step(&snapshot(20.0, 0.0, f64::NAN, 0.0), 1.5, &mut out)
            .unwrap();

        assert!(!stats.is_finite());
        assert!(out.v_ego.iter().all(|v| v.is_nan()));
        assert!(solver.warm_start().iter().all(|j| j.is_nan()));

        // Stays poisoned until re-seeded.
        solver
            .solve_step(&snapshot(20.0, 0.0, 100.0, 0.0), 1.5, &mut out)
            .unwrap();
        assert!(out.a_ego.iter().all(|a| a.is_nan()));

        solver.init(CostWeights::default()).unwrap();
        solver
            .solve_step(&snapshot(20.0, 0.0, 100.0, 0.0), 1.5, &mut out)
            .unwrap();
        assert!(out.a_ego.iter().all(|a| a.is_finite()));
    }
}
