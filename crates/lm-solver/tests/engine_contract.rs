//! Calling discipline of the engine, exercised through a trait object.

use lm_solver::{
    CostWeights, CurrentState, EgoState, LeadState, OptimizationEngine, SeedStrategy,
    ShootingConfig, ShootingSolver, SolutionBuffer, SolverError,
};

fn state(v_ego: f64, distance: f64) -> CurrentState {
    CurrentState {
        ego: EgoState {
            velocity: v_ego,
            acceleration: 0.0,
        },
        lead: LeadState {
            distance,
            velocity: 0.0,
            acceleration: 0.0,
        },
    }
}

fn boxed(seed: SeedStrategy) -> Box<dyn OptimizationEngine> {
    Box::new(ShootingSolver::new(ShootingConfig {
        seed,
        ..ShootingConfig::default()
    }))
}

#[test]
fn init_must_come_first() {
    let mut engine = boxed(SeedStrategy::default());
    let mut out = SolutionBuffer::default();
    assert!(matches!(
        engine.solve_step(&state(20.0, 100.0), 1.5, &mut out),
        Err(SolverError::NotInitialized { .. })
    ));
    assert!(matches!(
        engine.init_with_simulation(20.0, 100.0, 0.0, 0.0, 1.5),
        Err(SolverError::NotInitialized { .. })
    ));
}

#[test]
fn each_step_improves_or_keeps_cost() {
    for seed in [SeedStrategy::IntelligentDriver, SeedStrategy::ConstantSpeed] {
        let mut engine = boxed(seed);
        engine.init(CostWeights::default()).unwrap();
        engine.init_with_simulation(20.0, 100.0, 0.0, 0.0, 1.5).unwrap();

        let mut out = SolutionBuffer::default();
        for _ in 0..5 {
            let stats = engine.solve_step(&state(20.0, 100.0), 1.5, &mut out).unwrap();
            assert!(stats.cost_after <= stats.cost_before, "{seed:?}: {stats:?}");
            assert!(out.v_ego.iter().all(|v| v.is_finite() && *v >= 0.0));
        }
    }
}

#[test]
fn output_starts_at_current_state() {
    let mut engine = boxed(SeedStrategy::default());
    engine.init(CostWeights::default()).unwrap();
    engine.init_with_simulation(15.0, 80.0, 0.0, 0.0, 1.5).unwrap();

    let mut out = SolutionBuffer::default();
    let snapshot = CurrentState {
        ego: EgoState {
            velocity: 15.0,
            acceleration: -1.0,
        },
        lead: LeadState {
            distance: 80.0,
            velocity: 10.0,
            acceleration: 0.0,
        },
    };
    engine.solve_step(&snapshot, 1.5, &mut out).unwrap();
    assert_eq!(out.x_ego[0], 0.0);
    assert_eq!(out.v_ego[0], 15.0);
    assert_eq!(out.a_ego[0], -1.0);
    assert_eq!(out.x_lead[0], 80.0);
    assert_eq!(out.v_lead[0], 10.0);
}

#[test]
fn infeasible_input_is_silent() {
    let mut engine = boxed(SeedStrategy::default());
    engine.init(CostWeights::default()).unwrap();
    let mut out = SolutionBuffer::default();
    let stats = engine.solve_step(&state(20.0, f64::NAN), 1.5, &mut out);
    assert!(stats.is_ok());
    assert!(out.x_ego.iter().all(|x| x.is_nan()));
}
