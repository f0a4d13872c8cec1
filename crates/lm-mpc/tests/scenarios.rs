//! Closed-loop scenarios at the 0.2 s control period.

use lm_mpc::{CostWeights, LongitudinalMpc, is_valid};

const DT: f64 = 0.2;

#[test]
fn stops_behind_stationary_car() {
    let lead_x = 200.0;
    let mut x_ego = 0.0;
    let mut v_ego = 20.0;
    let mut a_ego = 0.0;

    let mut mpc: LongitudinalMpc = LongitudinalMpc::default();
    mpc.reset(CostWeights::default()).unwrap();
    mpc.init_with_simulation(v_ego, lead_x - x_ego, 0.0, 0.0).unwrap();

    for tick in 0..150 {
        let cmd = mpc.run(v_ego, a_ego, lead_x - x_ego, 0.0, 0.0).unwrap();
        let traj = mpc.get_trajectory(tick as f64 * DT, x_ego);
        assert!(is_valid(&traj), "invalid plan at tick {tick}");
        assert!(
            cmd.velocity <= v_ego + 1e-6,
            "speed rose at tick {tick}: {} -> {}",
            v_ego,
            cmd.velocity
        );

        v_ego = cmd.velocity;
        a_ego = cmd.acceleration;
        x_ego += v_ego * DT;
    }

    let gap = lead_x - x_ego;
    assert!(v_ego < 0.1, "final speed {v_ego}");
    assert!(gap > 0.0 && gap < 10.0, "final gap {gap}");
}

fn lead_speed(t: f64) -> f64 {
    // 30 m/s until 3 s, linear to 0 at 6 s.
    if t <= 3.0 {
        30.0
    } else if t >= 6.0 {
        0.0
    } else {
        30.0 - 10.0 * (t - 3.0)
    }
}

fn lead_accel(t: f64) -> f64 {
    if (3.0..6.0).contains(&t) { -10.0 } else { 0.0 }
}

#[test]
fn follows_lead_through_emergency_stop() {
    let mut t = 0.0;
    let mut x_ego = 0.0;
    let mut v_ego = 30.0;
    let mut a_ego = 0.0;
    let mut x_lead = 100.0;

    let mut mpc: LongitudinalMpc = LongitudinalMpc::default();
    mpc.reset(CostWeights::default()).unwrap();
    mpc.init(v_ego, x_lead, lead_speed(0.0), lead_accel(0.0)).unwrap();

    let mut min_gap = f64::INFINITY;
    let mut first_brake = None;
    for _ in 0..90 {
        let out = mpc
            .run_checked(v_ego, a_ego, x_lead - x_ego, lead_speed(t), lead_accel(t))
            .unwrap();
        assert!(out.validity.is_valid(), "invalid plan at t = {t}");

        v_ego = out.command.velocity;
        a_ego = out.command.acceleration;
        if first_brake.is_none() && a_ego < -0.05 {
            first_brake = Some((t, x_lead - x_ego));
        }
        x_ego += v_ego * DT;
        t += DT;
        x_lead += (lead_speed(t - DT) + lead_speed(t)) / 2.0 * DT;
        min_gap = min_gap.min(x_lead - x_ego);
    }

    let (brake_t, brake_gap) = first_brake.unwrap();
    assert!(brake_t < 4.0, "first braking at {brake_t}");
    assert!(brake_gap > 50.0, "braking started at gap {brake_gap}");
    assert!(min_gap > 2.0, "min gap {min_gap}");
    assert!(v_ego < 0.5);
}
