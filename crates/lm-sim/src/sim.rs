//! Closed-loop maneuver runner.

use crate::error::{SimError, SimResult};
use crate::maneuver::Maneuver;
use crate::profile::LeadProfile;
use crate::record::{ManeuverRecord, ManeuverSample, ManeuverSummary, StopReport};
use lm_mpc::{CostWeights, LongitudinalMpc, OptimizationEngine, Validity};
use tracing::{debug, info, warn};

/// Commanded deceleration that counts as braking (m/s^2).
const BRAKE_THRESHOLD: f64 = 0.05;

/// Options for maneuver runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Control period (seconds)
    pub dt: f64,
    /// Maximum number of ticks (safety limit)
    pub max_steps: usize,
    /// Record every N-th tick (decimation)
    pub record_every: usize,
    /// Deceleration applied when a plan fails validation (m/s^2, positive)
    pub fallback_decel: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 0.2,
            max_steps: 10_000,
            record_every: 1,
            fallback_decel: 5.0,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        if !(self.fallback_decel.is_finite() && self.fallback_decel > 0.0) {
            return Err(SimError::InvalidArg {
                what: "fallback_decel must be positive",
            });
        }
        Ok(())
    }
}

/// Run a maneuver with a fresh controller on the native shooting engine.
pub fn run_maneuver(
    maneuver: &Maneuver,
    weights: CostWeights,
    opts: &SimOptions,
) -> SimResult<ManeuverRecord> {
    let mut mpc: LongitudinalMpc = LongitudinalMpc::default();
    run_maneuver_with(&mut mpc, maneuver, weights, opts)
}

/// Run a maneuver with the given controller.
///
/// The controller is reset and seeded at the start. A tick whose plan fails
/// validation applies `opts.fallback_decel` instead of the command, and the
/// controller is reset and re-seeded before the next tick.
pub fn run_maneuver_with<E: OptimizationEngine>(
    mpc: &mut LongitudinalMpc<E>,
    maneuver: &Maneuver,
    weights: CostWeights,
    opts: &SimOptions,
) -> SimResult<ManeuverRecord> {
    maneuver.validate()?;
    opts.validate()?;

    let dt = opts.dt;
    let steps = ((maneuver.duration / dt).round() as usize).min(opts.max_steps);
    let lead = &maneuver.lead;

    let mut t = 0.0;
    let mut x_ego = 0.0;
    let mut v_ego = maneuver.initial_speed;
    let mut a_ego = 0.0;
    let mut x_lead = maneuver.initial_distance_lead;
    let mut v_lead = lead.speed_at(t);
    let mut a_lead = lead.accel_at(t);

    mpc.reset(weights)?;
    mpc.init(v_ego, x_lead - x_ego, v_lead, a_lead)?;
    info!(title = %maneuver.title, steps, "maneuver start");

    let mut samples = Vec::with_capacity(steps / opts.record_every + 1);
    let mut summary = ManeuverSummary {
        ticks: steps,
        min_gap: f64::INFINITY,
        final_gap: x_lead - x_ego,
        final_speed: v_ego,
        min_accel: 0.0,
        first_brake_time: None,
        collided: false,
        invalid_ticks: 0,
    };
    let mut reseed = false;

    for step in 0..steps {
        if reseed {
            mpc.reset(weights)?;
            mpc.init(v_ego, x_lead - x_ego, v_lead, a_lead)?;
            reseed = false;
        }

        let out = mpc.run_checked(v_ego, a_ego, x_lead - x_ego, v_lead, a_lead)?;
        let valid = out.validity.is_valid();
        if valid {
            v_ego = out.command.velocity;
            a_ego = out.command.acceleration;
        } else {
            if let Validity::NonFinite { sequence, index } = out.validity {
                warn!(t, sequence = sequence.as_str(), index, "invalid plan, emergency braking");
            }
            summary.invalid_ticks += 1;
            v_ego = (v_ego - opts.fallback_decel * dt).max(0.0);
            a_ego = if v_ego > 0.0 { -opts.fallback_decel } else { 0.0 };
            reseed = true;
        }

        if summary.first_brake_time.is_none() && a_ego < -BRAKE_THRESHOLD {
            summary.first_brake_time = Some(t);
        }
        summary.min_accel = summary.min_accel.min(a_ego);

        x_ego += v_ego * dt;
        t += dt;
        let v_lead_next = lead.speed_at(t);
        x_lead += (v_lead + v_lead_next) / 2.0 * dt;
        v_lead = v_lead_next;
        a_lead = lead.accel_at(t);

        let gap = x_lead - x_ego;
        summary.min_gap = summary.min_gap.min(gap);
        summary.collided |= gap <= 0.0;

        if (step + 1) % opts.record_every == 0 || step + 1 == steps {
            samples.push(ManeuverSample {
                t,
                x_ego,
                v_ego,
                a_ego,
                x_lead,
                v_lead,
                a_lead,
                gap,
                valid,
            });
        }
    }

    summary.final_gap = x_lead - x_ego;
    summary.final_speed = v_ego;

    let timing = mpc.solve_timing();
    if timing.count() > 0 {
        debug!(
            solves = timing.count(),
            avg_s = timing.average_seconds(),
            max_s = timing.max_seconds(),
            "solve timing"
        );
    }
    info!(
        title = %maneuver.title,
        min_gap = summary.min_gap,
        final_speed = summary.final_speed,
        invalid_ticks = summary.invalid_ticks,
        "maneuver done"
    );

    Ok(ManeuverRecord {
        title: maneuver.title.clone(),
        samples,
        summary,
    })
}

/// Ego approaching a stopped car, `steps` ticks of 0.2 s.
pub fn reference_stop(
    v_ego: f64,
    x_lead: f64,
    steps: usize,
    weights: CostWeights,
) -> SimResult<StopReport> {
    if steps == 0 {
        return Err(SimError::InvalidArg {
            what: "steps must be positive",
        });
    }
    let opts = SimOptions {
        record_every: steps,
        ..SimOptions::default()
    };
    let maneuver = Maneuver {
        title: "reference stop".to_string(),
        duration: steps as f64 * opts.dt,
        initial_speed: v_ego,
        initial_distance_lead: x_lead,
        lead: LeadProfile::constant(0.0),
    };
    let record = run_maneuver(&maneuver, weights, &opts)?;
    let summary = &record.summary;
    Ok(StopReport {
        initial_speed: v_ego,
        initial_distance: x_lead,
        stopping_distance: x_lead - summary.final_gap,
        final_speed: summary.final_speed,
        final_gap: summary.final_gap,
        all_valid: summary.invalid_ticks == 0,
    })
}
