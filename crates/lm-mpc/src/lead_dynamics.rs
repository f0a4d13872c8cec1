//! Decay constant for the lead vehicle's acceleration.

use lm_core::positive_part;
use std::f64::consts::PI;

/// Baseline decay constant.
pub const LEAD_ACCEL_TAU: f64 = 1.5;

/// Keeps the estimate finite for a stationary lead (m/s).
pub const LEAD_SPEED_EPS: f64 = 0.01;

/// Estimate how the lead's measured acceleration fades over the horizon.
///
/// Returns `max(LEAD_ACCEL_TAU, a^2 * pi / (2 (v + eps)^2))`. The adaptive
/// branch dominates when the lead is slow compared to its acceleration (hard
/// braking close to a stop); with that value the predicted speed change
/// integrates to the lead's current speed, so the prediction brings the lead
/// to rest instead of reversing it. The sign of `lead_accel` is irrelevant.
///
/// Negative speed readings are treated as a stopped lead.
pub fn estimate_tau(lead_accel: f64, lead_velocity: f64) -> f64 {
    let speed = positive_part(lead_velocity) + LEAD_SPEED_EPS;
    let adaptive = lead_accel * lead_accel * PI / (2.0 * speed * speed);
    LEAD_ACCEL_TAU.max(adaptive)
}
