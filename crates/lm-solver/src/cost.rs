//! Ego rollout and least-squares cost of a candidate jerk profile.
//!
//! Residuals per node `i = 1..=20`, with gap `d = x_lead - x_ego`:
//! - time-to-collision: `exp(0.3 * (desired - d) / (sqrt(v + 0.5) + 0.1)) - 1`, when positive
//! - distance: `(desired - d) / (0.05 v + 0.5)`, when positive
//! - acceleration: `a (0.1 v + 1)`
//! - reverse speed: `min(v, 0)`
//!
//! and per interval the jerk `j (0.1 v + 1)`. Gap terms are one-sided so a
//! follower is never rewarded for closing in on the lead.

use crate::horizon::{HORIZON_NODES, HORIZON_STEPS, step_dt};
use crate::lead::LeadPrediction;
use crate::types::CostWeights;
use lm_core::units::constants::G_MPS2;
use lm_core::{negative_part, positive_part};
use nalgebra::DVector;

pub const TIME_HEADWAY_S: f64 = 1.8;
pub const MIN_GAP_M: f64 = 4.0;
const TTC_GAIN: f64 = 0.3;
const REVERSE_SPEED_WEIGHT: f64 = 1e3;
const RESIDUALS_PER_NODE: usize = 4;

/// Total number of residuals produced by [`LongitudinalCost::residuals`].
pub const NUM_RESIDUALS: usize = RESIDUALS_PER_NODE * HORIZON_STEPS + HORIZON_STEPS;

/// Headway the follower should keep: standstill margin, reaction distance and
/// the difference in braking distances.
pub fn desired_gap(v_ego: f64, v_lead: f64) -> f64 {
    let reaction = v_ego * TIME_HEADWAY_S - (v_lead - v_ego) * TIME_HEADWAY_S;
    let braking = (v_ego * v_ego - v_lead * v_lead) / (2.0 * G_MPS2);
    MIN_GAP_M + reaction + braking
}

/// Ego states at every node for a given jerk profile.
#[derive(Debug, Clone, PartialEq)]
pub struct EgoRollout {
    pub x: [f64; HORIZON_NODES],
    pub v: [f64; HORIZON_NODES],
    pub a: [f64; HORIZON_NODES],
}

/// Integrate the jerk profile exactly from `(0, v0, a0)`.
///
/// The vehicle cannot reverse: once speed would drop below zero it holds
/// standstill (v = 0, a = 0) at the end of that interval.
pub fn rollout(v0: f64, a0: f64, jerks: &[f64]) -> EgoRollout {
    let mut out = EgoRollout {
        x: [0.0; HORIZON_NODES],
        v: [0.0; HORIZON_NODES],
        a: [0.0; HORIZON_NODES],
    };
    let (mut x, mut v, mut a) = (0.0, v0, a0);
    out.v[0] = v;
    out.a[0] = a;

    for (k, &j) in jerks.iter().take(HORIZON_STEPS).enumerate() {
        let dt = step_dt(k);
        let mut x_next = x + v * dt + a * dt * dt / 2.0 + j * dt * dt * dt / 6.0;
        let mut v_next = v + a * dt + j * dt * dt / 2.0;
        let mut a_next = a + j * dt;
        if v_next < 0.0 {
            x_next = x + positive_part(v) * dt / 2.0;
            v_next = 0.0;
            a_next = 0.0;
        }
        x = x_next;
        v = v_next;
        a = a_next;
        out.x[k + 1] = x;
        out.v[k + 1] = v;
        out.a[k + 1] = a;
    }
    out
}

/// Residual model for one solve step.
pub struct LongitudinalCost<'a> {
    sqrt_w: [f64; 4],
    lead: &'a LeadPrediction,
    v0: f64,
    a0: f64,
}

impl<'a> LongitudinalCost<'a> {
    pub fn new(weights: &CostWeights, lead: &'a LeadPrediction, v0: f64, a0: f64) -> Self {
        Self {
            sqrt_w: [
                weights.ttc.sqrt(),
                weights.distance.sqrt(),
                weights.acceleration.sqrt(),
                weights.jerk.sqrt(),
            ],
            lead,
            v0,
            a0,
        }
    }

    pub fn residuals(&self, jerks: &DVector<f64>) -> DVector<f64> {
        let ego = rollout(self.v0, self.a0, jerks.as_slice());
        let [w_ttc, w_dist, w_acc, w_jerk] = self.sqrt_w;
        let w_rev = REVERSE_SPEED_WEIGHT.sqrt();

        let mut r = DVector::zeros(NUM_RESIDUALS);
        let mut idx = 0;
        for i in 1..HORIZON_NODES {
            let v = ego.v[i];
            let v_pos = positive_part(v);
            let gap = self.lead.x[i] - ego.x[i];
            let shortfall = desired_gap(v_pos, self.lead.v[i]) - gap;
            let norm_shortfall = shortfall / ((v_pos + 0.5).sqrt() + 0.1);

            r[idx] = w_ttc * positive_part((TTC_GAIN * norm_shortfall).exp() - 1.0);
            r[idx + 1] = w_dist * positive_part(shortfall) / (0.05 * v_pos + 0.5);
            r[idx + 2] = w_acc * ego.a[i] * (0.1 * v_pos + 1.0);
            r[idx + 3] = w_rev * negative_part(v);
            idx += RESIDUALS_PER_NODE;
        }
        for k in 0..HORIZON_STEPS {
            let v_pos = positive_part(ego.v[k]);
            r[idx] = w_jerk * jerks[k] * (0.1 * v_pos + 1.0);
            idx += 1;
        }
        r
    }

    pub fn cost(&self, jerks: &DVector<f64>) -> f64 {
        self.residuals(jerks).norm_squared()
    }
}
