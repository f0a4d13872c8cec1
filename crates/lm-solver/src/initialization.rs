//! Seed strategies for the warm-start memory.
//!
//! A seed is produced by fast forward simulation rather than optimization. It
//! only has to be physically plausible so the iterative solver starts close to
//! something feasible after a discontinuous scenario change.

use crate::cost::{MIN_GAP_M, TIME_HEADWAY_S};
use crate::horizon::{HORIZON_STEPS, step_dt};
use crate::lead::LeadPrediction;
use serde::{Deserialize, Serialize};

/// How `init_with_simulation` produces its seed trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SeedStrategy {
    /// Follow the predicted lead with the Intelligent Driver Model, using the
    /// current speed as the desired speed.
    #[default]
    IntelligentDriver,

    /// Hold the current speed (zero jerk everywhere).
    ConstantSpeed,
}

impl SeedStrategy {
    /// Convert strategy to human-readable name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedStrategy::IntelligentDriver => "IntelligentDriver",
            SeedStrategy::ConstantSpeed => "ConstantSpeed",
        }
    }

    /// Jerk profile of the seed, starting from zero acceleration.
    pub fn seed_jerks(
        &self,
        v_ego: f64,
        lead: &LeadPrediction,
        idm: &IdmParams,
    ) -> [f64; HORIZON_STEPS] {
        match self {
            SeedStrategy::ConstantSpeed => [0.0; HORIZON_STEPS],
            SeedStrategy::IntelligentDriver => {
                let accels = idm.simulate(v_ego, lead);
                let mut jerks = [0.0; HORIZON_STEPS];
                let mut a = 0.0;
                for (k, &target) in accels.iter().enumerate() {
                    jerks[k] = (target - a) / step_dt(k);
                    a = target;
                }
                jerks
            }
        }
    }
}

/// Intelligent Driver Model parameters for the seed simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdmParams {
    pub max_acceleration: f64,
    pub comfortable_deceleration: f64,
    /// Hard floor on the seed deceleration (m/s^2, positive)
    pub max_deceleration: f64,
    pub time_headway: f64,
    pub min_spacing: f64,
}

impl Default for IdmParams {
    fn default() -> Self {
        Self {
            max_acceleration: 2.0,
            comfortable_deceleration: 3.0,
            max_deceleration: 9.0,
            time_headway: TIME_HEADWAY_S,
            min_spacing: MIN_GAP_M,
        }
    }
}

impl IdmParams {
    /// IDM acceleration for the given speed, gap and closing speed.
    pub fn acceleration(&self, desired_speed: f64, speed: f64, gap: f64, closing: f64) -> f64 {
        let gap = gap.max(0.1);
        let s_star = self.min_spacing
            + speed * self.time_headway
            + speed * closing / (2.0 * (self.max_acceleration * self.comfortable_deceleration).sqrt());
        let free_road = (speed / desired_speed).powi(4);
        let interaction = (s_star.max(0.0) / gap).powi(2);
        (self.max_acceleration * (1.0 - free_road - interaction)).max(-self.max_deceleration)
    }

    /// Piecewise constant accelerations, one per interval, of an IDM follower
    /// starting at the origin with speed `v_ego`.
    pub fn simulate(&self, v_ego: f64, lead: &LeadPrediction) -> [f64; HORIZON_STEPS] {
        let desired_speed = v_ego.max(1.0);
        let (mut x, mut v) = (0.0, v_ego);
        let mut accels = [0.0; HORIZON_STEPS];

        for (k, slot) in accels.iter_mut().enumerate() {
            let dt = step_dt(k);
            let mut acc = self.acceleration(desired_speed, v, lead.x[k] - x, v - lead.v[k]);
            if v + acc * dt < 0.0 {
                acc = -v / dt;
            }
            x += v * dt + acc * dt * dt / 2.0;
            v += acc * dt;
            *slot = acc;
        }
        accels
    }
}
