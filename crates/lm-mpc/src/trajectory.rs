//! Sampling the raw horizon solution into the caller's frame.

use lm_core::{LmError, LmResult};
use lm_solver::horizon::{HORIZON_NODES, node_time};
use lm_solver::SolutionBuffer;
use serde::{Deserialize, Serialize};

/// Planned trajectory on the horizon grid (timesteps are not uniform).
///
/// Owns copies of the solver output; safe to keep across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Sample times (s), shifted by the caller's time offset.
    pub t: Vec<f64>,
    /// Ego position (m), re-anchored to the caller's frame.
    pub x_ego: Vec<f64>,
    /// Ego velocity (m/s).
    pub v_ego: Vec<f64>,
    /// Ego acceleration (m/s^2).
    pub a_ego: Vec<f64>,
    /// Predicted lead position (m), relative to the ego position at solve time.
    pub x_lead: Vec<f64>,
    /// Predicted lead velocity (m/s).
    pub v_lead: Vec<f64>,
}

/// One row of a [`Trajectory`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub t: f64,
    pub x_ego: f64,
    pub v_ego: f64,
    pub a_ego: f64,
    pub x_lead: f64,
    pub v_lead: f64,
}

/// Map the solver buffer onto the horizon grid.
///
/// Times are shifted by `time_offset` and ego positions by `position_offset`;
/// the other sequences are copied unchanged. Never touches solver state.
pub fn extract(buffer: &SolutionBuffer, time_offset: f64, position_offset: f64) -> Trajectory {
    Trajectory {
        t: (0..HORIZON_NODES).map(|i| node_time(i) + time_offset).collect(),
        x_ego: buffer.x_ego.iter().map(|x| x + position_offset).collect(),
        v_ego: buffer.v_ego.to_vec(),
        a_ego: buffer.a_ego.to_vec(),
        x_lead: buffer.x_lead.to_vec(),
        v_lead: buffer.v_lead.to_vec(),
    }
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Row `index` of every sequence.
    ///
    /// Fails when any sequence is shorter than `index + 1`; the fields are
    /// public, so their lengths can disagree.
    pub fn sample(&self, index: usize) -> LmResult<TrajectorySample> {
        let at = |seq: &[f64]| {
            seq.get(index).copied().ok_or(LmError::IndexOob {
                what: "trajectory sample",
                index,
                len: seq.len(),
            })
        };
        Ok(TrajectorySample {
            t: at(&self.t)?,
            x_ego: at(&self.x_ego)?,
            v_ego: at(&self.v_ego)?,
            a_ego: at(&self.a_ego)?,
            x_lead: at(&self.x_lead)?,
            v_lead: at(&self.v_lead)?,
        })
    }

    /// Sample to apply over the next control period.
    pub fn next_step(&self) -> LmResult<TrajectorySample> {
        self.sample(1)
    }
}
