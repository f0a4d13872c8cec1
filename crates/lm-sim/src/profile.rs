//! Scripted lead vehicle speed.

use serde::{Deserialize, Serialize};

/// Piecewise-linear lead speed over time.
///
/// Speed is held at the first/last value outside the breakpoints. The
/// acceleration is the slope of the active segment and zero outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadProfile {
    /// m/s
    pub speed_values: Vec<f64>,
    /// s, strictly ascending
    pub speed_breakpoints: Vec<f64>,
}

impl LeadProfile {
    /// Lead holding one speed forever.
    pub fn constant(speed: f64) -> Self {
        Self {
            speed_values: vec![speed, speed],
            speed_breakpoints: vec![0.0, 100.0],
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.speed_values.is_empty() {
            return Err("lead profile has no points".to_string());
        }
        if self.speed_values.len() != self.speed_breakpoints.len() {
            return Err(format!(
                "{} speed values but {} breakpoints",
                self.speed_values.len(),
                self.speed_breakpoints.len()
            ));
        }
        if let Some(v) = self
            .speed_values
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0)
        {
            return Err(format!("lead speed must be finite and non-negative, got {v}"));
        }
        if self.speed_breakpoints.iter().any(|t| !t.is_finite()) {
            return Err("breakpoints must be finite".to_string());
        }
        if self.speed_breakpoints.windows(2).any(|w| w[1] <= w[0]) {
            return Err("breakpoints must be strictly ascending".to_string());
        }
        Ok(())
    }

    /// Index of the segment containing `t`, if any.
    fn segment(&self, t: f64) -> Option<usize> {
        self.speed_breakpoints
            .windows(2)
            .position(|w| w[0] <= t && t < w[1])
    }

    pub fn speed_at(&self, t: f64) -> f64 {
        let first = self.speed_values.first().copied().unwrap_or(0.0);
        let last = self.speed_values.last().copied().unwrap_or(0.0);
        if self.speed_breakpoints.first().is_none_or(|t0| t <= *t0) {
            return first;
        }
        match self.segment(t) {
            Some(i) => {
                let (t0, t1) = (self.speed_breakpoints[i], self.speed_breakpoints[i + 1]);
                let (v0, v1) = (self.speed_values[i], self.speed_values[i + 1]);
                v0 + (t - t0) / (t1 - t0) * (v1 - v0)
            }
            None => last,
        }
    }

    pub fn accel_at(&self, t: f64) -> f64 {
        match self.segment(t) {
            Some(i) => {
                let dv = self.speed_values[i + 1] - self.speed_values[i];
                dv / (self.speed_breakpoints[i + 1] - self.speed_breakpoints[i])
            }
            None => 0.0,
        }
    }
}
