//! Per-tick records and summaries of a maneuver run.

use serde::{Deserialize, Serialize};

/// State of both vehicles at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManeuverSample {
    pub t: f64,
    pub x_ego: f64,
    pub v_ego: f64,
    pub a_ego: f64,
    pub x_lead: f64,
    pub v_lead: f64,
    pub a_lead: f64,
    pub gap: f64,
    /// Plan of this tick passed the validity check.
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverSummary {
    pub ticks: usize,
    pub min_gap: f64,
    pub final_gap: f64,
    pub final_speed: f64,
    pub min_accel: f64,
    /// Time of the first commanded deceleration below the braking threshold.
    pub first_brake_time: Option<f64>,
    pub collided: bool,
    /// Ticks that fell back to emergency braking.
    pub invalid_ticks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverRecord {
    pub title: String,
    pub samples: Vec<ManeuverSample>,
    pub summary: ManeuverSummary,
}

impl ManeuverRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut csv = String::from("t,x_ego,v_ego,a_ego,x_lead,v_lead,a_lead,gap,valid\n");
        for s in &self.samples {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                s.t, s.x_ego, s.v_ego, s.a_ego, s.x_lead, s.v_lead, s.a_lead, s.gap, s.valid
            ));
        }
        csv
    }
}

/// Outcome of the reference stopping run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopReport {
    pub initial_speed: f64,
    pub initial_distance: f64,
    /// Distance travelled by the ego (m).
    pub stopping_distance: f64,
    pub final_speed: f64,
    pub final_gap: f64,
    pub all_valid: bool,
}
