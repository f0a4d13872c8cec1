//! Maneuver definitions and the built-in regression set.

use crate::error::{SimError, SimResult};
use crate::profile::LeadProfile;
use lm_core::units::{mph, to_mps};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted car-following scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maneuver {
    pub title: String,
    /// s
    pub duration: f64,
    /// Ego speed at t = 0 (m/s).
    pub initial_speed: f64,
    /// Lead bumper distance at t = 0 (m).
    pub initial_distance_lead: f64,
    pub lead: LeadProfile,
}

impl Maneuver {
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |what: String| SimError::InvalidManeuver {
            title: self.title.clone(),
            what,
        };
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(invalid(format!("duration must be positive, got {}", self.duration)));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(invalid(format!(
                "initial speed must be non-negative, got {}",
                self.initial_speed
            )));
        }
        if !(self.initial_distance_lead.is_finite() && self.initial_distance_lead > 0.0) {
            return Err(invalid(format!(
                "initial lead distance must be positive, got {}",
                self.initial_distance_lead
            )));
        }
        self.lead.validate().map_err(invalid)
    }
}

fn approach_stopped_car(speed: f64) -> Maneuver {
    let stopped = to_mps(mph(0.0));
    Maneuver {
        title: format!("approaching a stopped car at {speed}m/s"),
        duration: 30.0,
        initial_speed: speed,
        initial_distance_lead: 200.0,
        lead: LeadProfile {
            speed_values: vec![stopped, stopped],
            speed_breakpoints: vec![0.0, 100.0],
        },
    }
}

fn emergency_stop(speed: f64, duration: f64) -> Maneuver {
    Maneuver {
        title: format!(
            "emergency stop while cruising at {speed}m/s, lead brakes from 30m/s at 3s, \
             initial distance 100m"
        ),
        duration,
        initial_speed: speed,
        initial_distance_lead: 100.0,
        lead: LeadProfile {
            speed_values: vec![30.0, 0.0],
            speed_breakpoints: vec![3.0, 6.0],
        },
    }
}

/// Regression maneuvers: four stopped-car approaches and two emergency stops.
pub fn builtin_maneuvers() -> Vec<Maneuver> {
    vec![
        approach_stopped_car(5.0),
        approach_stopped_car(10.0),
        approach_stopped_car(20.0),
        approach_stopped_car(30.0),
        emergency_stop(30.0, 18.0),
        emergency_stop(25.0, 30.0),
    ]
}

/// Parse a YAML list of maneuvers and validate each one.
pub fn parse_maneuvers_yaml(content: &str) -> SimResult<Vec<Maneuver>> {
    let maneuvers: Vec<Maneuver> = serde_yaml::from_str(content)?;
    for m in &maneuvers {
        m.validate()?;
    }
    Ok(maneuvers)
}

pub fn load_maneuvers_yaml(path: &Path) -> SimResult<Vec<Maneuver>> {
    let content = std::fs::read_to_string(path)?;
    parse_maneuvers_yaml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid() {
        let all = builtin_maneuvers();
        assert_eq!(all.len(), 6);
        for m in &all {
            m.validate().unwrap();
        }
        assert_eq!(all[2].initial_speed, 20.0);
        assert_eq!(all[4].duration, 18.0);
        assert_eq!(all[5].initial_speed, 25.0);
    }

    #[test]
    fn yaml_list_parses() {
        let yaml = r#"
- title: slow lead
  duration: 20.0
  initial_speed: 25.0
  initial_distance_lead: 60.0
  lead:
    speed_values: [15.0, 15.0]
    speed_breakpoints: [0.0, 100.0]
"#;
        let maneuvers = parse_maneuvers_yaml(yaml).unwrap();
        assert_eq!(maneuvers.len(), 1);
        assert_eq!(maneuvers[0].title, "slow lead");
        assert_eq!(maneuvers[0].lead.speed_at(10.0), 15.0);
    }

    #[test]
    fn yaml_rejects_bad_maneuver() {
        let yaml = r#"
- title: negative
  duration: -1.0
  initial_speed: 25.0
  initial_distance_lead: 60.0
  lead:
    speed_values: [15.0]
    speed_breakpoints: [0.0]
"#;
        let err = parse_maneuvers_yaml(yaml).unwrap_err();
        assert!(matches!(err, SimError::InvalidManeuver { .. }));
    }

    #[test]
    fn builtins_round_trip_through_yaml() {
        let yaml = serde_yaml::to_string(&builtin_maneuvers()).unwrap();
        assert_eq!(parse_maneuvers_yaml(&yaml).unwrap(), builtin_maneuvers());
    }
}
