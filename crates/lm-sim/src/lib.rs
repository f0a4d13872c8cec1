//! lm-sim: closed-loop maneuver harness for the longitudinal controller.
//!
//! A point-mass ego follows a scripted lead vehicle. Each tick the controller
//! plans, the harness checks the plan and applies either the command or an
//! emergency fallback, then advances both vehicles.

pub mod error;
pub mod maneuver;
pub mod profile;
pub mod record;
pub mod sim;

pub use error::{SimError, SimResult};
pub use maneuver::{Maneuver, builtin_maneuvers, load_maneuvers_yaml, parse_maneuvers_yaml};
pub use profile::LeadProfile;
pub use record::{ManeuverRecord, ManeuverSample, ManeuverSummary, StopReport};
pub use sim::{SimOptions, reference_stop, run_maneuver, run_maneuver_with};
