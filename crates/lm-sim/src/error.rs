//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while setting up or running a maneuver.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid maneuver '{title}': {what}")]
    InvalidManeuver { title: String, what: String },

    #[error("Controller error: {message}")]
    Controller { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<lm_mpc::MpcError> for SimError {
    fn from(e: lm_mpc::MpcError) -> Self {
        SimError::Controller {
            message: e.to_string(),
        }
    }
}

impl From<lm_solver::SolverError> for SimError {
    fn from(e: lm_solver::SolverError) -> Self {
        SimError::Controller {
            message: e.to_string(),
        }
    }
}
