//! Error types for solver operations.

use lm_core::error::LmError;
use thiserror::Error;

/// Errors that can occur while driving the optimizer.
///
/// Numerical infeasibility is deliberately absent: a failed iteration writes
/// NaN into the solution buffer instead of returning an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Solver not initialized: {what}")]
    NotInitialized { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<LmError> for SolverError {
    fn from(e: LmError) -> Self {
        SolverError::InvalidArg {
            what: e.to_string(),
        }
    }
}
