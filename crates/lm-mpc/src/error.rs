//! Error types for controller operations.

use lm_solver::SolverError;
use thiserror::Error;

/// Result type for controller operations.
pub type MpcResult<T> = Result<T, MpcError>;

/// Precondition violations and engine configuration errors.
///
/// Numerical failure of a plan is not an error; see [`crate::Validity`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MpcError {
    /// Cost weights were never configured.
    #[error("Controller not configured: call reset before {what}")]
    NotConfigured { what: &'static str },

    /// No feasible seed since the last reset.
    #[error("Controller not seeded: call init before run")]
    NotSeeded,

    /// Error reported by the optimization engine.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}
