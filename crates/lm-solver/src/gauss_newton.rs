//! Single damped Gauss-Newton iteration with backtracking line search.

use crate::error::{SolverError, SolverResult};
use crate::jacobian::forward_difference_jacobian;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Gauss-Newton iteration configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussNewtonConfig {
    /// Levenberg-style damping added to the normal-equation diagonal (relative)
    pub damping: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Relative finite-difference step
    pub fd_epsilon: f64,
}

impl Default for GaussNewtonConfig {
    fn default() -> Self {
        Self {
            damping: 1e-6,
            line_search_beta: 0.5,
            max_line_search_iters: 10,
            fd_epsilon: 1e-6,
        }
    }
}

/// Result of one iteration.
#[derive(Debug, Clone)]
pub struct GaussNewtonStep {
    /// Accepted iterate (the input when no step reduced the cost)
    pub x: DVector<f64>,
    pub cost_before: f64,
    pub cost_after: f64,
    /// Accepted step fraction, 0 when rejected
    pub step_length: f64,
    pub line_search_iters: usize,
}

/// Take exactly one Gauss-Newton step on `0.5 * |r(x)|^2` from `x0`.
///
/// Fails when the cost at `x0` is not finite or the damped normal equations
/// are not positive definite.
pub fn gauss_newton_step<F>(
    x0: &DVector<f64>,
    residual_fn: F,
    config: &GaussNewtonConfig,
) -> SolverResult<GaussNewtonStep>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let r = residual_fn(x0);
    let cost = r.norm_squared();
    if !cost.is_finite() {
        return Err(SolverError::Numeric {
            what: format!("non-finite cost {cost} at warm start"),
        });
    }

    let jac = forward_difference_jacobian(x0, &r, &residual_fn, config.fd_epsilon);

    // Solve (J^T J + mu (1 + diag)) dx = -J^T r
    let mut normal = jac.transpose() * &jac;
    for i in 0..normal.nrows() {
        normal[(i, i)] += config.damping * (1.0 + normal[(i, i)]);
    }
    let gradient = jac.transpose() * &r;
    let dx = normal
        .cholesky()
        .ok_or_else(|| SolverError::Numeric {
            what: "normal equations not positive definite".to_string(),
        })?
        .solve(&(-gradient));

    let mut alpha = 1.0;
    let mut x_new = x0 + alpha * &dx;
    let mut cost_new = residual_fn(&x_new).norm_squared();
    let mut iters = 0;

    while !(cost_new < cost) && iters < config.max_line_search_iters {
        alpha *= config.line_search_beta;
        x_new = x0 + alpha * &dx;
        cost_new = residual_fn(&x_new).norm_squared();
        iters += 1;
    }

    if !(cost_new < cost) {
        return Ok(GaussNewtonStep {
            x: x0.clone(),
            cost_before: cost,
            cost_after: cost,
            step_length: 0.0,
            line_search_iters: iters,
        });
    }

    Ok(GaussNewtonStep {
        x: x_new,
        cost_before: cost,
        cost_after: cost_new,
        step_length: alpha,
        line_search_iters: iters,
    })
}
