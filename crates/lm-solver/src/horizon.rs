//! Fixed non-uniform horizon grid.
//!
//! 21 nodes: five 0.2 s steps covering 0.0-1.0 s, then fifteen 0.6 s steps
//! out to 10.0 s. Node times are computed from the index, never accumulated.

/// Number of intervals (one jerk per interval).
pub const HORIZON_STEPS: usize = 20;
/// Number of nodes, including the current state at index 0.
pub const HORIZON_NODES: usize = HORIZON_STEPS + 1;

pub const FINE_STEPS: usize = 5;
pub const FINE_DT: f64 = 0.2;
pub const COARSE_DT: f64 = 0.6;
/// Time of the first coarse node.
pub const COARSE_START: f64 = FINE_STEPS as f64 * FINE_DT;

/// Length of interval `k` in seconds.
#[inline]
pub const fn step_dt(k: usize) -> f64 {
    if k < FINE_STEPS { FINE_DT } else { COARSE_DT }
}

/// Time of node `i` relative to the start of the horizon.
#[inline]
pub fn node_time(i: usize) -> f64 {
    if i <= FINE_STEPS {
        i as f64 * FINE_DT
    } else {
        COARSE_START + (i - FINE_STEPS) as f64 * COARSE_DT
    }
}

pub fn node_times() -> [f64; HORIZON_NODES] {
    std::array::from_fn(node_time)
}

pub fn step_dts() -> [f64; HORIZON_STEPS] {
    std::array::from_fn(step_dt)
}

/// Interval containing time `t`; times past the end map to the last interval.
pub fn interval_at(t: f64) -> usize {
    const SLACK: f64 = 1e-9;
    (0..HORIZON_STEPS)
        .find(|&k| node_time(k) <= t + SLACK && t + SLACK < node_time(k + 1))
        .unwrap_or(HORIZON_STEPS - 1)
}
