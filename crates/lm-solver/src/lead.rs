//! Lead vehicle motion prediction over the horizon.

use crate::horizon::{HORIZON_NODES, HORIZON_STEPS, node_time, step_dt};

/// Predicted lead position and speed at every node.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadPrediction {
    pub x: [f64; HORIZON_NODES],
    pub v: [f64; HORIZON_NODES],
}

/// Lead acceleration at time `t` for a measured acceleration `a0`.
///
/// The measured acceleration fades as `exp(-tau * t^2 / 2)`.
#[inline]
pub fn lead_accel_at(a0: f64, tau: f64, t: f64) -> f64 {
    a0 * (-tau * t * t / 2.0).exp()
}

/// Roll the lead forward from the measured snapshot. Speed never drops below
/// zero: a lead that comes to a stop inside an interval stays stopped.
pub fn predict_lead(x0: f64, v0: f64, a0: f64, tau: f64) -> LeadPrediction {
    let mut xs = [0.0; HORIZON_NODES];
    let mut vs = [0.0; HORIZON_NODES];
    let (mut x, mut v) = (x0, v0);
    xs[0] = x;
    vs[0] = v;

    for k in 0..HORIZON_STEPS {
        let dt = step_dt(k);
        let a = lead_accel_at(a0, tau, node_time(k));
        if v + a * dt < 0.0 {
            if a < 0.0 {
                let t_stop = -v / a;
                x += v * t_stop / 2.0;
            }
            v = 0.0;
        } else {
            x += v * dt + 0.5 * a * dt * dt;
            v += a * dt;
        }
        xs[k + 1] = x;
        vs[k + 1] = v;
    }

    LeadPrediction { x: xs, v: vs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_speed_lead() {
        let p = predict_lead(50.0, 20.0, 0.0, 1.5);
        assert_eq!(p.x[0], 50.0);
        assert!((p.x[20] - 250.0).abs() < 1e-9);
        assert!(p.v.iter().all(|v| (*v - 20.0).abs() < 1e-12));
    }

    #[test]
    fn stationary_lead_stays_put() {
        let p = predict_lead(200.0, 0.0, 0.0, 1.5);
        assert!(p.x.iter().all(|x| *x == 200.0));
        assert!(p.v.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn braking_lead_never_reverses() {
        let p = predict_lead(30.0, 5.0, -9.0, 1.5);
        for w in p.x.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(p.v.iter().all(|v| *v >= 0.0));
        assert_eq!(p.v[20], 0.0);
    }

    #[test]
    fn acceleration_fades() {
        assert_eq!(lead_accel_at(-4.0, 1.5, 0.0), -4.0);
        let late = lead_accel_at(-4.0, 1.5, 3.0);
        assert!(late > -0.01 && late < 0.0);
    }
}
