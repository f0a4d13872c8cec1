//! Numerical safety gate for a sampled plan.
//!
//! The optimizer reports failure only by leaving NaN or infinite values in its
//! output. A plan must pass [`check`] before any command derived from it is used.

use crate::trajectory::Trajectory;
use lm_core::first_non_finite;
use serde::{Deserialize, Serialize};

/// The checked output sequences of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sequence {
    EgoPosition,
    EgoVelocity,
    EgoAcceleration,
    LeadPosition,
    LeadVelocity,
}

impl Sequence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::EgoPosition => "x_ego",
            Sequence::EgoVelocity => "v_ego",
            Sequence::EgoAcceleration => "a_ego",
            Sequence::LeadPosition => "x_lead",
            Sequence::LeadVelocity => "v_lead",
        }
    }
}

/// Outcome of the validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    Valid,
    /// First non-finite entry found, in sequence order.
    NonFinite { sequence: Sequence, index: usize },
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

pub fn check(trajectory: &Trajectory) -> Validity {
    let sequences = [
        (Sequence::EgoPosition, &trajectory.x_ego),
        (Sequence::EgoVelocity, &trajectory.v_ego),
        (Sequence::EgoAcceleration, &trajectory.a_ego),
        (Sequence::LeadPosition, &trajectory.x_lead),
        (Sequence::LeadVelocity, &trajectory.v_lead),
    ];
    for (sequence, values) in sequences {
        if let Some(index) = first_non_finite(values) {
            return Validity::NonFinite { sequence, index };
        }
    }
    Validity::Valid
}

/// True iff none of the five output sequences holds a non-finite value.
pub fn is_valid(trajectory: &Trajectory) -> bool {
    check(trajectory).is_valid()
}

/// A trajectory together with its validity verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckedTrajectory {
    pub trajectory: Trajectory,
    pub validity: Validity,
}

impl CheckedTrajectory {
    pub fn new(trajectory: Trajectory) -> Self {
        let validity = check(&trajectory);
        Self {
            trajectory,
            validity,
        }
    }

    /// The trajectory, only if it passed the check.
    pub fn into_valid(self) -> Option<Trajectory> {
        self.validity.is_valid().then_some(self.trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::extract;
    use lm_solver::SolutionBuffer;

    fn finite() -> Trajectory {
        let mut buf = SolutionBuffer::default();
        buf.v_ego[3] = -0.0;
        buf.a_ego[7] = -4.5;
        buf.x_lead[2] = -10.0;
        extract(&buf, 0.0, 0.0)
    }

    #[test]
    fn finite_values_pass_including_zero_and_negative() {
        assert!(is_valid(&finite()));
        assert_eq!(check(&finite()), Validity::Valid);
    }

    #[test]
    fn nan_is_reported_with_location() {
        let mut traj = finite();
        traj.a_ego[4] = f64::NAN;
        traj.v_lead[0] = f64::INFINITY;
        assert!(!is_valid(&traj));
        assert_eq!(
            check(&traj),
            Validity::NonFinite {
                sequence: Sequence::EgoAcceleration,
                index: 4
            }
        );
    }

    #[test]
    fn time_axis_is_not_checked() {
        let mut traj = finite();
        traj.t[0] = f64::NAN;
        assert!(is_valid(&traj));
    }

    #[test]
    fn poisoned_buffer_is_invalid() {
        let mut buf = SolutionBuffer::default();
        buf.poison();
        let checked = CheckedTrajectory::new(extract(&buf, 0.0, 0.0));
        assert!(!checked.validity.is_valid());
        assert!(checked.into_valid().is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::trajectory::extract;
    use lm_solver::SolutionBuffer;
    use proptest::prelude::*;

    fn bad_value() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY)
        ]
    }

    proptest! {
        #[test]
        fn any_single_non_finite_entry_is_caught(
            seq in 0usize..5,
            index in 0usize..21,
            bad in bad_value(),
            fill in -100.0_f64..100.0_f64,
        ) {
            let mut buf = SolutionBuffer::default();
            buf.v_ego.fill(fill);
            let mut traj = extract(&buf, 0.0, 0.0);
            prop_assert!(is_valid(&traj));

            let target = match seq {
                0 => &mut traj.x_ego,
                1 => &mut traj.v_ego,
                2 => &mut traj.a_ego,
                3 => &mut traj.x_lead,
                _ => &mut traj.v_lead,
            };
            target[index] = bad;
            prop_assert!(!is_valid(&traj));
        }
    }
}
