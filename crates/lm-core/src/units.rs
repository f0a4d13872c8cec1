// lm-core/src/units.rs

use uom::si::f64::Velocity as UomVelocity;
use uom::si::velocity::{kilometer_per_hour, meter_per_second, mile_per_hour};

/// Road speed (SI, f64). Maneuver authoring works in whatever unit the
/// source uses; everything past this boundary is raw m/s.
pub type Velocity = UomVelocity;

#[inline]
pub fn mps(v: f64) -> Velocity {
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn mph(v: f64) -> Velocity {
    Velocity::new::<mile_per_hour>(v)
}

#[inline]
pub fn kph(v: f64) -> Velocity {
    Velocity::new::<kilometer_per_hour>(v)
}

/// Raw SI value (m/s) of a velocity.
#[inline]
pub fn to_mps(v: Velocity) -> f64 {
    v.get::<meter_per_second>()
}

pub mod constants {
    /// Rounded gravity used by the braking-distance part of the headway model.
    pub const G_MPS2: f64 = 9.81;
}
