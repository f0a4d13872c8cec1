use crate::LmError;

/// Floating point type used throughout system
pub type Real = f64;

/// Pass finite values through, name the offender otherwise.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LmError::NonFinite { what, value: v })
    }
}

/// Index of the first NaN or infinite entry, if any.
pub fn first_non_finite(values: &[Real]) -> Option<usize> {
    values.iter().position(|v| !v.is_finite())
}

/// Clamp to zero from below without swallowing NaN (unlike `f64::max`).
#[inline]
pub fn positive_part(v: Real) -> Real {
    if v < 0.0 { 0.0 } else { v }
}

/// Clamp to zero from above without swallowing NaN (unlike `f64::min`).
#[inline]
pub fn negative_part(v: Real) -> Real {
    if v > 0.0 { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn first_non_finite_reports_index() {
        assert_eq!(first_non_finite(&[0.0, -1.0, 2.0]), None);
        assert_eq!(first_non_finite(&[0.0, Real::INFINITY, Real::NAN]), Some(1));
        assert_eq!(first_non_finite(&[]), None);
    }

    #[test]
    fn parts_keep_nan() {
        assert_eq!(positive_part(-2.0), 0.0);
        assert_eq!(positive_part(3.0), 3.0);
        assert_eq!(negative_part(3.0), 0.0);
        assert_eq!(negative_part(-3.0), -3.0);
        assert!(positive_part(Real::NAN).is_nan());
        assert!(negative_part(Real::NAN).is_nan());
    }
}
