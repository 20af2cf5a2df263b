//! Scalar helpers: angle conversion, validity gates and interval remapping.

use crate::error::{SplineError, SplineResult};
use num_traits::Float;

/// Converts an `f64` constant to `F`.
///
/// Every `Float` type in use (`f32`, `f64`) can represent an `f64` constant,
/// possibly with rounding.
#[inline]
pub fn cast<F: Float>(value: f64) -> F {
    F::from(value).unwrap()
}

/// Converts a count or index to `F`.
#[inline]
pub fn from_usize<F: Float>(value: usize) -> F {
    F::from(value).unwrap()
}

/// Converts degrees to radians.
#[inline]
pub fn to_radians<F: Float>(degrees: F) -> F {
    degrees.to_radians()
}

/// Converts radians to degrees.
#[inline]
pub fn to_degrees<F: Float>(radians: F) -> F {
    radians.to_degrees()
}

/// Returns `true` if `value` is neither NaN nor infinite.
#[inline]
pub fn is_valid_double<F: Float>(value: F) -> bool {
    value.is_finite()
}

/// Passes `value` through when finite, otherwise fails with [`SplineError::NonFinite`].
#[inline]
pub fn check_finite<F: Float>(value: F) -> SplineResult<F> {
    if is_valid_double(value) {
        Ok(value)
    } else {
        Err(SplineError::NonFinite)
    }
}

/// Returns `true` if `a` and `b` differ by less than `tolerance`.
#[inline]
pub fn approx_eq<F: Float>(a: F, b: F, tolerance: F) -> bool {
    (a - b).abs() < tolerance
}

/// Maps `value` from the interval `source` onto the interval `target`.
///
/// A zero-width source interval maps everything onto the start of `target`.
pub fn remap<F: Float>(value: F, source: (F, F), target: (F, F)) -> F {
    let width = source.1 - source.0;
    if width == F::zero() {
        return target.0;
    }
    target.0 + (value - source.0) / width * (target.1 - target.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_conversion() {
        assert_relative_eq!(to_radians(180.0), PI, epsilon = 1e-12);
        assert_relative_eq!(to_degrees(PI / 2.0), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_valid_double() {
        assert!(is_valid_double(1.5));
        assert!(!is_valid_double(f64::NAN));
        assert!(!is_valid_double(f64::INFINITY));
        assert!(!is_valid_double(f64::NEG_INFINITY));
    }

    #[test]
    fn test_check_finite() {
        assert_eq!(check_finite(2.0), Ok(2.0));
        assert_eq!(check_finite(0.0_f64 / 0.0), Err(SplineError::NonFinite));
    }

    #[test]
    fn test_remap() {
        assert_relative_eq!(remap(5.0, (0.0, 10.0), (0.0, 1.0)), 0.5);
        assert_relative_eq!(remap(2.0, (1.0, 3.0), (10.0, 20.0)), 15.0);
        assert_relative_eq!(remap(0.25, (0.0, 1.0), (1.0, 0.0)), 0.75);
        assert_relative_eq!(remap(7.0, (3.0, 3.0), (4.0, 8.0)), 4.0);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0 + 1e-12, 1e-10));
        assert!(!approx_eq(1.0, 1.1, 1e-10));
    }

    #[test]
    fn test_f32_support() {
        let v: f32 = cast(0.5);
        assert_eq!(v, 0.5_f32);
        let n: f32 = from_usize(3);
        assert_eq!(n, 3.0_f32);
    }
}
