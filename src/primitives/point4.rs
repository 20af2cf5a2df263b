//! Homogeneous (weighted) control points.

use super::{Point3, Vec3};
use crate::error::{SplineError, SplineResult};
use num_traits::Float;
use std::ops::{Add, Mul, Sub};

/// A control point lifted into homogeneous space: `(w·x, w·y, w·z, w)`.
///
/// Rational curves evaluate with the same linear machinery as polynomial
/// ones once their control points are in this form; the Euclidean result is
/// recovered with [`Point4::dehomogenize`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point4<F> {
    pub x: F,
    pub y: F,
    pub z: F,
    pub w: F,
}

impl<F: Float> Point4<F> {
    /// Creates a point from already weighted components.
    #[inline]
    pub fn new(x: F, y: F, z: F, w: F) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero(), F::zero())
    }

    /// Lifts a Euclidean point with `weight` into homogeneous space.
    #[inline]
    pub fn homogenize(point: Point3<F>, weight: F) -> Self {
        Self::new(point.x * weight, point.y * weight, point.z * weight, weight)
    }

    /// The weight component.
    #[inline]
    pub fn weight(self) -> F {
        self.w
    }

    /// The weighted spatial part `(w·x, w·y, w·z)` as a vector.
    #[inline]
    pub fn weighted(self) -> Vec3<F> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Projects back to Euclidean space by dividing through by the weight.
    ///
    /// Fails with [`SplineError::DegenerateInput`] if the weight is zero.
    #[inline]
    pub fn dehomogenize(self) -> SplineResult<Point3<F>> {
        if self.w.abs() <= F::epsilon() {
            return Err(SplineError::DegenerateInput);
        }
        let p = Point3::new(self.x / self.w, self.y / self.w, self.z / self.w);
        if p.is_valid() {
            Ok(p)
        } else {
            Err(SplineError::NonFinite)
        }
    }

    /// Drops the weight without dividing, giving the Euclidean point the
    /// control point would have with unit weight.
    #[inline]
    pub fn projected(self) -> Point3<F> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl<F: Float> Add for Point4<F> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl<F: Float> Sub for Point4<F> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

impl<F: Float> Mul<F> for Point4<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }
}

impl<F: Float> Default for Point4<F> {
    fn default() -> Self {
        Self::zero()
    }
}
