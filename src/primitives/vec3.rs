//! 3D vector type for directions, tangents and derivatives.

use crate::error::{SplineError, SplineResult};
use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 3D vector representing a direction, offset or curve derivative.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<F> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    #[inline]
    pub fn new(x: F, y: F, z: F) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    #[inline]
    pub fn unit_x() -> Self {
        Self::new(F::one(), F::zero(), F::zero())
    }

    #[inline]
    pub fn unit_y() -> Self {
        Self::new(F::zero(), F::one(), F::zero())
    }

    #[inline]
    pub fn unit_z() -> Self {
        Self::new(F::zero(), F::zero(), F::one())
    }

    /// Computes the dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product with another vector.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit-length copy, or `None` for a zero vector.
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let mag = self.magnitude();
        if mag > F::epsilon() && mag.is_finite() {
            Some(self / mag)
        } else {
            None
        }
    }

    /// Returns a unit-length copy.
    ///
    /// Fails with [`SplineError::DegenerateInput`] when the vector has no direction.
    #[inline]
    pub fn unitize(self) -> SplineResult<Self> {
        self.normalize().ok_or(SplineError::DegenerateInput)
    }

    /// Returns `true` if every component is finite.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the unsigned angle to `other` in radians.
    pub fn angle_to(self, other: Self) -> F {
        let denom = self.magnitude() * other.magnitude();
        if denom <= F::epsilon() {
            return F::zero();
        }
        (self.dot(other) / denom).max(-F::one()).min(F::one()).acos()
    }

    /// Returns some vector perpendicular to `self`.
    ///
    /// The result is not normalized and is zero only for a zero input.
    pub fn perpendicular(self) -> Self {
        let ax = self.x.abs();
        let ay = self.y.abs();
        let az = self.z.abs();
        if ax <= ay && ax <= az {
            Self::unit_x().cross(self)
        } else if ay <= az {
            Self::unit_y().cross(self)
        } else {
            Self::unit_z().cross(self)
        }
    }

    #[inline]
    pub fn lerp(self, other: Self, t: F) -> Self {
        self + (other - self) * t
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<F: Float> Mul<F> for Vec3<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl<F: Float> Div<F> for Vec3<F> {
    type Output = Self;

    #[inline]
    fn div(self, scalar: F) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<F: Float> Default for Vec3<F> {
    fn default() -> Self {
        Self::zero()
    }
}
