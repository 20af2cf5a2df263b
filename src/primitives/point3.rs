//! 3D point type.

use super::Vec3;
use num_traits::Float;
use std::ops::{Add, Sub};

/// A 3D point with x, y, and z coordinates.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3<F> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Point3<F> {
    #[inline]
    pub fn new(x: F, y: F, z: F) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn origin() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Builds a point from `[x, y, z]`.
    #[inline]
    pub fn from_array(coords: [F; 3]) -> Self {
        Self::new(coords[0], coords[1], coords[2])
    }

    #[inline]
    pub fn to_array(self) -> [F; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn distance_squared(self, other: Self) -> F {
        (other - self).magnitude_squared()
    }

    #[inline]
    pub fn distance(self, other: Self) -> F {
        self.distance_squared(other).sqrt()
    }

    /// Linearly interpolates between `self` and `other`.
    #[inline]
    pub fn lerp(self, other: Self, t: F) -> Self {
        self + (other - self) * t
    }

    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        let half = F::one() / (F::one() + F::one());
        self.lerp(other, half)
    }

    /// Returns `true` if every coordinate is finite.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns the average of `points`, or `None` when empty.
    pub fn centroid(points: &[Self]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let sum = points
            .iter()
            .fold(Vec3::zero(), |acc, p| acc + p.to_vec());
        let n = F::from(points.len())?;
        Some(Self::from(sum / n))
    }

    /// Converts this point to a vector from the origin.
    #[inline]
    pub fn to_vec(self) -> Vec3<F> {
        Vec3::new(self.x, self.y, self.z)
    }
}

// Point - Point = Vec3
impl<F: Float> Sub for Point3<F> {
    type Output = Vec3<F>;

    #[inline]
    fn sub(self, other: Self) -> Vec3<F> {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

// Point + Vec3 = Point
impl<F: Float> Add<Vec3<F>> for Point3<F> {
    type Output = Self;

    #[inline]
    fn add(self, v: Vec3<F>) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

// Point - Vec3 = Point
impl<F: Float> Sub<Vec3<F>> for Point3<F> {
    type Output = Self;

    #[inline]
    fn sub(self, v: Vec3<F>) -> Self {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<F: Float> Default for Point3<F> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<F: Float> From<Vec3<F>> for Point3<F> {
    fn from(v: Vec3<F>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a: Point3<f64> = Point3::origin();
        let b = Point3::new(2.0, 3.0, 6.0);
        assert_eq!(a.distance_squared(b), 49.0);
        assert_eq!(a.distance(b), 7.0);
    }

    #[test]
    fn test_lerp_and_midpoint() {
        let a: Point3<f64> = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 20.0, 30.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.midpoint(b), Point3::new(5.0, 10.0, 15.0));
    }

    #[test]
    fn test_centroid() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 4.0),
        ];
        assert_eq!(Point3::centroid(&points), Some(Point3::new(1.0, 1.0, 1.0)));
        assert_eq!(Point3::<f64>::centroid(&[]), None);
    }

    #[test]
    fn test_point_vector_arithmetic() {
        let p: Point3<f64> = Point3::new(1.0, 2.0, 3.0);
        let v = Vec3::new(3.0, 4.0, 5.0);
        assert_eq!(p + v, Point3::new(4.0, 6.0, 8.0));
        assert_eq!((p + v) - v, p);
        assert_eq!(Point3::new(4.0, 6.0, 9.0) - p, Vec3::new(3.0, 4.0, 6.0));
    }

    #[test]
    fn test_array_round_trip() {
        let p: Point3<f64> = Point3::from_array([1.0, -2.0, 0.5]);
        assert_eq!(p.to_array(), [1.0, -2.0, 0.5]);
    }
}
