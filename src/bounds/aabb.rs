//! Axis-aligned bounding box.

use crate::primitives::{Plane3, Point3, Vec3};
use num_traits::Float;

/// A 3D axis-aligned bounding box.
///
/// Defined by minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3<F> {
    /// Minimum corner (smallest x, y and z values).
    pub min: Point3<F>,
    /// Maximum corner (largest x, y and z values).
    pub max: Point3<F>,
}

impl<F: Float> Aabb3<F> {
    /// Creates a new AABB from min and max corners.
    ///
    /// Does not validate that min <= max.
    #[inline]
    pub fn new(min: Point3<F>, max: Point3<F>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_point(p: Point3<F>) -> Self {
        Self { min: p, max: p }
    }

    /// Creates an AABB from an iterator of points.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<F>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |aabb, p| aabb.expand_to_include(p)))
    }

    /// Returns the extent along each axis.
    #[inline]
    pub fn size(self) -> Vec3<F> {
        self.max - self.min
    }

    #[inline]
    pub fn center(self) -> Point3<F> {
        self.min.midpoint(self.max)
    }

    /// Length of the box diagonal.
    #[inline]
    pub fn diagonal(self) -> F {
        self.size().magnitude()
    }

    /// Returns a new AABB expanded to include the given point.
    #[inline]
    pub fn expand_to_include(self, p: Point3<F>) -> Self {
        Self {
            min: Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    /// Returns the union of two AABBs (smallest AABB containing both).
    #[inline]
    pub fn union(self, other: Self) -> Self {
        self.expand_to_include(other.min).expand_to_include(other.max)
    }

    /// Grows the box by `amount` on every side.
    #[inline]
    pub fn inflate(self, amount: F) -> Self {
        let d = Vec3::new(amount, amount, amount);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    #[inline]
    pub fn contains_point(self, p: Point3<F>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns `true` if this AABB intersects another AABB.
    ///
    /// Touching boxes count as intersecting.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Like [`Aabb3::intersects`] with both boxes grown by `tolerance`.
    #[inline]
    pub fn intersects_within(self, other: Self, tolerance: F) -> bool {
        self.inflate(tolerance).intersects(other)
    }

    /// The eight corner points.
    pub fn corners(self) -> [Point3<F>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Returns `true` if the plane passes within `tolerance` of the box.
    pub fn straddles_plane(self, plane: &Plane3<F>, tolerance: F) -> bool {
        let mut lo = F::infinity();
        let mut hi = F::neg_infinity();
        for c in self.corners() {
            let d = plane.signed_distance(c);
            lo = lo.min(d);
            hi = hi.max(d);
        }
        lo <= tolerance && hi >= -tolerance
    }
}
