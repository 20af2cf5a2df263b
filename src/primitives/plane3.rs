//! Oriented plane with an in-plane frame.

use super::{Point3, Vec3};
use crate::error::{SplineError, SplineResult};
use crate::tolerance::{are_collinear, epsilon};
use num_traits::Float;

/// A plane given by an origin and a right-handed orthonormal frame.
///
/// `normal == x_axis × y_axis`. The frame gives arcs and circles a place to
/// measure angles from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3<F> {
    pub origin: Point3<F>,
    pub x_axis: Vec3<F>,
    pub y_axis: Vec3<F>,
    pub normal: Vec3<F>,
}

impl<F: Float> Plane3<F> {
    /// Creates a plane through `origin` facing `normal`, choosing an x axis.
    pub fn new(origin: Point3<F>, normal: Vec3<F>) -> SplineResult<Self> {
        let normal = normal.unitize()?;
        let x_axis = normal.perpendicular().unitize()?;
        let y_axis = normal.cross(x_axis);
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            normal,
        })
    }

    /// Creates a plane from an origin and two in-plane directions.
    ///
    /// `y_direction` only needs to be non-parallel to `x_axis`; it is
    /// re-orthogonalized.
    pub fn from_frame(
        origin: Point3<F>,
        x_axis: Vec3<F>,
        y_direction: Vec3<F>,
    ) -> SplineResult<Self> {
        let x_axis = x_axis.unitize()?;
        let normal = x_axis.cross(y_direction).unitize()?;
        let y_axis = normal.cross(x_axis);
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            normal,
        })
    }

    /// Creates the plane through three points, with `a` as origin and the x
    /// axis pointing at `b`.
    pub fn from_points(a: Point3<F>, b: Point3<F>, c: Point3<F>) -> SplineResult<Self> {
        if are_collinear(a, b, c, epsilon()) {
            return Err(SplineError::CollinearPoints);
        }
        Self::from_frame(a, b - a, c - a)
    }

    /// The XY plane through the origin.
    pub fn world_xy() -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Vec3::unit_x(),
            y_axis: Vec3::unit_y(),
            normal: Vec3::unit_z(),
        }
    }

    /// Signed distance from the plane, positive on the side the normal points to.
    #[inline]
    pub fn signed_distance(&self, p: Point3<F>) -> F {
        (p - self.origin).dot(self.normal)
    }

    /// Orthogonal projection of `p` onto the plane.
    #[inline]
    pub fn closest_point(&self, p: Point3<F>) -> Point3<F> {
        p - self.normal * self.signed_distance(p)
    }

    /// Coordinates of the projection of `p` in the plane frame.
    #[inline]
    pub fn closest_parameters(&self, p: Point3<F>) -> (F, F) {
        let d = p - self.origin;
        (d.dot(self.x_axis), d.dot(self.y_axis))
    }

    /// The point at frame coordinates `(u, v)`.
    #[inline]
    pub fn point_at(&self, u: F, v: F) -> Point3<F> {
        self.origin + self.x_axis * u + self.y_axis * v
    }
}
