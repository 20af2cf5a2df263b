//! 3D line segment.

use super::{Point3, Vec3};
use crate::error::{SplineError, SplineResult};
use crate::nurbs::NurbsCurve;
use num_traits::Float;

/// A straight segment from `start` to `end`, parameterized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3<F> {
    pub start: Point3<F>,
    pub end: Point3<F>,
}

impl<F: Float> Line3<F> {
    /// Creates a segment, rejecting coincident endpoints.
    pub fn new(start: Point3<F>, end: Point3<F>) -> SplineResult<Self> {
        if start.distance(end) <= F::epsilon() {
            return Err(SplineError::DegenerateInput);
        }
        Ok(Self { start, end })
    }

    #[inline]
    pub fn direction(&self) -> Vec3<F> {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> F {
        self.direction().magnitude()
    }

    #[inline]
    pub fn point_at(&self, t: F) -> Point3<F> {
        self.start.lerp(self.end, t)
    }

    /// Unit direction of the segment.
    #[inline]
    pub fn tangent(&self) -> Vec3<F> {
        self.direction() / self.length()
    }

    /// Parameter of the point on the segment nearest to `p`, clamped to `[0, 1]`.
    pub fn closest_parameter(&self, p: Point3<F>) -> F {
        let d = self.direction();
        let t = (p - self.start).dot(d) / d.magnitude_squared();
        t.max(F::zero()).min(F::one())
    }

    pub fn closest_point(&self, p: Point3<F>) -> Point3<F> {
        self.point_at(self.closest_parameter(p))
    }

    /// The same segment traversed the other way.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// The segment as a degree-1 NURBS curve with the same `[0, 1]`
    /// parameterization.
    pub fn to_nurbs(&self) -> SplineResult<NurbsCurve<F>> {
        NurbsCurve::from_points(
            1,
            vec![F::zero(), F::zero(), F::one(), F::one()],
            vec![self.start, self.end],
        )
    }
}
