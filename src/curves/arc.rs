//! Circular arcs in 3D.
//!
//! An arc lives in a [`Plane3`]: its center is the plane origin and angles
//! are measured counter-clockwise around the plane normal, starting at the
//! plane's x axis.
//!
//! # Example
//!
//! ```
//! use splinekit::curves::Arc3;
//! use splinekit::Point3;
//!
//! let arc = Arc3::from_three_points(
//!     Point3::new(1.0_f64, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(-1.0, 0.0, 0.0),
//! )
//! .unwrap();
//!
//! assert!((arc.radius - 1.0).abs() < 1e-12);
//! assert!((arc.length() - std::f64::consts::PI).abs() < 1e-12);
//! ```

use crate::error::{SplineError, SplineResult};
use crate::nurbs::NurbsCurve;
use crate::primitives::{Plane3, Point3, Vec3};
use crate::tolerance::{are_collinear, cast, epsilon, from_usize};
use num_traits::Float;

/// A circular arc parameterized over `[0, 1]` by angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc3<F> {
    /// Plane of the arc, with the circle's center as origin.
    pub plane: Plane3<F>,
    pub radius: F,
    /// Start angle in radians.
    pub start_angle: F,
    /// End angle in radians, greater than the start angle.
    pub end_angle: F,
}

impl<F: Float> Arc3<F> {
    /// Creates an arc, rejecting a non-positive radius and sweeps outside
    /// `(0, 2π]`.
    pub fn new(plane: Plane3<F>, radius: F, start_angle: F, end_angle: F) -> SplineResult<Self> {
        let sweep = end_angle - start_angle;
        let tau: F = cast(std::f64::consts::TAU);
        if !(radius > epsilon()) || !(sweep > epsilon()) || sweep > tau + epsilon() {
            return Err(SplineError::DegenerateInput);
        }
        Ok(Self {
            plane,
            radius,
            start_angle,
            end_angle,
        })
    }

    /// A full circle.
    pub fn circle(plane: Plane3<F>, radius: F) -> SplineResult<Self> {
        Self::new(plane, radius, F::zero(), cast(std::f64::consts::TAU))
    }

    /// Creates the arc that starts at `a`, passes through `b` and ends at `c`.
    ///
    /// Returns [`SplineError::CollinearPoints`] if the points lie on a line.
    pub fn from_three_points(a: Point3<F>, b: Point3<F>, c: Point3<F>) -> SplineResult<Self> {
        if are_collinear(a, b, c, epsilon()) {
            return Err(SplineError::CollinearPoints);
        }

        let u = b - a;
        let v = c - a;
        let w = u.cross(v);
        let two = F::one() + F::one();
        let offset = (v.cross(w) * u.magnitude_squared() + w.cross(u) * v.magnitude_squared())
            / (two * w.magnitude_squared());
        let center = a + offset;
        let radius = center.distance(a);

        let plane = Plane3::from_frame(center, a - center, w.cross(a - center))?;
        let (x, y) = plane.closest_parameters(c);
        let mut end_angle = y.atan2(x);
        if end_angle <= F::zero() {
            end_angle = end_angle + cast(std::f64::consts::TAU);
        }
        Self::new(plane, radius, F::zero(), end_angle)
    }

    #[inline]
    pub fn center(&self) -> Point3<F> {
        self.plane.origin
    }

    #[inline]
    pub fn sweep_angle(&self) -> F {
        self.end_angle - self.start_angle
    }

    #[inline]
    pub fn length(&self) -> F {
        self.radius * self.sweep_angle()
    }

    /// Returns the point at `angle` on the arc's circle.
    pub fn point_at_angle(&self, angle: F) -> Point3<F> {
        self.plane
            .point_at(self.radius * angle.cos(), self.radius * angle.sin())
    }

    /// Returns the point at `t` in `[0, 1]`, proportional to angle.
    pub fn point_at(&self, t: F) -> Point3<F> {
        self.point_at_angle(self.angle_at(t))
    }

    /// Unit tangent at `t`, pointing in the direction of travel.
    pub fn tangent_at(&self, t: F) -> Vec3<F> {
        let angle = self.angle_at(t);
        self.plane.x_axis * -angle.sin() + self.plane.y_axis * angle.cos()
    }

    pub fn start_point(&self) -> Point3<F> {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_point(&self) -> Point3<F> {
        self.point_at_angle(self.end_angle)
    }

    pub fn is_full_circle(&self) -> bool {
        (self.sweep_angle() - cast(std::f64::consts::TAU)).abs() <= epsilon()
    }

    /// Parameter in `[0, 1]` of the arc point nearest to `p`.
    ///
    /// Points on the axis of the circle are equidistant from every arc point
    /// and map to the start.
    pub fn closest_parameter(&self, p: Point3<F>) -> F {
        let (x, y) = self.plane.closest_parameters(p);
        if x.hypot(y) <= epsilon() {
            return F::zero();
        }
        let tau: F = cast(std::f64::consts::TAU);
        let mut offset = (y.atan2(x) - self.start_angle) % tau;
        if offset < F::zero() {
            offset = offset + tau;
        }
        let sweep = self.sweep_angle();
        if offset <= sweep {
            return offset / sweep;
        }
        // Outside the arc: whichever end is angularly closer.
        if offset - sweep < tau - offset {
            F::one()
        } else {
            F::zero()
        }
    }

    pub fn closest_point(&self, p: Point3<F>) -> Point3<F> {
        self.point_at(self.closest_parameter(p))
    }

    /// Converts the arc to an exact rational quadratic NURBS on `[0, 1]`.
    ///
    /// Arcs are split into segments of at most 90 degrees; each segment
    /// contributes a middle control point on the tangent lines with weight
    /// `cos(segment / 2)`.
    pub fn to_nurbs(&self) -> SplineResult<NurbsCurve<F>> {
        let sweep = self.sweep_angle();
        let half_pi: F = cast(std::f64::consts::FRAC_PI_2);
        let num_segments = (sweep / half_pi - epsilon()).ceil().to_usize().unwrap_or(1).max(1);
        let segment_angle = sweep / from_usize(num_segments);
        let half_segment = segment_angle / (F::one() + F::one());
        let w = half_segment.cos();

        let mut control_points = vec![self.start_point()];
        let mut weights = vec![F::one()];
        for seg in 0..num_segments {
            let seg_start = self.start_angle + from_usize::<F>(seg) * segment_angle;
            let seg_mid = seg_start + half_segment;
            let tan_len = self.radius / w;
            control_points.push(
                self.plane
                    .point_at(tan_len * seg_mid.cos(), tan_len * seg_mid.sin()),
            );
            weights.push(w);
            control_points.push(self.point_at_angle(seg_start + segment_angle));
            weights.push(F::one());
        }

        // Clamped knots: [0,0,0, 1,1, 2,2, ..., n,n,n] / n
        let mut knots = vec![F::zero(); 3];
        for i in 1..num_segments {
            let k = from_usize::<F>(i) / from_usize(num_segments);
            knots.push(k);
            knots.push(k);
        }
        knots.extend([F::one(); 3]);

        NurbsCurve::new(2, knots, control_points, Some(weights))
    }

    fn angle_at(&self, t: F) -> F {
        self.start_angle + t * self.sweep_angle()
    }
}
