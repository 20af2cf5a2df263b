//! NURBS (Non-Uniform Rational B-Spline) curves.
//!
//! A curve is a degree, a clamped knot vector and a list of homogeneous
//! control points. Curves are immutable values: every modifying operation
//! (refinement, splitting, reversal, transformation, degree elevation)
//! returns a new curve.
//!
//! # Example
//!
//! ```
//! use splinekit::nurbs::NurbsCurve;
//! use splinekit::Point3;
//!
//! // A quarter of the unit circle as a rational quadratic.
//! let curve: NurbsCurve<f64> = NurbsCurve::new(
//!     2,
//!     vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
//!     vec![
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     Some(vec![1.0, 1.0, 2.0]),
//! )
//! .unwrap();
//!
//! let p = curve.point_at(0.5).unwrap();
//! assert!((p.to_vec().magnitude() - 1.0).abs() < 1e-12);
//! ```

use super::evaluate::{curve_point_at, rational_curve_derivatives};
use super::homogeneous::{dehomogenize_1d, homogenize_1d, weight_1d};
use super::{analyze, elevate, refine};
use crate::bounds::Aabb3;
use crate::error::{SplineError, SplineResult};
use crate::knots::KnotVector;
use crate::primitives::{Point3, Point4, Transform3, Vec3};
use crate::tolerance::epsilon;
use num_traits::Float;

/// A NURBS curve in 3D.
///
/// Weights live in the fourth component of the homogeneous control points.
/// A curve built through any public constructor satisfies
/// `knots.len() == control_points.len() + degree + 1` and has a valid,
/// clamped knot vector with a non-empty domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "CurveData<F>",
        into = "CurveData<F>",
        bound(
            serialize = "F: Float + serde::Serialize",
            deserialize = "F: Float + serde::Deserialize<'de>"
        )
    )
)]
pub struct NurbsCurve<F> {
    degree: usize,
    knots: KnotVector<F>,
    control_points: Vec<Point4<F>>,
}

impl<F: Float> NurbsCurve<F> {
    /// Creates a curve from Euclidean control points and optional weights.
    ///
    /// Missing weights default to one.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InvalidDegree`] if `degree == 0`
    /// - [`SplineError::TooFewPoints`] if there are at most `degree` points
    /// - [`SplineError::LengthMismatch`] if the weights don't match the points
    /// - [`SplineError::InvalidWeight`] for a non-positive weight
    /// - [`SplineError::InvalidKnots`] if the knot vector is not valid and clamped
    pub fn new(
        degree: usize,
        knots: Vec<F>,
        control_points: Vec<Point3<F>>,
        weights: Option<Vec<F>>,
    ) -> SplineResult<Self> {
        let points = homogenize_1d(&control_points, weights.as_deref())?;
        Self::from_homogeneous(degree, KnotVector::new(knots), points)
    }

    /// Creates a non-rational curve (all weights one).
    pub fn from_points(
        degree: usize,
        knots: Vec<F>,
        control_points: Vec<Point3<F>>,
    ) -> SplineResult<Self> {
        Self::new(degree, knots, control_points, None)
    }

    /// Creates a curve with a uniform clamped knot vector on `[0, 1]`.
    pub fn with_uniform_knots(
        degree: usize,
        control_points: Vec<Point3<F>>,
        weights: Option<Vec<F>>,
    ) -> SplineResult<Self> {
        let knots = KnotVector::uniform_clamped(degree, control_points.len())?;
        Self::new(degree, knots.into_vec(), control_points, weights)
    }

    /// Creates a curve from homogeneous control points.
    pub fn from_homogeneous(
        degree: usize,
        knots: KnotVector<F>,
        control_points: Vec<Point4<F>>,
    ) -> SplineResult<Self> {
        if degree < 1 {
            return Err(SplineError::InvalidDegree { degree });
        }
        if control_points.len() <= degree {
            return Err(SplineError::TooFewPoints {
                required: degree + 1,
                found: control_points.len(),
            });
        }
        if let Some(index) = control_points
            .iter()
            .position(|p| !(p.w > F::zero() && p.w.is_finite()))
        {
            return Err(SplineError::InvalidWeight { index });
        }
        if control_points
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(SplineError::NonFinite);
        }
        if !knots.are_valid(degree, control_points.len()) || knots.domain() <= epsilon() {
            return Err(SplineError::InvalidKnots {
                degree,
                control_points: control_points.len(),
            });
        }
        Ok(Self::from_parts(degree, knots, control_points))
    }

    /// Assembles a curve the caller has already validated.
    pub(crate) fn from_parts(
        degree: usize,
        knots: KnotVector<F>,
        control_points: Vec<Point4<F>>,
    ) -> Self {
        debug_assert_eq!(knots.len(), control_points.len() + degree + 1);
        Self {
            degree,
            knots,
            control_points,
        }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn knots(&self) -> &KnotVector<F> {
        &self.knots
    }

    /// The control points in homogeneous form.
    #[inline]
    pub fn homogeneous_points(&self) -> &[Point4<F>] {
        &self.control_points
    }

    /// The Euclidean control points.
    pub fn control_points(&self) -> Vec<Point3<F>> {
        // Weights are positive by construction, so dehomogenizing cannot fail.
        dehomogenize_1d(&self.control_points)
            .unwrap_or_else(|_| self.control_points.iter().map(|p| p.projected()).collect())
    }

    pub fn weights(&self) -> Vec<F> {
        weight_1d(&self.control_points)
    }

    /// Returns true if the weights are not all equal.
    pub fn is_rational(&self) -> bool {
        let first = self.control_points[0].w;
        self.control_points
            .iter()
            .any(|p| (p.w - first).abs() > epsilon())
    }

    /// Returns the valid parameter range `[t_min, t_max]`.
    #[inline]
    pub fn domain(&self) -> (F, F) {
        (self.knots.first_value(), self.knots.last_value())
    }

    /// Maps `t` onto the domain.
    ///
    /// Parameters within `EPSILON` of the domain are clamped onto it, anything
    /// further out is rejected with [`SplineError::ParameterOutOfDomain`].
    pub fn check_parameter(&self, t: F) -> SplineResult<F> {
        clamp_to_domain(t, self.domain())
    }

    /// Evaluates the curve at `t`.
    pub fn point_at(&self, t: F) -> SplineResult<Point3<F>> {
        curve_point_at(self, t)
    }

    /// Returns the curve point and its first `order` derivatives at `t`.
    pub fn derivatives(&self, t: F, order: usize) -> SplineResult<Vec<Vec3<F>>> {
        rational_curve_derivatives(self, t, order)
    }

    /// Returns the unit tangent at `t`.
    ///
    /// Fails with [`SplineError::DegenerateInput`] where the first derivative
    /// vanishes.
    pub fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>> {
        let ders = rational_curve_derivatives(self, t, 1)?;
        ders[1].unitize()
    }

    pub fn start_point(&self) -> SplineResult<Point3<F>> {
        self.point_at(self.domain().0)
    }

    pub fn end_point(&self) -> SplineResult<Point3<F>> {
        self.point_at(self.domain().1)
    }

    /// Returns the bounding box of the control points.
    ///
    /// The curve lies inside the convex hull of its control points, so this
    /// is a conservative bound.
    pub fn control_bounds(&self) -> Aabb3<F> {
        let points = self.control_points();
        let first = Aabb3::from_point(points[0]);
        points[1..]
            .iter()
            .fold(first, |bounds, &p| bounds.expand_to_include(p))
    }

    /// Returns the same curve traversed in the opposite direction.
    ///
    /// Reversal is involutive: reversing twice gives back the original curve.
    pub fn reverse(&self) -> Self {
        let mut points = self.control_points.clone();
        points.reverse();
        Self::from_parts(self.degree, self.knots.reverse(), points)
    }

    /// Applies an affine transform to the control points, keeping weights.
    pub fn transform(&self, transform: &Transform3<F>) -> Self {
        let points = self
            .control_points
            .iter()
            .map(|&p| {
                let w = p.w;
                let moved = transform.apply_point(Point3::new(p.x / w, p.y / w, p.z / w));
                Point4::homogenize(moved, w)
            })
            .collect();
        Self::from_parts(self.degree, self.knots.clone(), points)
    }

    /// Inserts the given knot values, returning an equivalent curve.
    ///
    /// See [`knot_refine`](crate::nurbs::knot_refine).
    pub fn knot_refine(&self, knots_to_insert: &[F]) -> SplineResult<Self> {
        refine::knot_refine(self, knots_to_insert)
    }

    /// Inserts `t` into the knot vector `times` times.
    pub fn knot_insert(&self, t: F, times: usize) -> SplineResult<Self> {
        refine::knot_refine(self, &vec![t; times])
    }

    /// Splits the curve at `t` into two curves that meet at `C(t)`.
    ///
    /// See [`split`](crate::nurbs::split).
    pub fn split(&self, t: F) -> SplineResult<(Self, Self)> {
        refine::split(self, t)
    }

    /// Decomposes the curve into its Bézier segments.
    pub fn decompose_into_beziers(&self) -> SplineResult<Vec<Self>> {
        refine::decompose_into_beziers(self)
    }

    /// Raises the degree by `times` without changing the curve's shape.
    pub fn elevate_degree(&self, times: usize) -> Self {
        elevate::elevate_degree(self, times)
    }

    /// Returns the arc length of the whole curve.
    pub fn length(&self) -> SplineResult<F> {
        analyze::length(self)
    }

    /// Returns the arc length from the start of the domain to `t`.
    pub fn length_at(&self, t: F) -> SplineResult<F> {
        analyze::length_at(self, t)
    }

    /// Returns the parameter at which the arc length from the start equals `length`.
    pub fn parameter_at_length(&self, length: F) -> SplineResult<F> {
        analyze::parameter_at_length(self, length)
    }

    /// Returns the first parameter after `t0` at straight-line distance
    /// `chord` from `C(t0)`.
    pub fn parameter_at_chord_length(&self, t0: F, chord: F) -> SplineResult<F> {
        analyze::parameter_at_chord_length(self, t0, chord)
    }

    /// Returns the parameter of the curve point closest to `point`.
    pub fn closest_parameter(&self, point: Point3<F>) -> SplineResult<F> {
        analyze::closest_parameter(self, point)
    }

    /// Returns the curve point closest to `point`.
    pub fn closest_point(&self, point: Point3<F>) -> SplineResult<Point3<F>> {
        let t = self.closest_parameter(point)?;
        self.point_at(t)
    }

    /// Returns `count + 1` parameters dividing the curve into `count`
    /// pieces of equal arc length.
    pub fn divide_by_count(&self, count: usize) -> SplineResult<Vec<F>> {
        analyze::divide_by_count(self, count)
    }

    /// Converts the curve to a polyline using adaptive sampling.
    pub fn to_polyline(&self, tolerance: F) -> SplineResult<Vec<Point3<F>>> {
        let (t_min, t_max) = self.domain();
        let mut points = vec![self.point_at(t_min)?];

        // Sample every knot span separately so interior kinks are hit exactly.
        let mut spans: Vec<F> = vec![t_min];
        spans.extend(self.knots.distinct_interior());
        spans.push(t_max);
        for pair in spans.windows(2) {
            self.subdivide_recursive(pair[0], pair[1], tolerance, 0, &mut points)?;
        }
        Ok(points)
    }

    fn subdivide_recursive(
        &self,
        t0: F,
        t1: F,
        tolerance: F,
        depth: usize,
        points: &mut Vec<Point3<F>>,
    ) -> SplineResult<()> {
        let two = F::one() + F::one();
        let t_mid = (t0 + t1) / two;

        let p0 = self.point_at(t0)?;
        let p1 = self.point_at(t1)?;
        let p_mid = self.point_at(t_mid)?;

        let deviation = p_mid.distance(p0.midpoint(p1));

        // A degree > 1 span always bulges at its midpoint once, so recurse
        // at least one level before trusting the chord test.
        if (depth > 0 && deviation <= tolerance) || depth >= MAX_POLYLINE_DEPTH {
            points.push(p1);
        } else {
            self.subdivide_recursive(t0, t_mid, tolerance, depth + 1, points)?;
            self.subdivide_recursive(t_mid, t1, tolerance, depth + 1, points)?;
        }
        Ok(())
    }

    /// Returns true if both curves have the same degree and their knots and
    /// homogeneous control points agree within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: F) -> bool {
        self.degree == other.degree
            && self.knots.len() == other.knots.len()
            && self.control_points.len() == other.control_points.len()
            && self
                .knots
                .iter()
                .zip(other.knots.iter())
                .all(|(a, b)| (*a - *b).abs() <= tolerance)
            && self
                .control_points
                .iter()
                .zip(&other.control_points)
                .all(|(a, b)| {
                    (a.x - b.x).abs() <= tolerance
                        && (a.y - b.y).abs() <= tolerance
                        && (a.z - b.z).abs() <= tolerance
                        && (a.w - b.w).abs() <= tolerance
                })
    }
}

const MAX_POLYLINE_DEPTH: usize = 16;

/// Clamps `t` onto `domain` within `EPSILON`, rejecting values further out.
pub(crate) fn clamp_to_domain<F: Float>(t: F, domain: (F, F)) -> SplineResult<F> {
    if !t.is_finite() {
        return Err(SplineError::NonFinite);
    }
    let eps = epsilon();
    let (lo, hi) = domain;
    if t < lo - eps || t > hi + eps {
        return Err(SplineError::ParameterOutOfDomain);
    }
    Ok(t.max(lo).min(hi))
}

/// Serialized form of a curve: Euclidean control points with weights.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurveData<F> {
    degree: usize,
    knots: Vec<F>,
    control_points: Vec<Point3<F>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<Vec<F>>,
}

#[cfg(feature = "serde")]
impl<F: Float> TryFrom<CurveData<F>> for NurbsCurve<F> {
    type Error = SplineError;

    fn try_from(data: CurveData<F>) -> SplineResult<Self> {
        Self::new(data.degree, data.knots, data.control_points, data.weights)
    }
}

#[cfg(feature = "serde")]
impl<F: Float> From<NurbsCurve<F>> for CurveData<F> {
    fn from(curve: NurbsCurve<F>) -> Self {
        let weights = curve.is_rational().then(|| curve.weights());
        Self {
            degree: curve.degree,
            control_points: curve.control_points(),
            knots: curve.knots.into_vec(),
            weights,
        }
    }
}
