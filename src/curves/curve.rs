//! A common interface over the curve kinds the crate knows about.

use super::Arc3;
use crate::error::SplineResult;
use crate::nurbs::{clamp_to_domain, NurbsCurve};
use crate::primitives::{Line3, Point3, Transform3, Vec3};
use num_traits::Float;

/// A curve parameterized over a closed interval.
///
/// Parameters outside the domain follow the same rule everywhere: values
/// within `EPSILON` are clamped onto it, anything further out is rejected.
pub trait Parametric<F: Float> {
    /// Returns the valid parameter range `[t_min, t_max]`.
    fn domain(&self) -> (F, F);

    fn point_at(&self, t: F) -> SplineResult<Point3<F>>;

    /// Unit tangent at `t`.
    fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>>;

    fn length(&self) -> SplineResult<F>;

    /// The point on the curve nearest to `p`.
    fn closest_point(&self, p: Point3<F>) -> SplineResult<Point3<F>>;

    fn start_point(&self) -> SplineResult<Point3<F>> {
        self.point_at(self.domain().0)
    }

    fn end_point(&self) -> SplineResult<Point3<F>> {
        self.point_at(self.domain().1)
    }
}

impl<F: Float> Parametric<F> for Line3<F> {
    fn domain(&self) -> (F, F) {
        (F::zero(), F::one())
    }

    fn point_at(&self, t: F) -> SplineResult<Point3<F>> {
        let t = clamp_to_domain(t, Parametric::domain(self))?;
        Ok(Line3::point_at(self, t))
    }

    fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>> {
        clamp_to_domain(t, Parametric::domain(self))?;
        self.direction().unitize()
    }

    fn length(&self) -> SplineResult<F> {
        Ok(Line3::length(self))
    }

    fn closest_point(&self, p: Point3<F>) -> SplineResult<Point3<F>> {
        Ok(Line3::closest_point(self, p))
    }
}

impl<F: Float> Parametric<F> for Arc3<F> {
    fn domain(&self) -> (F, F) {
        (F::zero(), F::one())
    }

    fn point_at(&self, t: F) -> SplineResult<Point3<F>> {
        let t = clamp_to_domain(t, Parametric::domain(self))?;
        Ok(Arc3::point_at(self, t))
    }

    fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>> {
        let t = clamp_to_domain(t, Parametric::domain(self))?;
        Ok(Arc3::tangent_at(self, t))
    }

    fn length(&self) -> SplineResult<F> {
        Ok(Arc3::length(self))
    }

    fn closest_point(&self, p: Point3<F>) -> SplineResult<Point3<F>> {
        Ok(Arc3::closest_point(self, p))
    }
}

impl<F: Float> Parametric<F> for NurbsCurve<F> {
    fn domain(&self) -> (F, F) {
        NurbsCurve::domain(self)
    }

    fn point_at(&self, t: F) -> SplineResult<Point3<F>> {
        NurbsCurve::point_at(self, t)
    }

    fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>> {
        NurbsCurve::tangent_at(self, t)
    }

    fn length(&self) -> SplineResult<F> {
        NurbsCurve::length(self)
    }

    fn closest_point(&self, p: Point3<F>) -> SplineResult<Point3<F>> {
        NurbsCurve::closest_point(self, p)
    }
}

/// Any single curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve<F> {
    Line(Line3<F>),
    Arc(Arc3<F>),
    Nurbs(NurbsCurve<F>),
}

impl<F: Float> Curve<F> {
    /// Converts the curve to an equivalent NURBS with the same
    /// parameterization.
    pub fn to_nurbs(&self) -> SplineResult<NurbsCurve<F>> {
        match self {
            Curve::Line(line) => line.to_nurbs(),
            Curve::Arc(arc) => arc.to_nurbs(),
            Curve::Nurbs(curve) => Ok(curve.clone()),
        }
    }

    /// Applies `transform` to the curve.
    ///
    /// Lines and NURBS keep their kind. Arcs only stay arcs under rigid
    /// motion, so they are converted to NURBS first.
    pub fn transform(&self, transform: &Transform3<F>) -> SplineResult<Self> {
        Ok(match self {
            Curve::Line(line) => Curve::Line(Line3 {
                start: transform.apply_point(line.start),
                end: transform.apply_point(line.end),
            }),
            Curve::Arc(arc) => Curve::Nurbs(arc.to_nurbs()?.transform(transform)),
            Curve::Nurbs(curve) => Curve::Nurbs(curve.transform(transform)),
        })
    }

    /// The same curve traversed the other way, over the same domain.
    pub fn reverse(&self) -> SplineResult<Self> {
        Ok(match self {
            Curve::Line(line) => Curve::Line(line.reversed()),
            Curve::Arc(arc) => Curve::Nurbs(arc.to_nurbs()?.reverse()),
            Curve::Nurbs(curve) => Curve::Nurbs(curve.reverse()),
        })
    }
}

impl<F: Float> Parametric<F> for Curve<F> {
    fn domain(&self) -> (F, F) {
        match self {
            Curve::Line(line) => Parametric::domain(line),
            Curve::Arc(arc) => Parametric::domain(arc),
            Curve::Nurbs(curve) => NurbsCurve::domain(curve),
        }
    }

    fn point_at(&self, t: F) -> SplineResult<Point3<F>> {
        match self {
            Curve::Line(line) => Parametric::point_at(line, t),
            Curve::Arc(arc) => Parametric::point_at(arc, t),
            Curve::Nurbs(curve) => curve.point_at(t),
        }
    }

    fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>> {
        match self {
            Curve::Line(line) => Parametric::tangent_at(line, t),
            Curve::Arc(arc) => Parametric::tangent_at(arc, t),
            Curve::Nurbs(curve) => curve.tangent_at(t),
        }
    }

    fn length(&self) -> SplineResult<F> {
        match self {
            Curve::Line(line) => Ok(line.length()),
            Curve::Arc(arc) => Ok(arc.length()),
            Curve::Nurbs(curve) => curve.length(),
        }
    }

    fn closest_point(&self, p: Point3<F>) -> SplineResult<Point3<F>> {
        match self {
            Curve::Line(line) => Ok(line.closest_point(p)),
            Curve::Arc(arc) => Ok(arc.closest_point(p)),
            Curve::Nurbs(curve) => curve.closest_point(p),
        }
    }
}

impl<F> From<Line3<F>> for Curve<F> {
    fn from(line: Line3<F>) -> Self {
        Curve::Line(line)
    }
}

impl<F> From<Arc3<F>> for Curve<F> {
    fn from(arc: Arc3<F>) -> Self {
        Curve::Arc(arc)
    }
}

impl<F> From<NurbsCurve<F>> for Curve<F> {
    fn from(curve: NurbsCurve<F>) -> Self {
        Curve::Nurbs(curve)
    }
}
