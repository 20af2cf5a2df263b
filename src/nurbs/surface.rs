//! Tensor-product NURBS surfaces.

use super::basis::basis_functions;
use super::curve::clamp_to_domain;
use super::evaluate::{rational_surface_derivatives, surface_point_at};
use super::homogeneous::{dehomogenize_2d, homogenize_2d, weight_2d};
use super::NurbsCurve;
use crate::bounds::Aabb3;
use crate::error::{SplineError, SplineResult};
use crate::knots::KnotVector;
use crate::primitives::{Point3, Point4, Transform3, Vec3};
use crate::tolerance::epsilon;
use num_traits::Float;

/// A NURBS surface.
///
/// The control grid is stored as rows along U, each row holding the points
/// along V: `control_points[i][j]` pairs with the `i`-th U basis function and
/// the `j`-th V basis function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "SurfaceData<F>",
        into = "SurfaceData<F>",
        bound(
            serialize = "F: Float + serde::Serialize",
            deserialize = "F: Float + serde::Deserialize<'de>"
        )
    )
)]
pub struct NurbsSurface<F> {
    degree_u: usize,
    degree_v: usize,
    knots_u: KnotVector<F>,
    knots_v: KnotVector<F>,
    control_points: Vec<Vec<Point4<F>>>,
}

impl<F: Float> NurbsSurface<F> {
    /// Creates a surface from a grid of Euclidean points and optional weights.
    ///
    /// Both directions are validated like a curve; every row must have the
    /// same length.
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<F>,
        knots_v: Vec<F>,
        control_points: Vec<Vec<Point3<F>>>,
        weights: Option<Vec<Vec<F>>>,
    ) -> SplineResult<Self> {
        let points = homogenize_2d(&control_points, weights.as_deref())?;
        Self::from_homogeneous(
            degree_u,
            degree_v,
            KnotVector::new(knots_u),
            KnotVector::new(knots_v),
            points,
        )
    }

    /// Creates a surface from a grid of homogeneous points.
    pub fn from_homogeneous(
        degree_u: usize,
        degree_v: usize,
        knots_u: KnotVector<F>,
        knots_v: KnotVector<F>,
        control_points: Vec<Vec<Point4<F>>>,
    ) -> SplineResult<Self> {
        for degree in [degree_u, degree_v] {
            if degree < 1 {
                return Err(SplineError::InvalidDegree { degree });
            }
        }

        let rows = control_points.len();
        let cols = control_points.first().map_or(0, Vec::len);
        if let Some(row) = control_points.iter().find(|row| row.len() != cols) {
            return Err(SplineError::LengthMismatch {
                expected: cols,
                found: row.len(),
            });
        }
        if rows <= degree_u {
            return Err(SplineError::TooFewPoints {
                required: degree_u + 1,
                found: rows,
            });
        }
        if cols <= degree_v {
            return Err(SplineError::TooFewPoints {
                required: degree_v + 1,
                found: cols,
            });
        }

        for (index, p) in control_points.iter().flatten().enumerate() {
            if !(p.w > F::zero() && p.w.is_finite()) {
                return Err(SplineError::InvalidWeight { index });
            }
        }
        if control_points
            .iter()
            .flatten()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(SplineError::NonFinite);
        }

        let eps = epsilon::<F>();
        for (knots, degree, count) in [(&knots_u, degree_u, rows), (&knots_v, degree_v, cols)] {
            if !knots.are_valid(degree, count) || knots.domain() <= eps {
                return Err(SplineError::InvalidKnots {
                    degree,
                    control_points: count,
                });
            }
        }

        Ok(Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            control_points,
        })
    }

    #[inline]
    pub fn degree_u(&self) -> usize {
        self.degree_u
    }

    #[inline]
    pub fn degree_v(&self) -> usize {
        self.degree_v
    }

    #[inline]
    pub fn knots_u(&self) -> &KnotVector<F> {
        &self.knots_u
    }

    #[inline]
    pub fn knots_v(&self) -> &KnotVector<F> {
        &self.knots_v
    }

    #[inline]
    pub fn homogeneous_points(&self) -> &[Vec<Point4<F>>] {
        &self.control_points
    }

    pub fn control_points(&self) -> Vec<Vec<Point3<F>>> {
        dehomogenize_2d(&self.control_points).unwrap_or_else(|_| {
            self.control_points
                .iter()
                .map(|row| row.iter().map(|p| p.projected()).collect())
                .collect()
        })
    }

    pub fn weights(&self) -> Vec<Vec<F>> {
        weight_2d(&self.control_points)
    }

    pub fn domain_u(&self) -> (F, F) {
        (self.knots_u.first_value(), self.knots_u.last_value())
    }

    pub fn domain_v(&self) -> (F, F) {
        (self.knots_v.first_value(), self.knots_v.last_value())
    }

    /// Maps `(u, v)` onto the domain, clamping within `EPSILON` and
    /// rejecting anything further out.
    pub fn check_parameters(&self, u: F, v: F) -> SplineResult<(F, F)> {
        Ok((
            clamp_to_domain(u, self.domain_u())?,
            clamp_to_domain(v, self.domain_v())?,
        ))
    }

    pub fn point_at(&self, u: F, v: F) -> SplineResult<Point3<F>> {
        surface_point_at(self, u, v)
    }

    /// Mixed partial derivatives up to total `order`; see
    /// [`rational_surface_derivatives`].
    pub fn derivatives(&self, u: F, v: F, order: usize) -> SplineResult<Vec<Vec<Vec3<F>>>> {
        rational_surface_derivatives(self, u, v, order)
    }

    /// Returns the unit normal `Su × Sv` at `(u, v)`.
    ///
    /// Fails with [`SplineError::DegenerateInput`] where the partials are
    /// parallel or vanish, such as at a collapsed edge.
    pub fn normal_at(&self, u: F, v: F) -> SplineResult<Vec3<F>> {
        let ders = rational_surface_derivatives(self, u, v, 1)?;
        ders[1][0].cross(ders[0][1]).unitize()
    }

    /// Extracts the curve along U at fixed `v`.
    pub fn isocurve_u(&self, v: F) -> SplineResult<NurbsCurve<F>> {
        let v = clamp_to_domain(v, self.domain_v())?;
        let q = self.degree_v;
        let span = self.knots_v.span(q, v);
        let n = basis_functions(q, &self.knots_v, span, v);
        let points = self
            .control_points
            .iter()
            .map(|row| {
                n.iter()
                    .enumerate()
                    .fold(Point4::zero(), |acc, (l, &nl)| acc + row[span - q + l] * nl)
            })
            .collect();
        NurbsCurve::from_homogeneous(self.degree_u, self.knots_u.clone(), points)
    }

    /// Extracts the curve along V at fixed `u`.
    pub fn isocurve_v(&self, u: F) -> SplineResult<NurbsCurve<F>> {
        let u = clamp_to_domain(u, self.domain_u())?;
        let p = self.degree_u;
        let span = self.knots_u.span(p, u);
        let n = basis_functions(p, &self.knots_u, span, u);
        let cols = self.control_points[0].len();
        let points = (0..cols)
            .map(|j| {
                n.iter().enumerate().fold(Point4::zero(), |acc, (k, &nk)| {
                    acc + self.control_points[span - p + k][j] * nk
                })
            })
            .collect();
        NurbsCurve::from_homogeneous(self.degree_v, self.knots_v.clone(), points)
    }

    /// Applies an affine transform to the control points, keeping weights.
    pub fn transform(&self, transform: &Transform3<F>) -> Self {
        let control_points = self
            .control_points
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&p| {
                        let moved =
                            transform.apply_point(Point3::new(p.x / p.w, p.y / p.w, p.z / p.w));
                        Point4::homogenize(moved, p.w)
                    })
                    .collect()
            })
            .collect();
        Self {
            degree_u: self.degree_u,
            degree_v: self.degree_v,
            knots_u: self.knots_u.clone(),
            knots_v: self.knots_v.clone(),
            control_points,
        }
    }

    /// Bounding box of the control grid, which contains the surface.
    pub fn control_bounds(&self) -> Aabb3<F> {
        let points = self.control_points();
        let first = Aabb3::from_point(points[0][0]);
        points
            .iter()
            .flatten()
            .fold(first, |bounds, &p| bounds.expand_to_include(p))
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurfaceData<F> {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<F>,
    knots_v: Vec<F>,
    control_points: Vec<Vec<Point3<F>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<Vec<Vec<F>>>,
}

#[cfg(feature = "serde")]
impl<F: Float> TryFrom<SurfaceData<F>> for NurbsSurface<F> {
    type Error = SplineError;

    fn try_from(data: SurfaceData<F>) -> SplineResult<Self> {
        Self::new(
            data.degree_u,
            data.degree_v,
            data.knots_u,
            data.knots_v,
            data.control_points,
            data.weights,
        )
    }
}

#[cfg(feature = "serde")]
impl<F: Float> From<NurbsSurface<F>> for SurfaceData<F> {
    fn from(surface: NurbsSurface<F>) -> Self {
        let weights = surface.weights();
        let first = weights[0][0];
        let rational = weights
            .iter()
            .flatten()
            .any(|&w| (w - first).abs() > epsilon());
        Self {
            degree_u: surface.degree_u,
            degree_v: surface.degree_v,
            control_points: surface.control_points(),
            knots_u: surface.knots_u.into_vec(),
            knots_v: surface.knots_v.into_vec(),
            weights: rational.then_some(weights),
        }
    }
}
