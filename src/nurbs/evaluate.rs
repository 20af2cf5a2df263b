//! Point and derivative evaluation for curves and surfaces.
//!
//! Evaluation always runs in homogeneous space: the knot span and basis
//! functions weight the homogeneous control points, and the rational result
//! is recovered afterwards by dehomogenizing (points) or by unrolling the
//! quotient rule (derivatives).

use super::basis::{basis_functions, binomial, derivative_basis_functions};
use super::{NurbsCurve, NurbsSurface};
use crate::error::{SplineError, SplineResult};
use crate::primitives::{Point3, Point4, Vec3};
use num_traits::Float;

/// Evaluates the curve point at `t`.
pub fn curve_point_at<F: Float>(curve: &NurbsCurve<F>, t: F) -> SplineResult<Point3<F>> {
    let t = curve.check_parameter(t)?;
    let p = curve.degree();
    let knots = curve.knots();
    let points = curve.homogeneous_points();

    let span = knots.span(p, t);
    let n = basis_functions(p, knots, span, t);

    let mut sum = Point4::zero();
    for (j, &nj) in n.iter().enumerate() {
        sum = sum + points[span - p + j] * nj;
    }
    sum.dehomogenize()
}

/// Derivatives of the homogeneous curve `A(t), w(t)` up to `order`.
///
/// Entry `k` is the `k`-th derivative; entries above the degree are zero.
pub fn curve_derivatives<F: Float>(
    curve: &NurbsCurve<F>,
    t: F,
    order: usize,
) -> SplineResult<Vec<Point4<F>>> {
    let t = curve.check_parameter(t)?;
    let p = curve.degree();
    let knots = curve.knots();
    let points = curve.homogeneous_points();

    let span = knots.span(p, t);
    let nders = derivative_basis_functions(span, t, p, order, knots);

    let mut ck = vec![Point4::zero(); order + 1];
    for (k, row) in nders.iter().enumerate().take(order.min(p) + 1) {
        for (j, &n) in row.iter().enumerate() {
            ck[k] = ck[k] + points[span - p + j] * n;
        }
    }
    Ok(ck)
}

/// Derivatives of the rational curve up to `order`.
///
/// Entry 0 is the curve point as a position vector, entry `k` the `k`-th
/// derivative. Applies
/// `C⁽ᵏ⁾ = (A⁽ᵏ⁾ − Σᵢ₌₁ᵏ C(k,i)·w⁽ⁱ⁾·C⁽ᵏ⁻ⁱ⁾) / w` from `k = 0` upward.
/// A vanishing weight function is reported as
/// [`SplineError::DegenerateInput`].
pub fn rational_curve_derivatives<F: Float>(
    curve: &NurbsCurve<F>,
    t: F,
    order: usize,
) -> SplineResult<Vec<Vec3<F>>> {
    let ders = curve_derivatives(curve, t, order)?;
    let w0 = ders[0].w;
    if w0.abs() <= F::epsilon() {
        return Err(SplineError::DegenerateInput);
    }

    let mut ck: Vec<Vec3<F>> = Vec::with_capacity(order + 1);
    for k in 0..=order {
        let mut v = ders[k].weighted();
        for i in 1..=k {
            v = v - ck[k - i] * (binomial::<F>(k, i) * ders[i].w);
        }
        ck.push(v / w0);
    }

    if ck.iter().all(|v| v.is_valid()) {
        Ok(ck)
    } else {
        Err(SplineError::NonFinite)
    }
}

/// Evaluates the surface point at `(u, v)`.
pub fn surface_point_at<F: Float>(
    surface: &NurbsSurface<F>,
    u: F,
    v: F,
) -> SplineResult<Point3<F>> {
    let (u, v) = surface.check_parameters(u, v)?;
    let (p, q) = (surface.degree_u(), surface.degree_v());
    let points = surface.homogeneous_points();

    let span_u = surface.knots_u().span(p, u);
    let span_v = surface.knots_v().span(q, v);
    let nu = basis_functions(p, surface.knots_u(), span_u, u);
    let nv = basis_functions(q, surface.knots_v(), span_v, v);

    let mut sum = Point4::zero();
    for (l, &nvl) in nv.iter().enumerate() {
        let mut temp = Point4::zero();
        for (k, &nuk) in nu.iter().enumerate() {
            temp = temp + points[span_u - p + k][span_v - q + l] * nuk;
        }
        sum = sum + temp * nvl;
    }
    sum.dehomogenize()
}

/// Mixed partial derivatives of the homogeneous surface.
///
/// Entry `[k][l]` is `∂ᵏ⁺ˡ S / ∂uᵏ ∂vˡ`, filled for `k + l <= order` and
/// zero elsewhere.
pub fn surface_derivatives<F: Float>(
    surface: &NurbsSurface<F>,
    u: F,
    v: F,
    order: usize,
) -> SplineResult<Vec<Vec<Point4<F>>>> {
    let (u, v) = surface.check_parameters(u, v)?;
    let (p, q) = (surface.degree_u(), surface.degree_v());
    let points = surface.homogeneous_points();

    let du = order.min(p);
    let dv = order.min(q);
    let span_u = surface.knots_u().span(p, u);
    let span_v = surface.knots_v().span(q, v);
    let nu = derivative_basis_functions(span_u, u, p, du, surface.knots_u());
    let nv = derivative_basis_functions(span_v, v, q, dv, surface.knots_v());

    let mut skl = vec![vec![Point4::zero(); order + 1]; order + 1];
    let mut temp = vec![Point4::zero(); q + 1];
    for k in 0..=du {
        for (s, slot) in temp.iter_mut().enumerate() {
            *slot = Point4::zero();
            for r in 0..=p {
                *slot = *slot + points[span_u - p + r][span_v - q + s] * nu[k][r];
            }
        }
        let dd = (order - k).min(dv);
        for l in 0..=dd {
            for (s, &ts) in temp.iter().enumerate() {
                skl[k][l] = skl[k][l] + ts * nv[l][s];
            }
        }
    }
    Ok(skl)
}

/// Mixed partial derivatives of the rational surface.
///
/// Entry `[0][0]` is the surface point; the bivariate quotient rule is
/// applied through a Leibniz double sum over the weight derivatives.
pub fn rational_surface_derivatives<F: Float>(
    surface: &NurbsSurface<F>,
    u: F,
    v: F,
    order: usize,
) -> SplineResult<Vec<Vec<Vec3<F>>>> {
    let ders = surface_derivatives(surface, u, v, order)?;
    let w00 = ders[0][0].w;
    if w00.abs() <= F::epsilon() {
        return Err(SplineError::DegenerateInput);
    }

    let mut skl = vec![vec![Vec3::zero(); order + 1]; order + 1];
    for k in 0..=order {
        for l in 0..=(order - k) {
            let mut tmp = ders[k][l].weighted();
            for j in 1..=l {
                tmp = tmp - skl[k][l - j] * (binomial::<F>(l, j) * ders[0][j].w);
            }
            for i in 1..=k {
                tmp = tmp - skl[k - i][l] * (binomial::<F>(k, i) * ders[i][0].w);
                let mut tmp2 = Vec3::zero();
                for j in 1..=l {
                    tmp2 = tmp2 + skl[k - i][l - j] * (binomial::<F>(l, j) * ders[i][j].w);
                }
                tmp = tmp - tmp2 * binomial::<F>(k, i);
            }
            skl[k][l] = tmp / w00;
        }
    }

    if skl.iter().flatten().all(|v| v.is_valid()) {
        Ok(skl)
    } else {
        Err(SplineError::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quadrant() -> NurbsCurve<f64> {
        NurbsCurve::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Some(vec![1.0, 1.0, 2.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_rational_derivatives_at_start() {
        let ders = rational_curve_derivatives(&quadrant(), 0.0, 2).unwrap();
        assert_eq!(ders.len(), 3);
        assert_relative_eq!(ders[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(ders[0].y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(ders[1].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(ders[1].y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(ders[2].x, -4.0, epsilon = 1e-12);
        assert_relative_eq!(ders[2].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quadrant_lies_on_unit_circle() {
        let curve = quadrant();
        for i in 0..=20 {
            let p = curve_point_at(&curve, i as f64 / 20.0).unwrap();
            assert_relative_eq!(p.to_vec().magnitude(), 1.0, epsilon = 1e-12);
        }
        let end = curve_point_at(&curve, 1.0).unwrap();
        assert_relative_eq!(end.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_first_derivative_matches_finite_difference() {
        let curve = NurbsCurve::new(
            3,
            vec![0.0, 0.0, 0.0, 0.0, 0.4, 1.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.5),
                Point3::new(3.0, 2.0, -0.5),
                Point3::new(4.0, 0.0, 1.0),
                Point3::new(5.0, 1.0, 0.0),
            ],
            Some(vec![1.0, 0.5, 2.0, 1.5, 1.0]),
        )
        .unwrap();

        let h = 1e-6;
        for &t in &[0.1, 0.35, 0.6, 0.9] {
            let d = rational_curve_derivatives(&curve, t, 1).unwrap()[1];
            let a = curve_point_at(&curve, t - h).unwrap();
            let b = curve_point_at(&curve, t + h).unwrap();
            let fd = (b - a) / (2.0 * h);
            assert_relative_eq!(d.x, fd.x, epsilon = 1e-5);
            assert_relative_eq!(d.y, fd.y, epsilon = 1e-5);
            assert_relative_eq!(d.z, fd.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_homogeneous_derivatives_above_degree_are_zero() {
        let ders = curve_derivatives(&quadrant(), 0.3, 4).unwrap();
        assert_eq!(ders.len(), 5);
        assert_eq!(ders[3], Point4::zero());
        assert_eq!(ders[4], Point4::zero());
    }

    #[test]
    fn test_out_of_domain_rejected() {
        let curve = quadrant();
        assert_eq!(
            curve_point_at(&curve, 1.5),
            Err(SplineError::ParameterOutOfDomain)
        );
        assert_eq!(
            rational_curve_derivatives(&curve, -0.1, 1),
            Err(SplineError::ParameterOutOfDomain)
        );
        // Within tolerance of the boundary the parameter is clamped.
        assert!(curve_point_at(&curve, 1.0 + 1e-12).is_ok());
    }

    fn bilinear_patch() -> NurbsSurface<f64> {
        NurbsSurface::new(
            1,
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![
                vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
                vec![Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_surface_point_bilinear() {
        let s = bilinear_patch();
        let p = surface_point_at(&s, 0.5, 0.5).unwrap();
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_surface_derivatives_bilinear() {
        let s = bilinear_patch();
        let d = rational_surface_derivatives(&s, 0.25, 0.75, 2).unwrap();
        // S(u, v) = (u, v, u·v)
        assert_relative_eq!(d[1][0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d[1][0].z, 0.75, epsilon = 1e-12);
        assert_relative_eq!(d[0][1].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d[0][1].z, 0.25, epsilon = 1e-12);
        assert_relative_eq!(d[1][1].z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d[2][0].magnitude(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rational_surface_matches_finite_difference() {
        let s = NurbsSurface::new(
            2,
            1,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![
                vec![Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 2.0)],
                vec![Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, 1.0, 2.0)],
                vec![Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 1.0, 2.0)],
            ],
            Some(vec![vec![1.0, 1.0], vec![0.7, 0.7], vec![1.0, 1.0]]),
        )
        .unwrap();

        let h = 1e-6;
        let (u, v) = (0.3, 0.6);
        let d = rational_surface_derivatives(&s, u, v, 1).unwrap();
        let fd_u = (surface_point_at(&s, u + h, v).unwrap() - surface_point_at(&s, u - h, v).unwrap())
            / (2.0 * h);
        let fd_v = (surface_point_at(&s, u, v + h).unwrap() - surface_point_at(&s, u, v - h).unwrap())
            / (2.0 * h);
        assert_relative_eq!(d[1][0].x, fd_u.x, epsilon = 1e-5);
        assert_relative_eq!(d[1][0].y, fd_u.y, epsilon = 1e-5);
        assert_relative_eq!(d[0][1].z, fd_v.z, epsilon = 1e-5);
        assert_relative_eq!(d[0][1].x, fd_v.x, epsilon = 1e-5);
    }

    #[test]
    fn test_surface_out_of_domain_rejected() {
        let s = bilinear_patch();
        assert_eq!(
            surface_point_at(&s, 1.2, 0.5),
            Err(SplineError::ParameterOutOfDomain)
        );
    }
}
