//! Knot refinement, splitting and Bézier decomposition.

use super::NurbsCurve;
use crate::error::{SplineError, SplineResult};
use crate::knots::KnotVector;
use crate::primitives::Point4;
use crate::tolerance::epsilon;
use log::debug;
use num_traits::Float;

/// Inserts every value of `knots_to_insert` into the curve's knot vector.
///
/// The refined curve has the same shape and parameterization as the input,
/// with one extra control point per inserted knot. Values are sorted first;
/// values within `EPSILON` of an existing knot are snapped onto it.
///
/// # Errors
///
/// - [`SplineError::NonFinite`] for a NaN or infinite value
/// - [`SplineError::ParameterOutOfDomain`] for a value at or outside the
///   domain ends
/// - [`SplineError::InvalidKnots`] if a value would end up with a
///   multiplicity above `degree + 1`
pub fn knot_refine<F: Float>(
    curve: &NurbsCurve<F>,
    knots_to_insert: &[F],
) -> SplineResult<NurbsCurve<F>> {
    if knots_to_insert.is_empty() {
        return Ok(curve.clone());
    }

    let p = curve.degree();
    let u = curve.knots();
    let pw = curve.homogeneous_points();
    let eps = epsilon::<F>();
    let (lo, hi) = curve.domain();

    let mut x = Vec::with_capacity(knots_to_insert.len());
    for &value in knots_to_insert {
        if !value.is_finite() {
            return Err(SplineError::NonFinite);
        }
        if value <= lo + eps || value >= hi - eps {
            return Err(SplineError::ParameterOutOfDomain);
        }
        let snapped = u
            .iter()
            .copied()
            .find(|&k| (k - value).abs() < eps)
            .unwrap_or(value);
        x.push(snapped);
    }
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut start = 0;
    while start < x.len() {
        let end = start + x[start..].iter().take_while(|&&v| v == x[start]).count();
        if u.multiplicity(x[start]) + (end - start) > p + 1 {
            return Err(SplineError::InvalidKnots {
                degree: p,
                control_points: pw.len() + x.len(),
            });
        }
        start = end;
    }

    let n = pw.len() - 1;
    let m = n + p + 1;
    let r = x.len() - 1;
    let a = u.span(p, x[0]);
    let b = u.span(p, x[r]) + 1;

    let mut qw = vec![Point4::zero(); n + r + 2];
    let mut ubar = vec![F::zero(); m + r + 2];

    qw[..=(a - p)].copy_from_slice(&pw[..=(a - p)]);
    for j in (b - 1)..=n {
        qw[j + r + 1] = pw[j];
    }
    ubar[..=a].copy_from_slice(&u[..=a]);
    for j in (b + p)..=m {
        ubar[j + r + 1] = u[j];
    }

    let mut i = b + p - 1;
    let mut k = b + p + r;
    for j in (0..=r).rev() {
        while x[j] <= u[i] && i > a {
            qw[k - p - 1] = pw[i - p - 1];
            ubar[k] = u[i];
            k -= 1;
            i -= 1;
        }
        qw[k - p - 1] = qw[k - p];
        for l in 1..=p {
            let ind = k - p + l;
            let alpha = ubar[k + l] - x[j];
            if alpha.abs() < eps {
                qw[ind - 1] = qw[ind];
            } else {
                let alpha = alpha / (ubar[k + l] - u[i - p + l]);
                qw[ind - 1] = qw[ind - 1] * alpha + qw[ind] * (F::one() - alpha);
            }
        }
        ubar[k] = x[j];
        k -= 1;
    }

    debug!(
        "knot refinement inserted {} knots: {} -> {} control points",
        x.len(),
        pw.len(),
        qw.len()
    );
    Ok(NurbsCurve::from_parts(p, KnotVector::new(ubar), qw))
}

/// Splits `curve` at `t` into a left and a right curve.
///
/// `t` is inserted until it has multiplicity `degree + 1`, so the left curve
/// ends and the right curve starts at `C(t)`. The left domain is
/// `[t_min, t]`, the right `[t, t_max]`.
///
/// Fails with [`SplineError::SplitAtBoundary`] when `t` is at either end of
/// the domain, and [`SplineError::ParameterOutOfDomain`] outside it.
pub fn split<F: Float>(
    curve: &NurbsCurve<F>,
    t: F,
) -> SplineResult<(NurbsCurve<F>, NurbsCurve<F>)> {
    let t = curve.check_parameter(t)?;
    let (lo, hi) = curve.domain();
    let eps = epsilon::<F>();
    if t <= lo + eps || t >= hi - eps {
        return Err(SplineError::SplitAtBoundary);
    }

    let p = curve.degree();
    let existing = curve.knots().multiplicity(t);
    let to_insert = (p + 1).saturating_sub(existing);
    let refined = knot_refine(curve, &vec![t; to_insert])?;

    let knots = refined.knots();
    let points = refined.homogeneous_points();
    let f = knots
        .iter()
        .position(|&k| (k - t).abs() < eps)
        .ok_or(SplineError::DegenerateInput)?;

    let left = NurbsCurve::from_parts(
        p,
        KnotVector::new(knots[..f + p + 1].to_vec()),
        points[..f].to_vec(),
    );
    let right = NurbsCurve::from_parts(
        p,
        KnotVector::new(knots[f..].to_vec()),
        points[f..].to_vec(),
    );
    Ok((left, right))
}

/// Decomposes `curve` into Bézier segments, one per non-empty knot span.
///
/// Every segment has `degree + 1` control points and `2 * (degree + 1)`
/// knots that keep the original parameterization.
pub fn decompose_into_beziers<F: Float>(curve: &NurbsCurve<F>) -> SplineResult<Vec<NurbsCurve<F>>> {
    let p = curve.degree();
    let (lo, hi) = curve.domain();
    let eps = epsilon::<F>();
    let mut to_insert = Vec::new();
    for (value, multiplicity) in curve.knots().multiplicities() {
        if value <= lo + eps || value >= hi - eps {
            continue;
        }
        to_insert.extend(std::iter::repeat(value).take((p + 1).saturating_sub(multiplicity)));
    }

    let refined = knot_refine(curve, &to_insert)?;
    let knots = refined.knots();
    let points = refined.homogeneous_points();

    let segments: Vec<NurbsCurve<F>> = (0..points.len())
        .step_by(p + 1)
        .filter(|&i| i + p + 1 <= points.len())
        .map(|i| {
            NurbsCurve::from_parts(
                p,
                KnotVector::new(knots[i..i + 2 * (p + 1)].to_vec()),
                points[i..i + p + 1].to_vec(),
            )
        })
        .collect();

    debug!("decomposed curve into {} bezier segments", segments.len());
    Ok(segments)
}
