//! Arc length, closest point and equal-length division of curves.

use super::evaluate::rational_curve_derivatives;
use super::NurbsCurve;
use crate::error::{SplineError, SplineResult};
use crate::intersect::ChordLengthObjective;
use crate::linalg::{newton_bisect, newton_clamped};
use crate::primitives::Point3;
use crate::tolerance::{cast, check_finite, epsilon, from_usize};
use num_traits::Float;

/// Nodes and weights of 8-point Gauss-Legendre quadrature on `[-1, 1]`.
const GAUSS_LEGENDRE_8: [(f64, f64); 8] = [
    (-0.960_289_856_497_536_3, 0.101_228_536_290_376_3),
    (-0.796_666_477_413_626_7, 0.222_381_034_453_374_5),
    (-0.525_532_409_916_329_0, 0.313_706_645_877_887_3),
    (-0.183_434_642_495_649_8, 0.362_683_783_378_362_0),
    (0.183_434_642_495_649_8, 0.362_683_783_378_362_0),
    (0.525_532_409_916_329_0, 0.313_706_645_877_887_3),
    (0.796_666_477_413_626_7, 0.222_381_034_453_374_5),
    (0.960_289_856_497_536_3, 0.101_228_536_290_376_3),
];

/// Interval halvings allowed per knot span when integrating length.
const MAX_LENGTH_DEPTH: usize = 8;

/// Returns the arc length of the whole curve.
pub fn length<F: Float>(curve: &NurbsCurve<F>) -> SplineResult<F> {
    let (lo, hi) = curve.domain();
    length_between(curve, lo, hi)
}

/// Returns the arc length from the start of the domain to `t`.
pub fn length_at<F: Float>(curve: &NurbsCurve<F>, t: F) -> SplineResult<F> {
    let t = curve.check_parameter(t)?;
    length_between(curve, curve.domain().0, t)
}

/// Returns the parameter where the arc length from the start equals `length`.
///
/// Lengths at or below zero map to the start of the domain and lengths at
/// or above the total to its end.
pub fn parameter_at_length<F: Float>(curve: &NurbsCurve<F>, length: F) -> SplineResult<F> {
    let length = check_finite(length)?;
    let (lo, hi) = curve.domain();
    let total = self::length(curve)?;
    if length <= F::zero() {
        return Ok(lo);
    }
    if length >= total {
        return Ok(hi);
    }

    let guess = lo + (hi - lo) * length / total;
    let tolerance = epsilon::<F>() * (F::one() + total);
    newton_bisect(
        |t| Ok((length_between(curve, lo, t)? - length, speed(curve, t)?)),
        lo,
        hi,
        guess,
        tolerance,
    )
}

/// Returns the parameter of the curve point closest to `point`.
///
/// The curve is sampled densely per knot span, then the best sample is
/// polished with Newton's method on `(C(t) - P) · C'(t)`.
pub fn closest_parameter<F: Float>(curve: &NurbsCurve<F>, point: Point3<F>) -> SplineResult<F> {
    if !point.is_valid() {
        return Err(SplineError::NonFinite);
    }
    let (lo, hi) = curve.domain();
    let samples_per_span = 4 * (curve.degree() + 1);

    let mut best_t = lo;
    let mut best_distance = F::infinity();
    for pair in span_breaks(curve, lo, hi).windows(2) {
        for i in 0..=samples_per_span {
            let t = pair[0] + (pair[1] - pair[0]) * from_usize::<F>(i) / from_usize(samples_per_span);
            let distance = curve.point_at(t)?.distance_squared(point);
            if distance < best_distance {
                best_distance = distance;
                best_t = t;
            }
        }
    }

    let target = point.to_vec();
    let refined = newton_clamped(
        |t| {
            let ders = rational_curve_derivatives(curve, t, 2)?;
            let d = ders[0] - target;
            Ok((d.dot(ders[1]), ders[1].dot(ders[1]) + d.dot(ders[2])))
        },
        lo,
        hi,
        best_t,
        F::zero(),
        epsilon(),
    );

    match refined {
        Ok(t) if curve.point_at(t)?.distance_squared(point) <= best_distance => Ok(t),
        _ => Ok(best_t),
    }
}

/// Returns `count + 1` parameters splitting the curve into `count` pieces
/// of equal arc length, starting and ending at the domain ends.
pub fn divide_by_count<F: Float>(curve: &NurbsCurve<F>, count: usize) -> SplineResult<Vec<F>> {
    if count == 0 {
        return Err(SplineError::DegenerateInput);
    }
    let (lo, hi) = curve.domain();
    let total = length(curve)?;

    let mut parameters = Vec::with_capacity(count + 1);
    parameters.push(lo);
    for i in 1..count {
        let target = total * from_usize::<F>(i) / from_usize(count);
        parameters.push(parameter_at_length(curve, target)?);
    }
    parameters.push(hi);
    Ok(parameters)
}

/// Returns the first parameter after `t0` whose point lies at straight-line
/// distance `chord` from `C(t0)`.
///
/// Fails with [`SplineError::ParameterOutOfDomain`] if no point of the
/// curve after `t0` is that far away.
pub fn parameter_at_chord_length<F: Float>(
    curve: &NurbsCurve<F>,
    t0: F,
    chord: F,
) -> SplineResult<F> {
    let t0 = curve.check_parameter(t0)?;
    let chord = check_finite(chord)?;
    if chord <= F::zero() {
        return Ok(t0);
    }

    let objective = ChordLengthObjective::new(curve, t0, chord)?;
    let (_, hi) = curve.domain();
    let samples = 8 * (curve.degree() + 1) * (curve.knots().distinct_interior().len() + 1);

    let mut previous = t0;
    for i in 1..=samples {
        let t = t0 + (hi - t0) * from_usize::<F>(i) / from_usize(samples);
        let (residual, _) = objective.residual(t)?;
        if residual >= F::zero() {
            let tolerance = epsilon::<F>() * (F::one() + chord);
            return newton_bisect(|s| objective.residual(s), previous, t, t, tolerance);
        }
        previous = t;
    }
    Err(SplineError::ParameterOutOfDomain)
}

fn speed<F: Float>(curve: &NurbsCurve<F>, t: F) -> SplineResult<F> {
    Ok(rational_curve_derivatives(curve, t, 1)?[1].magnitude())
}

/// `a`, the distinct knots strictly between `a` and `b`, then `b`.
fn span_breaks<F: Float>(curve: &NurbsCurve<F>, a: F, b: F) -> Vec<F> {
    let mut breaks = vec![a];
    breaks.extend(
        curve
            .knots()
            .distinct_interior()
            .into_iter()
            .filter(|&k| k > a && k < b),
    );
    breaks.push(b);
    breaks
}

fn length_between<F: Float>(curve: &NurbsCurve<F>, a: F, b: F) -> SplineResult<F> {
    let mut total = F::zero();
    for pair in span_breaks(curve, a, b).windows(2) {
        if pair[1] > pair[0] {
            let whole = gauss_legendre(curve, pair[0], pair[1])?;
            total = total + integrate(curve, pair[0], pair[1], whole, 0)?;
        }
    }
    Ok(total)
}

fn integrate<F: Float>(curve: &NurbsCurve<F>, a: F, b: F, whole: F, depth: usize) -> SplineResult<F> {
    let mid = (a + b) / (F::one() + F::one());
    let left = gauss_legendre(curve, a, mid)?;
    let right = gauss_legendre(curve, mid, b)?;
    let sum = left + right;
    if depth >= MAX_LENGTH_DEPTH || (sum - whole).abs() <= epsilon::<F>() * (F::one() + sum) {
        return Ok(sum);
    }
    Ok(integrate(curve, a, mid, left, depth + 1)? + integrate(curve, mid, b, right, depth + 1)?)
}

fn gauss_legendre<F: Float>(curve: &NurbsCurve<F>, a: F, b: F) -> SplineResult<F> {
    let two = F::one() + F::one();
    let half = (b - a) / two;
    let mid = (a + b) / two;
    let mut sum = F::zero();
    for &(x, w) in &GAUSS_LEGENDRE_8 {
        sum = sum + cast::<F>(w) * speed(curve, mid + half * cast(x))?;
    }
    Ok(sum * half)
}
