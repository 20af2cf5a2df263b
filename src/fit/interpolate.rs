//! Global curve interpolation.

use crate::error::{SplineError, SplineResult};
use crate::knots::KnotVector;
use crate::linalg::Matrix;
use crate::nurbs::{basis_functions, NurbsCurve};
use crate::primitives::Point3;
use crate::tolerance::from_usize;
use log::debug;
use num_traits::Float;

/// Fits a non-rational curve of `degree` that passes through every point.
///
/// Points are parameterized by chord length and the interior knots are
/// averages of `degree` consecutive parameters, which keeps the collocation
/// matrix well conditioned. The control points come from solving that
/// `n × n` system once per coordinate.
///
/// # Errors
///
/// - [`SplineError::InvalidDegree`] if `degree == 0`
/// - [`SplineError::TooFewPoints`] with fewer than `degree + 1` points
/// - [`SplineError::DegenerateInput`] if all points coincide
/// - [`SplineError::SingularMatrix`] if consecutive points coincide
pub fn interpolate<F: Float>(points: &[Point3<F>], degree: usize) -> SplineResult<NurbsCurve<F>> {
    if degree < 1 {
        return Err(SplineError::InvalidDegree { degree });
    }
    if points.len() <= degree {
        return Err(SplineError::TooFewPoints {
            required: degree + 1,
            found: points.len(),
        });
    }
    if points.iter().any(|p| !p.is_valid()) {
        return Err(SplineError::NonFinite);
    }

    let params = chord_length_parameterize(points)?;
    let knots = averaged_knots(&params, degree);
    let count = points.len();

    let mut collocation = Matrix::zeros(count, count);
    for (row, &u) in params.iter().enumerate() {
        let span = knots.span(degree, u);
        let basis = basis_functions(degree, &knots, span, u);
        for (i, &value) in basis.iter().enumerate() {
            collocation[(row, span - degree + i)] = value;
        }
    }

    let xs: Vec<F> = points.iter().map(|p| p.x).collect();
    let ys: Vec<F> = points.iter().map(|p| p.y).collect();
    let zs: Vec<F> = points.iter().map(|p| p.z).collect();
    let cx = collocation.solve(&xs)?;
    let cy = collocation.solve(&ys)?;
    let cz = collocation.solve(&zs)?;

    let control_points = (0..count)
        .map(|i| Point3::new(cx[i], cy[i], cz[i]))
        .collect();
    debug!("interpolated {} points with a degree {} curve", count, degree);
    NurbsCurve::from_points(degree, knots.into_vec(), control_points)
}

/// Parameters in `[0, 1]` proportional to the cumulative chord length.
///
/// Fails with [`SplineError::DegenerateInput`] when the polyline has zero
/// length.
pub fn chord_length_parameterize<F: Float>(points: &[Point3<F>]) -> SplineResult<Vec<F>> {
    let n = points.len();
    let mut params = vec![F::zero(); n];
    if n <= 1 {
        return Ok(params);
    }

    let mut total = F::zero();
    for i in 1..n {
        total = total + points[i - 1].distance(points[i]);
        params[i] = total;
    }
    if !(total > F::epsilon()) {
        return Err(SplineError::DegenerateInput);
    }

    for param in params.iter_mut().skip(1) {
        *param = *param / total;
    }
    params[n - 1] = F::one();
    Ok(params)
}

/// Clamped knots whose interior values average `degree` consecutive parameters.
fn averaged_knots<F: Float>(params: &[F], degree: usize) -> KnotVector<F> {
    let n = params.len() - 1;
    let mut knots = vec![F::zero(); degree + 1];
    let inv = F::one() / from_usize::<F>(degree);
    for j in 1..=(n - degree) {
        let sum = params[j..j + degree]
            .iter()
            .fold(F::zero(), |acc, &u| acc + u);
        knots.push(sum * inv);
    }
    knots.extend(std::iter::repeat(F::one()).take(degree + 1));
    KnotVector::new(knots)
}
