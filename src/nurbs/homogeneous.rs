//! Batch conversions between Euclidean control points with weights and
//! homogeneous control points, for curves (1D) and surfaces (2D).

use crate::error::{SplineError, SplineResult};
use crate::primitives::{Point3, Point4};
use num_traits::Float;

/// Lifts `points` with matching `weights` into homogeneous form.
///
/// When `weights` is `None` every weight is one. Weights must be positive
/// and finite; a zero weight is rejected rather than normalized.
pub fn homogenize_1d<F: Float>(
    points: &[Point3<F>],
    weights: Option<&[F]>,
) -> SplineResult<Vec<Point4<F>>> {
    match weights {
        None => Ok(points.iter().map(|&p| Point4::homogenize(p, F::one())).collect()),
        Some(weights) => {
            if weights.len() != points.len() {
                return Err(SplineError::LengthMismatch {
                    expected: points.len(),
                    found: weights.len(),
                });
            }
            points
                .iter()
                .zip(weights)
                .enumerate()
                .map(|(index, (&p, &w))| {
                    if !(w > F::zero() && w.is_finite()) {
                        return Err(SplineError::InvalidWeight { index });
                    }
                    if !p.is_valid() {
                        return Err(SplineError::NonFinite);
                    }
                    Ok(Point4::homogenize(p, w))
                })
                .collect()
        }
    }
}

/// Lifts a grid of points into homogeneous form, row by row.
pub fn homogenize_2d<F: Float>(
    points: &[Vec<Point3<F>>],
    weights: Option<&[Vec<F>]>,
) -> SplineResult<Vec<Vec<Point4<F>>>> {
    match weights {
        None => points.iter().map(|row| homogenize_1d(row, None)).collect(),
        Some(weights) => {
            if weights.len() != points.len() {
                return Err(SplineError::LengthMismatch {
                    expected: points.len(),
                    found: weights.len(),
                });
            }
            points
                .iter()
                .zip(weights)
                .map(|(row, w)| homogenize_1d(row, Some(w.as_slice())))
                .collect()
        }
    }
}

/// Projects homogeneous points back to Euclidean space.
pub fn dehomogenize_1d<F: Float>(points: &[Point4<F>]) -> SplineResult<Vec<Point3<F>>> {
    points.iter().map(|p| p.dehomogenize()).collect()
}

/// Projects a grid of homogeneous points back to Euclidean space.
pub fn dehomogenize_2d<F: Float>(points: &[Vec<Point4<F>>]) -> SplineResult<Vec<Vec<Point3<F>>>> {
    points.iter().map(|row| dehomogenize_1d(row)).collect()
}

/// Extracts the weights of homogeneous points.
pub fn weight_1d<F: Float>(points: &[Point4<F>]) -> Vec<F> {
    points.iter().map(|p| p.w).collect()
}

/// Extracts the weights of a grid of homogeneous points.
pub fn weight_2d<F: Float>(points: &[Vec<Point4<F>>]) -> Vec<Vec<F>> {
    points.iter().map(|row| weight_1d(row)).collect()
}
