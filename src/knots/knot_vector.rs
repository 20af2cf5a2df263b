//! The knot vector of a B-spline curve or one direction of a surface.
//!
//! A knot vector is a non-decreasing sequence of parameter values. For a
//! curve of degree `p` with `n` control points it holds `n + p + 1` values,
//! and a *clamped* knot vector repeats its first and last value `p + 1`
//! times so the curve interpolates its end control points.
//!
//! # Example
//!
//! ```
//! use splinekit::knots::KnotVector;
//!
//! let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 5.0, 5.0, 5.0]);
//! assert!(knots.are_valid(2, 8));
//! assert_eq!(knots.span(2, 2.5), 4);
//! ```

use crate::error::{SplineError, SplineResult};
use crate::tolerance::{epsilon, from_usize, remap};
use num_traits::Float;
use std::ops::Deref;

/// An ordered sequence of knot values.
///
/// Validity is a query ([`KnotVector::are_valid`]), not a construction-time
/// guarantee: curves and surfaces check it when they are built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct KnotVector<F> {
    knots: Vec<F>,
}

impl<F: Float> KnotVector<F> {
    /// Wraps a list of knot values without validating it.
    pub fn new(knots: Vec<F>) -> Self {
        Self { knots }
    }

    /// Creates a uniform clamped knot vector on `[0, 1]`.
    ///
    /// The result is `degree + 1` zeros, `num_control_points - degree - 1`
    /// evenly spaced interior values and `degree + 1` ones.
    pub fn uniform_clamped(degree: usize, num_control_points: usize) -> SplineResult<Self> {
        if degree < 1 {
            return Err(SplineError::InvalidDegree { degree });
        }
        if num_control_points <= degree {
            return Err(SplineError::TooFewPoints {
                required: degree + 1,
                found: num_control_points,
            });
        }

        let num_interior = num_control_points - degree - 1;
        let mut knots = Vec::with_capacity(num_control_points + degree + 1);
        knots.extend(std::iter::repeat(F::zero()).take(degree + 1));
        let denom = from_usize::<F>(num_interior + 1);
        for i in 1..=num_interior {
            knots.push(from_usize::<F>(i) / denom);
        }
        knots.extend(std::iter::repeat(F::one()).take(degree + 1));

        Ok(Self { knots })
    }

    /// Creates a uniform unclamped knot vector with evenly spaced values on `[0, 1]`.
    pub fn uniform_unclamped(degree: usize, num_control_points: usize) -> SplineResult<Self> {
        if degree < 1 {
            return Err(SplineError::InvalidDegree { degree });
        }
        if num_control_points <= degree {
            return Err(SplineError::TooFewPoints {
                required: degree + 1,
                found: num_control_points,
            });
        }

        let count = num_control_points + degree + 1;
        let last = from_usize::<F>(count - 1);
        let knots = (0..count).map(|i| from_usize::<F>(i) / last).collect();
        Ok(Self { knots })
    }

    #[inline]
    pub fn as_slice(&self) -> &[F] {
        &self.knots
    }

    #[inline]
    pub fn into_vec(self) -> Vec<F> {
        self.knots
    }

    /// First knot value. Panics on an empty vector.
    #[inline]
    pub fn first_value(&self) -> F {
        self.knots[0]
    }

    /// Last knot value. Panics on an empty vector.
    #[inline]
    pub fn last_value(&self) -> F {
        self.knots[self.knots.len() - 1]
    }

    /// Length of the full knot range, `last - first`.
    #[inline]
    pub fn domain(&self) -> F {
        if self.knots.is_empty() {
            return F::zero();
        }
        self.last_value() - self.first_value()
    }

    /// Checks the knots against a curve of `degree` with `num_control_points`.
    ///
    /// The knots are valid when the length is `num_control_points + degree + 1`,
    /// the values never decrease, and the first and last `degree + 1` values are
    /// each constant (clamped). Never panics.
    pub fn are_valid(&self, degree: usize, num_control_points: usize) -> bool {
        let len = self.knots.len();
        if len == 0 || len != num_control_points + degree + 1 {
            return false;
        }
        if self.knots.iter().any(|k| !k.is_finite()) {
            return false;
        }
        if self.knots.windows(2).any(|w| w[1] < w[0]) {
            return false;
        }

        let eps = epsilon::<F>();
        let first = self.knots[0];
        let last = self.knots[len - 1];
        let head = &self.knots[..=degree.min(len - 1)];
        let tail = &self.knots[len.saturating_sub(degree + 1)..];
        head.iter().all(|&k| (k - first).abs() < eps) && tail.iter().all(|&k| (k - last).abs() < eps)
    }

    /// Finds the index `i` of the knot span containing `parameter`, so that
    /// `knots[i] <= parameter < knots[i + 1]`.
    ///
    /// Parameters at (or past) the end of the domain map to the last
    /// non-empty span `n = len - degree - 2`, and parameters at (or before) the
    /// start map to `degree`. The result always lies in `[degree, n]`.
    ///
    /// The vector must hold at least `degree + 2` values.
    pub fn span(&self, degree: usize, parameter: F) -> usize {
        let n = self.knots.len() - degree - 2;
        let eps = epsilon::<F>();

        if parameter >= self.knots[n + 1] - eps {
            return n;
        }
        if parameter <= self.knots[degree] + eps {
            return degree;
        }

        let mut low = degree;
        let mut high = n + 1;
        let mut mid = (low + high) / 2;
        while parameter < self.knots[mid] || parameter >= self.knots[mid + 1] {
            if parameter < self.knots[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    /// Distinct knot values with their multiplicities, in order.
    pub fn multiplicities(&self) -> Vec<(F, usize)> {
        let eps = epsilon::<F>();
        let mut result: Vec<(F, usize)> = Vec::new();
        for &k in &self.knots {
            if let Some(last) = result.last_mut() {
                if (k - last.0).abs() < eps {
                    last.1 += 1;
                    continue;
                }
            }
            result.push((k, 1));
        }
        result
    }

    /// Number of knots equal to `value` within tolerance.
    pub fn multiplicity(&self, value: F) -> usize {
        let eps = epsilon::<F>();
        self.knots.iter().filter(|&&k| (k - value).abs() < eps).count()
    }

    /// Distinct knot values strictly inside the clamped end runs.
    pub fn distinct_interior(&self) -> Vec<F> {
        let eps = epsilon::<F>();
        if self.knots.is_empty() {
            return Vec::new();
        }
        let (first, last) = (self.first_value(), self.last_value());
        self.multiplicities()
            .into_iter()
            .map(|(value, _)| value)
            .filter(|&v| v > first + eps && v < last - eps)
            .collect()
    }

    /// Remaps every value onto `[0, 1]`.
    ///
    /// A zero-width vector maps onto all zeros.
    pub fn normalize(&self) -> Self {
        if self.knots.is_empty() {
            return self.clone();
        }
        let source = (self.first_value(), self.last_value());
        let knots = self
            .knots
            .iter()
            .map(|&k| remap(k, source, (F::zero(), F::one())))
            .collect();
        Self { knots }
    }

    /// Mirrors the vector so it describes the same curve traversed backwards.
    ///
    /// `reversed[i] = first + last - knots[len - 1 - i]`, keeping the domain.
    pub fn reverse(&self) -> Self {
        if self.knots.is_empty() {
            return self.clone();
        }
        let sum = self.first_value() + self.last_value();
        let knots = self.knots.iter().rev().map(|&k| sum - k).collect();
        Self { knots }
    }
}

impl<F> Deref for KnotVector<F> {
    type Target = [F];

    fn deref(&self) -> &[F] {
        &self.knots
    }
}

impl<F> From<Vec<F>> for KnotVector<F> {
    fn from(knots: Vec<F>) -> Self {
        Self { knots }
    }
}
