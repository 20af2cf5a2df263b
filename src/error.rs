//! Error types for spline construction, evaluation and modification.

use thiserror::Error;

/// Convenience alias for results returned throughout the crate.
pub type SplineResult<T> = Result<T, SplineError>;

/// Errors that can occur while building or operating on curves and surfaces.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// Degree must be at least 1.
    #[error("invalid degree {degree}: must be at least 1")]
    InvalidDegree {
        /// The rejected degree.
        degree: usize,
    },

    /// Knot vector is not a clamped, non-decreasing vector of the right length.
    #[error("invalid knot vector for degree {degree} with {control_points} control points")]
    InvalidKnots {
        /// Degree the knots were checked against.
        degree: usize,
        /// Number of control points the knots were checked against.
        control_points: usize,
    },

    /// Two collections that must have equal length do not.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Required length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A weight is zero, negative or not finite.
    #[error("weight {index} must be positive and finite")]
    InvalidWeight {
        /// Index of the offending weight.
        index: usize,
    },

    /// Not enough points for the requested construction.
    #[error("at least {required} points are required, found {found}")]
    TooFewPoints {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        found: usize,
    },

    /// Parameter lies outside the curve or surface domain.
    #[error("parameter lies outside the domain")]
    ParameterOutOfDomain,

    /// Splitting at either end of the domain would produce an empty curve.
    #[error("cannot split at a domain boundary")]
    SplitAtBoundary,

    /// Input is numerically degenerate (zero-length vector, zero weight, coincident points).
    #[error("degenerate input")]
    DegenerateInput,

    /// Three points meant to span a circle or plane are collinear.
    #[error("points are collinear")]
    CollinearPoints,

    /// A linear system has no unique solution.
    #[error("matrix is singular")]
    SingularMatrix,

    /// A computation produced NaN or infinity.
    #[error("computation produced a non-finite value")]
    NonFinite,

    /// Algorithm did not converge within the iteration limit.
    #[error("convergence failed after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },
}
