//! Tolerances and scalar utilities shared by every algorithm in the crate.
//!
//! Functions that compare geometry take an explicit tolerance where the caller
//! can reasonably choose one. The constants below are the defaults used when
//! a tolerance is an implementation detail (knot comparison, solver stopping
//! criteria).

mod predicates;
mod scalar;

pub use predicates::{are_collinear, are_coincident};
pub use scalar::{
    approx_eq, cast, check_finite, from_usize, is_valid_double, remap, to_degrees, to_radians,
};

/// Tolerance used to compare knot values and parameters.
pub const EPSILON: f64 = 1.0e-10;

/// Loosest spatial tolerance used when checking evaluated geometry.
pub const MAX_TOLERANCE: f64 = 1.0e-3;

/// Tightest spatial tolerance used by iterative refinement.
pub const MIN_TOLERANCE: f64 = 1.0e-6;

/// The default knot tolerance of a bounding-box tree is the domain length divided by this.
pub const KNOT_TOLERANCE_DIVISOR: usize = 64;

/// Iteration cap for every iterative solver in the crate.
pub const MAX_ITERATIONS: usize = 100;

/// [`EPSILON`] converted to `F`.
#[inline]
pub fn epsilon<F: num_traits::Float>() -> F {
    cast(EPSILON)
}
