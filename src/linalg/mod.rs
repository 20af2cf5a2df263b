//! Small dense linear algebra and scalar root finding.
//!
//! Only what the curve algorithms need: square systems for global
//! interpolation and the 2×2 normal equations of intersection refinement,
//! plus bounded Newton iterations for one-dimensional searches.

mod matrix;
mod roots;

pub use matrix::Matrix;
pub use roots::{newton_bisect, newton_clamped};
