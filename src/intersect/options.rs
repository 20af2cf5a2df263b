//! Intersection settings.

use crate::tolerance::{cast, MIN_TOLERANCE};
use num_traits::Float;

/// Settings shared by the intersection routines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions<F> {
    /// Maximum distance between two points for them to count as the same
    /// point. Also used to grow bounding boxes before overlap tests.
    pub tolerance: F,
    /// Parameter width below which a tree node is no longer split. `None`
    /// uses the domain length divided by `KNOT_TOLERANCE_DIVISOR`.
    pub knot_tolerance: Option<F>,
    /// Seed of the split-jitter generator; equal seeds give equal results.
    pub seed: u64,
    /// Hard limit on the tree descent depth.
    pub max_depth: usize,
}

impl<F: Float> IntersectionOptions<F> {
    pub fn with_tolerance(mut self, tolerance: F) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_knot_tolerance(mut self, knot_tolerance: F) -> Self {
        self.knot_tolerance = Some(knot_tolerance);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl<F: Float> Default for IntersectionOptions<F> {
    fn default() -> Self {
        Self {
            tolerance: cast(MIN_TOLERANCE),
            knot_tolerance: None,
            seed: 0,
            max_depth: 50,
        }
    }
}
