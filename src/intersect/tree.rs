//! Bounding-box trees over curves.

use crate::bounds::Aabb3;
use crate::error::SplineResult;
use crate::nurbs::NurbsCurve;
use crate::tolerance::{cast, epsilon, from_usize, KNOT_TOLERANCE_DIVISOR};
use log::trace;
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

/// A node of a binary tree of bounding boxes over some geometry.
///
/// Nodes are split on demand; a node that is indivisible is a leaf.
pub trait BoundingBoxTree<F: Float>: Sized {
    /// The geometry covered by a node.
    type Item;

    /// Box containing everything below this node.
    fn bounding_box(&self) -> Aabb3<F>;

    /// Splits the node into two children covering it together.
    fn split(&self) -> SplineResult<(Self, Self)>;

    /// Returns `true` if the node must not be split any further.
    fn is_indivisible(&self) -> bool;

    fn item(&self) -> &Self::Item;
}

/// A bounding-box tree node over a curve, split at jittered midpoints.
///
/// The bounding box is computed from the control points the first time it
/// is requested. Children are new nodes over the two halves of the curve; a
/// node never stores its children.
#[derive(Debug, Clone)]
pub struct LazyCurveBoundingBoxTree<F> {
    curve: NurbsCurve<F>,
    knot_tolerance: F,
    seed: u64,
    bounds: OnceLock<Aabb3<F>>,
}

impl<F: Float> LazyCurveBoundingBoxTree<F> {
    /// Creates the root node over `curve`.
    ///
    /// Without an explicit `knot_tolerance`, nodes stop splitting once their
    /// domain is shorter than `1 / KNOT_TOLERANCE_DIVISOR` of the root domain.
    pub fn new(curve: NurbsCurve<F>, knot_tolerance: Option<F>) -> Self {
        let (lo, hi) = curve.domain();
        let knot_tolerance = knot_tolerance
            .unwrap_or_else(|| (hi - lo) / from_usize::<F>(KNOT_TOLERANCE_DIVISOR));
        Self {
            curve,
            knot_tolerance,
            seed: 0,
            bounds: OnceLock::new(),
        }
    }

    /// Sets the seed of the split jitter.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn knot_tolerance(&self) -> F {
        self.knot_tolerance
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<F: Float> BoundingBoxTree<F> for LazyCurveBoundingBoxTree<F> {
    type Item = NurbsCurve<F>;

    fn bounding_box(&self) -> Aabb3<F> {
        *self.bounds.get_or_init(|| self.curve.control_bounds())
    }

    /// Splits at the domain midpoint moved by up to 10% of the domain.
    fn split(&self) -> SplineResult<(Self, Self)> {
        let (lo, hi) = self.curve.domain();
        let width = hi - lo;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let jitter: f64 = rng.random_range(-0.1..0.1);
        let t = (lo + hi) / (F::one() + F::one()) + width * cast(jitter);
        trace!(
            "splitting tree node [{:?}, {:?}] at {:?}",
            lo.to_f64(),
            hi.to_f64(),
            t.to_f64()
        );

        let (left, right) = self.curve.split(t)?;
        let child = |curve: NurbsCurve<F>, seed: u64| Self {
            curve,
            knot_tolerance: self.knot_tolerance,
            seed,
            bounds: OnceLock::new(),
        };
        Ok((child(left, rng.random()), child(right, rng.random())))
    }

    /// A node is a leaf once its domain is shorter than the knot tolerance,
    /// or too short to split without landing within `EPSILON` of an end.
    fn is_indivisible(&self) -> bool {
        let (lo, hi) = self.curve.domain();
        let width = hi - lo;
        let four: F = cast(4.0);
        let floor = four * epsilon::<F>() * (F::one() + lo.abs().max(hi.abs()));
        width < self.knot_tolerance || width <= floor
    }

    fn item(&self) -> &NurbsCurve<F> {
        &self.curve
    }
}
