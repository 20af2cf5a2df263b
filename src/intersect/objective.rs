//! Chord-length objective for point-at-distance searches.

use crate::error::SplineResult;
use crate::nurbs::NurbsCurve;
use crate::primitives::Point3;
use num_traits::Float;

/// Squared deviation of the chord `|C(t) - C(t0)|` from a target length.
///
/// `value(t) = (|C(t) - C(t0)| - L)²`, with an analytic derivative. Its zeros
/// are the parameters whose points lie at distance `L` from `C(t0)`.
#[derive(Debug, Clone)]
pub struct ChordLengthObjective<'a, F> {
    curve: &'a NurbsCurve<F>,
    anchor: Point3<F>,
    chord: F,
}

impl<'a, F: Float> ChordLengthObjective<'a, F> {
    /// Creates the objective for chords of length `chord` starting at `C(t0)`.
    pub fn new(curve: &'a NurbsCurve<F>, t0: F, chord: F) -> SplineResult<Self> {
        Ok(Self {
            curve,
            anchor: curve.point_at(t0)?,
            chord,
        })
    }

    /// The chord's fixed end `C(t0)`.
    pub fn anchor(&self) -> Point3<F> {
        self.anchor
    }

    /// `(|C(t) - C(t0)| - L)²`.
    pub fn value(&self, t: F) -> SplineResult<F> {
        let (r, _) = self.residual(t)?;
        Ok(r * r)
    }

    /// Derivative of [`value`](Self::value) with respect to `t`.
    pub fn gradient(&self, t: F) -> SplineResult<F> {
        let (r, dr) = self.residual(t)?;
        Ok((r + r) * dr)
    }

    /// The signed residual `|C(t) - C(t0)| - L` and its derivative.
    ///
    /// Where `C(t)` coincides with the anchor the distance is not
    /// differentiable; the one-sided limit `|C'(t)|` is used instead.
    pub fn residual(&self, t: F) -> SplineResult<(F, F)> {
        let ders = self.curve.derivatives(t, 1)?;
        let d = ders[0] - self.anchor.to_vec();
        let distance = d.magnitude();
        let slope = if distance > F::epsilon() {
            d.dot(ders[1]) / distance
        } else {
            ders[1].magnitude()
        };
        Ok((distance - self.chord, slope))
    }
}
