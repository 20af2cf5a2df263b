//! Chains of connected curves.

use super::{Curve, Parametric};
use crate::error::{SplineError, SplineResult};
use crate::knots::KnotVector;
use crate::nurbs::{clamp_to_domain, NurbsCurve};
use crate::primitives::{Line3, Point3, Point4, Vec3};
use crate::tolerance::{cast, from_usize, remap, MIN_TOLERANCE};
use log::debug;
use num_traits::Float;

/// An ordered list of curves where each one starts where the previous one
/// ends.
///
/// The chain is parameterized over `[0, n]` for `n` segments; segment `i`
/// covers `[i, i + 1]`, mapped affinely onto its own domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyCurve<F> {
    segments: Vec<Curve<F>>,
}

impl<F: Float> PolyCurve<F> {
    /// Creates a chain, rejecting an empty list and gaps larger than
    /// `MIN_TOLERANCE` between consecutive segments.
    pub fn new(segments: Vec<Curve<F>>) -> SplineResult<Self> {
        if segments.is_empty() {
            return Err(SplineError::DegenerateInput);
        }
        let tolerance: F = cast(MIN_TOLERANCE);
        for pair in segments.windows(2) {
            let end = pair[0].end_point()?;
            let start = pair[1].start_point()?;
            if end.distance(start) > tolerance {
                return Err(SplineError::DegenerateInput);
            }
        }
        Ok(Self { segments })
    }

    /// Creates a chain of straight segments through `points`.
    pub fn from_polyline(points: &[Point3<F>]) -> SplineResult<Self> {
        if points.len() < 2 {
            return Err(SplineError::TooFewPoints {
                required: 2,
                found: points.len(),
            });
        }
        let segments = points
            .windows(2)
            .map(|pair| Line3::new(pair[0], pair[1]).map(Curve::Line))
            .collect::<SplineResult<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Curve<F>] {
        &self.segments
    }

    /// Returns true if the last segment ends where the first one starts.
    pub fn is_closed(&self, tolerance: F) -> SplineResult<bool> {
        Ok(self.start_point()?.distance(self.end_point()?) <= tolerance)
    }

    /// Joins the segments into a single NURBS over `[0, n]`.
    ///
    /// Every segment is elevated to the highest degree in the chain, its
    /// knots are remapped onto `[i, i + 1]`, and the joints are left with
    /// multiplicity equal to the degree so the result is C0 there.
    pub fn to_nurbs(&self) -> SplineResult<NurbsCurve<F>> {
        let pieces = self
            .segments
            .iter()
            .map(Curve::to_nurbs)
            .collect::<SplineResult<Vec<_>>>()?;
        let degree = pieces.iter().map(NurbsCurve::degree).max().unwrap_or(1);
        debug!(
            "joining {} segments into a degree {} curve",
            pieces.len(),
            degree
        );

        let mut knots: Vec<F> = Vec::new();
        let mut points: Vec<Point4<F>> = Vec::new();
        for (i, piece) in pieces.iter().enumerate() {
            let piece = piece.elevate_degree(degree - piece.degree());
            let source = piece.domain();
            let target = (from_usize::<F>(i), from_usize::<F>(i + 1));
            let local: Vec<F> = piece
                .knots()
                .as_slice()
                .iter()
                .map(|&k| remap(k, source, target))
                .collect();
            let homogeneous = piece.homogeneous_points();

            if points.is_empty() {
                knots.extend_from_slice(&local[..local.len() - 1]);
                points.extend_from_slice(homogeneous);
                continue;
            }

            // Scale the weights so the shared end point has one weight; a
            // uniform weight scale leaves the curve unchanged.
            let joint_weight = points[points.len() - 1].w;
            let scale = joint_weight / homogeneous[0].w;
            let last = i + 1 == pieces.len();
            let tail = if last {
                &local[degree + 1..]
            } else {
                &local[degree + 1..local.len() - 1]
            };
            knots.extend_from_slice(tail);
            points.extend(homogeneous[1..].iter().map(|&p| p * scale));
        }
        if pieces.len() == 1 {
            // Restore the end knot dropped above.
            knots.push(from_usize(1));
        }

        NurbsCurve::from_homogeneous(degree, KnotVector::new(knots), points)
    }

    /// Maps a chain parameter onto a segment and its local parameter.
    fn locate(&self, t: F) -> SplineResult<(&Curve<F>, F)> {
        let t = clamp_to_domain(t, self.domain())?;
        let n = self.segments.len();
        let index = t.floor().to_usize().unwrap_or(0).min(n - 1);
        let segment = &self.segments[index];
        let offset = from_usize::<F>(index);
        let local = remap(t, (offset, offset + F::one()), segment.domain());
        Ok((segment, local))
    }
}

impl<F: Float> Parametric<F> for PolyCurve<F> {
    fn domain(&self) -> (F, F) {
        (F::zero(), from_usize(self.segments.len()))
    }

    fn point_at(&self, t: F) -> SplineResult<Point3<F>> {
        let (segment, local) = self.locate(t)?;
        segment.point_at(local)
    }

    fn tangent_at(&self, t: F) -> SplineResult<Vec3<F>> {
        let (segment, local) = self.locate(t)?;
        segment.tangent_at(local)
    }

    fn length(&self) -> SplineResult<F> {
        self.segments
            .iter()
            .try_fold(F::zero(), |total, segment| Ok(total + segment.length()?))
    }

    fn closest_point(&self, p: Point3<F>) -> SplineResult<Point3<F>> {
        let mut best: Option<(F, Point3<F>)> = None;
        for segment in &self.segments {
            let candidate = segment.closest_point(p)?;
            let distance = candidate.distance_squared(p);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, candidate));
            }
        }
        best.map(|(_, point)| point)
            .ok_or(SplineError::DegenerateInput)
    }
}
