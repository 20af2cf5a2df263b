//! Curve-curve intersection.

use super::options::IntersectionOptions;
use super::tree::{BoundingBoxTree, LazyCurveBoundingBoxTree};
use crate::error::{SplineError, SplineResult};
use crate::linalg::Matrix;
use crate::nurbs::NurbsCurve;
use crate::primitives::{Line3, Point3};
use crate::tolerance::{epsilon, MAX_ITERATIONS};
use log::{debug, trace, warn};
use num_traits::Float;

/// A point where two curves meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveCurveIntersection<F> {
    /// The intersection point on the first curve.
    pub point: Point3<F>,
    /// Parameter on the first curve.
    pub t1: F,
    /// Parameter on the second curve.
    pub t2: F,
}

/// Finds the points where curves `a` and `b` meet within `options.tolerance`.
///
/// Both curves are wrapped in [`LazyCurveBoundingBoxTree`]s and descended
/// pairwise while their boxes overlap. Each pair of overlapping leaves is
/// refined with a Gauss-Newton iteration on `|A(s) - B(t)|²`. Results are
/// de-duplicated and sorted by the parameter on `a`.
///
/// Overlapping (coincident) stretches are not reported as ranges; they yield
/// one point per leaf pair.
pub fn curve_curve<F: Float>(
    a: &NurbsCurve<F>,
    b: &NurbsCurve<F>,
    options: &IntersectionOptions<F>,
) -> SplineResult<Vec<CurveCurveIntersection<F>>> {
    let tree_a = LazyCurveBoundingBoxTree::new(a.clone(), options.knot_tolerance).with_seed(options.seed);
    let tree_b = LazyCurveBoundingBoxTree::new(b.clone(), options.knot_tolerance)
        .with_seed(options.seed.wrapping_add(1));

    let mut leaves = Vec::new();
    collect_leaf_pairs(&tree_a, &tree_b, options, 0, &mut leaves)?;
    debug!("curve-curve: {} candidate leaf pairs", leaves.len());

    let mut intersections = Vec::new();
    for (leaf_a, leaf_b) in &leaves {
        let (s0, s1) = leaf_a.item().domain();
        let (t0, t1) = leaf_b.item().domain();
        let two = F::one() + F::one();
        let (s, t) = refine_pair(a, b, (s0 + s1) / two, (t0 + t1) / two)?;

        let pa = a.point_at(s)?;
        let pb = b.point_at(t)?;
        if pa.distance(pb) <= options.tolerance {
            intersections.push(CurveCurveIntersection {
                point: pa,
                t1: s,
                t2: t,
            });
        }
    }

    deduplicate_intersections(&mut intersections, options.tolerance);
    debug!("curve-curve: {} intersections", intersections.len());
    Ok(intersections)
}

/// Intersects `curve` with a line segment.
///
/// The segment is promoted to a degree-1 NURBS, so `t2` is the segment
/// parameter in `[0, 1]`.
pub fn curve_line<F: Float>(
    curve: &NurbsCurve<F>,
    line: &Line3<F>,
    options: &IntersectionOptions<F>,
) -> SplineResult<Vec<CurveCurveIntersection<F>>> {
    curve_curve(curve, &line.to_nurbs()?, options)
}

fn collect_leaf_pairs<F, T>(
    a: &T,
    b: &T,
    options: &IntersectionOptions<F>,
    depth: usize,
    leaves: &mut Vec<(T, T)>,
) -> SplineResult<()>
where
    F: Float,
    T: BoundingBoxTree<F> + Clone,
{
    if !a
        .bounding_box()
        .intersects_within(b.bounding_box(), options.tolerance)
    {
        return Ok(());
    }
    trace!("overlapping tree nodes at depth {}", depth);

    if depth >= options.max_depth {
        leaves.push((a.clone(), b.clone()));
        return Ok(());
    }

    let is_leaf = |node: &T| {
        node.is_indivisible() || node.bounding_box().diagonal() <= options.tolerance
    };
    match (is_leaf(a), is_leaf(b)) {
        (true, true) => leaves.push((a.clone(), b.clone())),
        (false, false) => {
            let (a0, a1) = a.split()?;
            let (b0, b1) = b.split()?;
            collect_leaf_pairs(&a0, &b0, options, depth + 1, leaves)?;
            collect_leaf_pairs(&a0, &b1, options, depth + 1, leaves)?;
            collect_leaf_pairs(&a1, &b0, options, depth + 1, leaves)?;
            collect_leaf_pairs(&a1, &b1, options, depth + 1, leaves)?;
        }
        (false, true) => {
            let (a0, a1) = a.split()?;
            collect_leaf_pairs(&a0, b, options, depth + 1, leaves)?;
            collect_leaf_pairs(&a1, b, options, depth + 1, leaves)?;
        }
        (true, false) => {
            let (b0, b1) = b.split()?;
            collect_leaf_pairs(a, &b0, options, depth + 1, leaves)?;
            collect_leaf_pairs(a, &b1, options, depth + 1, leaves)?;
        }
    }
    Ok(())
}

/// Minimizes `|A(s) - B(t)|²` from `(s, t)` by Gauss-Newton, keeping both
/// parameters inside their domains.
///
/// Parallel tangents make the normal equations singular. The point on `a`
/// is then projected onto `b` and the caller's distance check decides, so
/// overlapping stretches still report a point.
fn refine_pair<F: Float>(a: &NurbsCurve<F>, b: &NurbsCurve<F>, s: F, t: F) -> SplineResult<(F, F)> {
    let (a_lo, a_hi) = a.domain();
    let (b_lo, b_hi) = b.domain();
    let (mut s, mut t) = (s, t);

    for _ in 0..MAX_ITERATIONS {
        let da = a.derivatives(s, 1)?;
        let db = b.derivatives(t, 1)?;
        let r = da[0] - db[0];
        let ja = da[1];
        let jb = -db[1];

        let normal = Matrix::from_rows(vec![
            vec![ja.dot(ja), ja.dot(jb)],
            vec![jb.dot(ja), jb.dot(jb)],
        ])?;
        let step = match normal.solve(&[-ja.dot(r), -jb.dot(r)]) {
            Ok(step) => step,
            Err(SplineError::SingularMatrix) => {
                trace!("parallel tangents at s = {:?}, projecting", s.to_f64());
                return Ok((s, b.closest_parameter(a.point_at(s)?)?));
            }
            Err(err) => return Err(err),
        };

        let next_s = (s + step[0]).max(a_lo).min(a_hi);
        let next_t = (t + step[1]).max(b_lo).min(b_hi);
        let moved = (next_s - s).abs() + (next_t - t).abs();
        s = next_s;
        t = next_t;
        if moved <= epsilon() {
            return Ok((s, t));
        }
    }

    warn!(
        "curve-curve refinement stopped after {} iterations",
        MAX_ITERATIONS
    );
    Ok((s, t))
}

/// Sorts by the parameter on the first curve and drops every point within
/// `tolerance` of one already kept.
fn deduplicate_intersections<F: Float>(
    intersections: &mut Vec<CurveCurveIntersection<F>>,
    tolerance: F,
) {
    intersections.sort_by(|a, b| a.t1.partial_cmp(&b.t1).unwrap_or(std::cmp::Ordering::Equal));

    let mut kept: Vec<CurveCurveIntersection<F>> = Vec::with_capacity(intersections.len());
    for candidate in intersections.drain(..) {
        if kept
            .iter()
            .all(|k| k.point.distance(candidate.point) > tolerance)
        {
            kept.push(candidate);
        }
    }
    *intersections = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn segment(a: (f64, f64, f64), b: (f64, f64, f64)) -> NurbsCurve<f64> {
        Line3::new(Point3::new(a.0, a.1, a.2), Point3::new(b.0, b.1, b.2))
            .unwrap()
            .to_nurbs()
            .unwrap()
    }

    fn arch() -> NurbsCurve<f64> {
        NurbsCurve::from_points(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 4.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_crossing_lines() {
        let a = segment((0.0, 0.0, 0.0), (4.0, 4.0, 0.0));
        let b = segment((0.0, 4.0, 0.0), (4.0, 0.0, 0.0));
        let hits = curve_curve(&a, &b, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].t1, 0.5, epsilon = 1e-9);
        assert_relative_eq!(hits[0].t2, 0.5, epsilon = 1e-9);
        assert_relative_eq!(hits[0].point.x, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_skew_lines_miss() {
        let a = segment((0.0, 0.0, 0.0), (4.0, 4.0, 0.0));
        let b = segment((0.0, 4.0, 1.0), (4.0, 0.0, 1.0));
        let hits = curve_curve(&a, &b, &IntersectionOptions::default()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_arch_and_line_meet_twice() {
        // The arch is y = 2x - x²/2; it reaches y = 1 at x = 2 ± √2.
        let line = Line3::new(Point3::new(-1.0, 1.0, 0.0), Point3::new(5.0, 1.0, 0.0)).unwrap();
        let hits = curve_line(&arch(), &line, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].t1 < hits[1].t1);
        let root = 2.0f64.sqrt();
        assert_relative_eq!(hits[0].point.x, 2.0 - root, epsilon = 1e-8);
        assert_relative_eq!(hits[1].point.x, 2.0 + root, epsilon = 1e-8);
        for hit in &hits {
            assert_relative_eq!(hit.point.y, 1.0, epsilon = 1e-8);
            assert_relative_eq!(line.point_at(hit.t2).x, hit.point.x, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_two_curves_cross() {
        let a = arch();
        let b = arch().reverse().transform(&crate::primitives::Transform3::translation(
            crate::primitives::Vec3::new(1.0, 0.0, 0.0),
        ));
        let hits = curve_curve(&a, &b, &IntersectionOptions::default()).unwrap();
        // Identical arches shifted by 1 cross once, at x = 2.5.
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].point.x, 2.5, epsilon = 1e-8);
    }

    #[test]
    fn test_results_independent_of_seed() {
        let line = Line3::new(Point3::new(-1.0, 1.0, 0.0), Point3::new(5.0, 1.0, 0.0)).unwrap();
        let a = curve_line(&arch(), &line, &IntersectionOptions::default()).unwrap();
        let b = curve_line(&arch(), &line, &IntersectionOptions::default().with_seed(99)).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(x.t1, y.t1, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_touching_end_points() {
        let a = segment((0.0, 0.0, 0.0), (1.0, 0.0, 0.0));
        let b = segment((1.0, 0.0, 0.0), (1.0, 1.0, 0.0));
        let hits = curve_curve(&a, &b, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].t1, 1.0, epsilon = 1e-9);
        assert_relative_eq!(hits[0].t2, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_closed_curve_seam_reported_once() {
        // A closed square loop starts and ends at the origin, where the
        // diagonal also passes.
        let square = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let diagonal = segment((-1.0, -1.0, 0.0), (3.0, 3.0, 0.0));
        let hits = curve_curve(&square, &diagonal, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 2, "{hits:?}");
        assert_relative_eq!(hits[0].point.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hits[1].point.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(hits[1].point.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overlapping_segments_report_points() {
        let a = segment((0.0, 0.0, 0.0), (4.0, 0.0, 0.0));
        let b = segment((2.0, 0.0, 0.0), (6.0, 0.0, 0.0));
        let options = IntersectionOptions::default();
        let hits = curve_curve(&a, &b, &options).unwrap();
        assert!(!hits.is_empty());
        for hit in &hits {
            assert!(hit.point.x >= 2.0 - 1e-9 && hit.point.x <= 4.0 + 1e-9);
            assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-12);
            let on_b = b.point_at(hit.t2).unwrap();
            assert!(on_b.distance(hit.point) <= options.tolerance);
        }
    }

    #[test]
    fn test_curve_against_itself() {
        let a = arch();
        let hits = curve_curve(&a, &a, &IntersectionOptions::default()).unwrap();
        assert!(!hits.is_empty());
        for hit in &hits {
            assert_relative_eq!(hit.t1, hit.t2, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_tiny_knot_tolerance_still_succeeds() {
        let a = segment((0.0, 0.0, 0.0), (4.0, 4.0, 0.0));
        let b = segment((0.0, 4.0, 0.0), (4.0, 0.0, 0.0));
        for knot_tolerance in [1.0e-14, 0.0] {
            let options = IntersectionOptions::default().with_knot_tolerance(knot_tolerance);
            let hits = curve_curve(&a, &b, &options).unwrap();
            assert_eq!(hits.len(), 1);
            assert_relative_eq!(hits[0].point.x, 2.0, epsilon = 1e-9);
        }
    }
}
