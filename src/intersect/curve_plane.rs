//! Curve-plane intersection.

use super::options::IntersectionOptions;
use super::tree::{BoundingBoxTree, LazyCurveBoundingBoxTree};
use crate::error::{SplineError, SplineResult};
use crate::linalg::{newton_bisect, newton_clamped};
use crate::nurbs::NurbsCurve;
use crate::primitives::{Plane3, Point3};
use crate::tolerance::epsilon;
use log::{debug, trace};
use num_traits::Float;

/// A point where a curve meets a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePlaneIntersection<F> {
    pub point: Point3<F>,
    /// Parameter on the curve.
    pub t: F,
}

/// Finds the points where `curve` meets `plane` within `options.tolerance`.
///
/// Tree nodes whose boxes straddle the plane are split down to leaves; on
/// each leaf the signed distance to the plane is driven to zero by Newton
/// iteration. Results are de-duplicated and sorted by parameter.
pub fn curve_plane<F: Float>(
    curve: &NurbsCurve<F>,
    plane: &Plane3<F>,
    options: &IntersectionOptions<F>,
) -> SplineResult<Vec<CurvePlaneIntersection<F>>> {
    let tree = LazyCurveBoundingBoxTree::new(curve.clone(), options.knot_tolerance)
        .with_seed(options.seed);
    let mut leaves = Vec::new();
    collect_leaves(&tree, plane, options, 0, &mut leaves)?;
    debug!("curve-plane: {} candidate leaves", leaves.len());

    let signed_distance = |t: F| -> SplineResult<(F, F)> {
        let ders = curve.derivatives(t, 1)?;
        Ok((
            plane.signed_distance(Point3::from(ders[0])),
            plane.normal.dot(ders[1]),
        ))
    };

    let two = F::one() + F::one();
    let mut intersections: Vec<CurvePlaneIntersection<F>> = Vec::new();
    for leaf in &leaves {
        let (lo, hi) = leaf.item().domain();
        let (d_lo, _) = signed_distance(lo)?;
        let (d_hi, _) = signed_distance(hi)?;

        let found = if d_lo.signum() != d_hi.signum() || d_lo == F::zero() || d_hi == F::zero() {
            newton_bisect(signed_distance, lo, hi, (lo + hi) / two, epsilon())
        } else {
            let (domain_lo, domain_hi) = curve.domain();
            newton_clamped(
                signed_distance,
                domain_lo,
                domain_hi,
                (lo + hi) / two,
                epsilon(),
                epsilon(),
            )
        };

        let t = match found {
            Ok(t) => t,
            Err(SplineError::ConvergenceFailed { .. }) | Err(SplineError::DegenerateInput) => {
                continue
            }
            Err(err) => return Err(err),
        };
        let point = curve.point_at(t)?;
        if plane.signed_distance(point).abs() <= options.tolerance {
            intersections.push(CurvePlaneIntersection { point, t });
        }
    }

    intersections.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
    let mut kept: Vec<CurvePlaneIntersection<F>> = Vec::with_capacity(intersections.len());
    for candidate in intersections {
        if kept
            .iter()
            .all(|k| k.point.distance(candidate.point) > options.tolerance)
        {
            kept.push(candidate);
        }
    }
    debug!("curve-plane: {} intersections", kept.len());
    Ok(kept)
}

fn collect_leaves<F, T>(
    node: &T,
    plane: &Plane3<F>,
    options: &IntersectionOptions<F>,
    depth: usize,
    leaves: &mut Vec<T>,
) -> SplineResult<()>
where
    F: Float,
    T: BoundingBoxTree<F> + Clone,
{
    if !node.bounding_box().straddles_plane(plane, options.tolerance) {
        return Ok(());
    }
    trace!("tree node straddles plane at depth {}", depth);

    if node.is_indivisible()
        || node.bounding_box().diagonal() <= options.tolerance
        || depth >= options.max_depth
    {
        leaves.push(node.clone());
        return Ok(());
    }
    let (left, right) = node.split()?;
    collect_leaves(&left, plane, options, depth + 1, leaves)?;
    collect_leaves(&right, plane, options, depth + 1, leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Vec3;
    use approx::assert_relative_eq;

    fn helix_like() -> NurbsCurve<f64> {
        NurbsCurve::from_points(
            3,
            vec![0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(0.0, 0.0, -1.0),
                Point3::new(1.0, 2.0, 3.0),
                Point3::new(2.0, -2.0, -3.0),
                Point3::new(3.0, 2.0, 3.0),
                Point3::new(4.0, 0.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_points_lie_on_plane() {
        let curve = helix_like();
        let plane = Plane3::world_xy();
        let hits = curve_plane(&curve, &plane, &IntersectionOptions::default()).unwrap();
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].t < pair[1].t);
        }
        for hit in &hits {
            assert_relative_eq!(hit.point.z, 0.0, epsilon = 1e-6);
            let on_curve = curve.point_at(hit.t).unwrap();
            assert_relative_eq!(on_curve.x, hit.point.x, epsilon = 1e-12);
        }
        // Crosses z = 0 at t = 0.05 and touches it at the knot t = 0.5.
        assert_eq!(hits.len(), 2, "{hits:?}");
        assert_relative_eq!(hits[0].t, 0.05, epsilon = 1e-8);
        assert_relative_eq!(hits[0].point.x, 0.2855, epsilon = 1e-8);
        assert_relative_eq!(hits[1].t, 0.5, epsilon = 1e-4);
        assert_relative_eq!(hits[1].point.x, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_line_crosses_plane_once() {
        let curve = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)],
        )
        .unwrap();
        let plane = Plane3::new(Point3::new(1.0, 5.0, 5.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hits = curve_plane(&curve, &plane, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].t, 0.25, epsilon = 1e-9);
        assert_relative_eq!(hits[0].point.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_plane_misses() {
        let curve = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)],
        )
        .unwrap();
        let plane = Plane3::new(Point3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let hits = curve_plane(&curve, &plane, &IntersectionOptions::default()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_arc_crosses_plane_twice() {
        let arch = NurbsCurve::from_points(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 4.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let plane = Plane3::new(Point3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let hits = curve_plane(&arch, &plane, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 2);
        let root = 2.0f64.sqrt();
        assert_relative_eq!(hits[0].point.x, 2.0 - root, epsilon = 1e-8);
        assert_relative_eq!(hits[1].point.x, 2.0 + root, epsilon = 1e-8);
    }

    #[test]
    fn test_closed_curve_seam_reported_once() {
        // A closed triangle through the origin; the plane x = 0 contains the
        // seam and crosses the far edge at (0, 2).
        let triangle = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 2.0, 3.0, 3.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 2.0, 0.0),
                Point3::new(-2.0, 2.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let plane = Plane3::new(Point3::origin(), Vec3::unit_x()).unwrap();
        let hits = curve_plane(&triangle, &plane, &IntersectionOptions::default()).unwrap();
        assert_eq!(hits.len(), 2, "{hits:?}");
        assert_relative_eq!(hits[0].point.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(hits[1].point.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_knot_tolerance_still_succeeds() {
        let curve = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)],
        )
        .unwrap();
        let plane = Plane3::new(Point3::new(1.0, 0.0, 0.0), Vec3::unit_x()).unwrap();
        let options = IntersectionOptions::default().with_knot_tolerance(0.0);
        let hits = curve_plane(&curve, &plane, &options).unwrap();
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].t, 0.25, epsilon = 1e-9);
    }
}
