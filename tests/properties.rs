use proptest::prelude::*;
use splinekit::nurbs::basis_functions;
use splinekit::{NurbsCurve, Point3};

fn point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-10.0f64..=10.0).prop_map(Point3::from_array)
}

/// A cubic with 4 to 9 control points, uniform clamped knots and weights in
/// `[0.5, 2]`.
fn rational_cubic() -> impl Strategy<Value = NurbsCurve<f64>> {
    (4usize..10)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(point(), n),
                prop::collection::vec(0.5f64..=2.0, n),
            )
        })
        .prop_map(|(points, weights)| {
            NurbsCurve::with_uniform_knots(3, points, Some(weights)).unwrap()
        })
}

fn assert_near(a: Point3<f64>, b: Point3<f64>) -> Result<(), TestCaseError> {
    prop_assert!(a.distance(b) < 1.0e-8, "{a:?} != {b:?}");
    Ok(())
}

proptest! {
    #[test]
    fn test_partition_of_unity(curve in rational_cubic(), t in 0.0f64..=1.0) {
        let knots = curve.knots();
        let span = knots.span(curve.degree(), t);
        let basis = basis_functions(curve.degree(), knots.as_slice(), span, t);
        prop_assert_eq!(basis.len(), curve.degree() + 1);
        let sum: f64 = basis.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1.0e-12);
        prop_assert!(basis.iter().all(|&b| b >= -1.0e-15));
    }

    #[test]
    fn test_refinement_preserves_shape(
        curve in rational_cubic(),
        inserted in prop::collection::vec(0.01f64..0.99, 1..6),
        t in 0.0f64..=1.0,
    ) {
        let refined = curve.knot_refine(&inserted).unwrap();
        prop_assert_eq!(
            refined.homogeneous_points().len(),
            curve.homogeneous_points().len() + inserted.len()
        );
        assert_near(refined.point_at(t).unwrap(), curve.point_at(t).unwrap())?;
    }

    #[test]
    fn test_split_covers_domain(curve in rational_cubic(), t in 0.05f64..0.95) {
        let (left, right) = curve.split(t).unwrap();
        prop_assert_eq!(left.domain().0, 0.0);
        prop_assert!((left.domain().1 - t).abs() < 1.0e-10);
        prop_assert!((right.domain().0 - t).abs() < 1.0e-10);
        prop_assert_eq!(right.domain().1, 1.0);

        let joint = curve.point_at(t).unwrap();
        assert_near(left.end_point().unwrap(), joint)?;
        assert_near(right.start_point().unwrap(), joint)?;

        let s = t * 0.5;
        assert_near(left.point_at(s).unwrap(), curve.point_at(s).unwrap())?;
        let s = t + (1.0 - t) * 0.5;
        assert_near(right.point_at(s).unwrap(), curve.point_at(s).unwrap())?;
    }

    #[test]
    fn test_reverse_is_an_involution(curve in rational_cubic(), t in 0.0f64..=1.0) {
        let reversed = curve.reverse();
        assert_near(reversed.point_at(1.0 - t).unwrap(), curve.point_at(t).unwrap())?;
        prop_assert!(reversed.reverse().approx_eq(&curve, 1.0e-12));
    }

    #[test]
    fn test_decomposition_count(curve in rational_cubic()) {
        let segments = curve.decompose_into_beziers().unwrap();
        let expected = curve.knots().distinct_interior().len() + 1;
        prop_assert_eq!(segments.len(), expected);
        for segment in &segments {
            prop_assert_eq!(segment.homogeneous_points().len(), curve.degree() + 1);
            let (lo, hi) = segment.domain();
            let mid = 0.5 * (lo + hi);
            assert_near(segment.point_at(mid).unwrap(), curve.point_at(mid).unwrap())?;
        }
    }

    #[test]
    fn test_degree_elevation_preserves_shape(
        curve in rational_cubic(),
        times in 1usize..3,
        t in 0.0f64..=1.0,
    ) {
        let elevated = curve.elevate_degree(times);
        prop_assert_eq!(elevated.degree(), curve.degree() + times);
        assert_near(elevated.point_at(t).unwrap(), curve.point_at(t).unwrap())?;
    }

    #[test]
    fn test_interpolation_passes_through_points(
        points in prop::collection::vec(point(), 5..10)
            .prop_filter("consecutive points must differ", |points| {
                points.windows(2).all(|w| w[0].distance(w[1]) > 1.0e-3)
            }),
    ) {
        let params = splinekit::fit::chord_length_parameterize(&points).unwrap();
        let curve = match splinekit::fit::interpolate(&points, 3) {
            Ok(curve) => curve,
            // Near-degenerate parameter spacing can make the system singular.
            Err(splinekit::SplineError::SingularMatrix) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("{e}"))),
        };
        for (p, t) in points.iter().zip(params) {
            let q = curve.point_at(t).unwrap();
            prop_assert!(q.distance(*p) < 1.0e-6, "{q:?} != {p:?}");
        }
    }
}
