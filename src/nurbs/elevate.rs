//! Degree elevation.

use super::basis::binomial;
use super::NurbsCurve;
use crate::knots::KnotVector;
use crate::primitives::Point4;
use crate::tolerance::epsilon;
use log::debug;
use num_traits::Float;

/// Returns a curve of degree `degree + times` with the same shape and
/// parameterization.
///
/// Each Bézier segment is elevated in place while the curve is swept once
/// from left to right; knots already present have their multiplicity
/// raised by `times`. `times == 0` returns a copy.
pub fn elevate_degree<F: Float>(curve: &NurbsCurve<F>, times: usize) -> NurbsCurve<F> {
    if times == 0 {
        return curve.clone();
    }

    let p = curve.degree();
    let u = curve.knots().as_slice();
    let pw = curve.homogeneous_points();
    let n = pw.len() - 1;
    let m = n + p + 1;
    let t = times;
    let ph = p + t;
    let ph2 = ph / 2;
    let eps = epsilon::<F>();
    let one = F::one();

    // Coefficients that elevate a single Bézier segment.
    let mut bezalfs = vec![vec![F::zero(); p + 1]; ph + 1];
    bezalfs[0][0] = one;
    bezalfs[ph][p] = one;
    for i in 1..=ph2 {
        let inv = one / binomial::<F>(ph, i);
        for j in i.saturating_sub(t)..=p.min(i) {
            bezalfs[i][j] = inv * binomial::<F>(p, j) * binomial::<F>(t, i - j);
        }
    }
    for i in (ph2 + 1)..ph {
        for j in i.saturating_sub(t)..=p.min(i) {
            bezalfs[i][j] = bezalfs[ph - i][p - j];
        }
    }

    let capacity = (m + 1) * (t + 1) + 1;
    let mut qw = vec![Point4::zero(); capacity];
    let mut uh = vec![F::zero(); capacity + ph + 1];
    let mut bpts = pw[..=p].to_vec();
    let mut ebpts = vec![Point4::zero(); ph + 1];
    let mut next_bpts = vec![Point4::zero(); p];
    let mut alfs = vec![F::zero(); p];

    let mut mh = ph;
    let mut kind = ph + 1;
    let mut r: isize = -1;
    let mut a = p;
    let mut b = p + 1;
    let mut cind = 1;
    let mut ua = u[0];
    // Set when the previous segment ended on a knot of full multiplicity,
    // so the next segment starts with its own first control point.
    let mut broken = false;

    qw[0] = pw[0];
    for slot in uh.iter_mut().take(ph + 1) {
        *slot = ua;
    }

    while b < m {
        let i = b;
        while b < m && (u[b + 1] - u[b]).abs() < eps {
            b += 1;
        }
        let mul = b - i + 1;
        mh += mul + t;
        let ub = u[b];
        let oldr = r;
        r = p as isize - mul as isize;

        let lbz = if oldr > 0 {
            ((oldr + 2) / 2) as usize
        } else if broken {
            0
        } else {
            1
        };
        let rbz = if r > 0 { ph - ((r + 1) / 2) as usize } else { ph };

        // Insert ub until the segment [ua, ub] is a Bézier segment.
        if r > 0 {
            let r = r as usize;
            let numer = ub - ua;
            for k in ((mul + 1)..=p).rev() {
                alfs[k - mul - 1] = numer / (u[a + k] - ua);
            }
            for j in 1..=r {
                let save = r - j;
                let s = mul + j;
                for k in (s..=p).rev() {
                    bpts[k] = bpts[k] * alfs[k - s] + bpts[k - 1] * (one - alfs[k - s]);
                }
                next_bpts[save] = bpts[p];
            }
        }

        for (i, slot) in ebpts.iter_mut().enumerate().skip(lbz) {
            let mut sum = Point4::zero();
            for j in i.saturating_sub(t)..=p.min(i) {
                sum = sum + bpts[j] * bezalfs[i][j];
            }
            *slot = sum;
        }

        // Remove the knot ua inserted for the previous segment.
        if oldr > 1 {
            let oldr = oldr as usize;
            let mut first = kind - 2;
            let mut last = kind;
            let den = ub - ua;
            let bet = (ub - uh[kind - 1]) / den;
            for tr in 1..oldr {
                let mut i = first;
                let mut j = last;
                let mut kj = j - kind + 1;
                while j - i > tr {
                    if i < cind {
                        let alf = (ub - uh[i]) / (ua - uh[i]);
                        qw[i] = qw[i] * alf + qw[i - 1] * (one - alf);
                    }
                    if j >= lbz {
                        let coefficient = if j - tr <= kind - ph + oldr {
                            (ub - uh[j - tr]) / den
                        } else {
                            bet
                        };
                        ebpts[kj] = ebpts[kj] * coefficient + ebpts[kj + 1] * (one - coefficient);
                    }
                    i += 1;
                    j -= 1;
                    kj -= 1;
                }
                first -= 1;
                last += 1;
            }
        }

        if a != p {
            for _ in 0..(ph as isize - oldr) as usize {
                uh[kind] = ua;
                kind += 1;
            }
        }

        for point in &ebpts[lbz..=rbz] {
            qw[cind] = *point;
            cind += 1;
        }

        if b < m {
            let kept = r.max(0) as usize;
            bpts[..kept].copy_from_slice(&next_bpts[..kept]);
            for j in kept..=p {
                bpts[j] = pw[b - p + j];
            }
            broken = r < 0;
            a = b;
            b += 1;
            ua = ub;
        } else {
            for i in 0..=ph {
                uh[kind + i] = ub;
            }
        }
    }

    let nh = mh - ph - 1;
    qw.truncate(nh + 1);
    uh.truncate(mh + 1);

    debug!(
        "elevated degree {} -> {}: {} -> {} control points",
        p,
        ph,
        pw.len(),
        qw.len()
    );
    NurbsCurve::from_parts(ph, KnotVector::new(uh), qw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Point3;
    use approx::assert_relative_eq;

    fn assert_same_shape(a: &NurbsCurve<f64>, b: &NurbsCurve<f64>) {
        let (lo, hi) = a.domain();
        assert_eq!(a.domain(), b.domain());
        for i in 0..=50 {
            let t = lo + (hi - lo) * i as f64 / 50.0;
            let pa = a.point_at(t).unwrap();
            let pb = b.point_at(t).unwrap();
            assert_relative_eq!(pa.x, pb.x, epsilon = 1e-9);
            assert_relative_eq!(pa.y, pb.y, epsilon = 1e-9);
            assert_relative_eq!(pa.z, pb.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_elevate_zero_times_is_copy() {
        let curve = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
        )
        .unwrap();
        assert_eq!(elevate_degree(&curve, 0), curve);
    }

    #[test]
    fn test_elevate_line_to_quadratic() {
        let curve = NurbsCurve::from_points(
            1,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
        )
        .unwrap();
        let elevated = elevate_degree(&curve, 1);
        assert_eq!(elevated.degree(), 2);
        assert_eq!(elevated.knots().as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let points = elevated.control_points();
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[1].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_elevate_bezier_quadratic() {
        let curve = NurbsCurve::from_points(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let elevated = elevate_degree(&curve, 2);
        assert_eq!(elevated.degree(), 4);
        assert_eq!(elevated.homogeneous_points().len(), 5);
        assert_same_shape(&curve, &elevated);
    }

    #[test]
    fn test_elevate_multi_span_cubic() {
        let curve = NurbsCurve::from_points(
            3,
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(2.0, -1.0, 1.0),
                Point3::new(3.0, 3.0, 0.0),
                Point3::new(4.0, 0.0, -1.0),
                Point3::new(5.0, 2.0, 0.0),
                Point3::new(6.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let elevated = elevate_degree(&curve, 1);
        assert_eq!(elevated.degree(), 4);
        // Each distinct interior knot gains one copy.
        assert_eq!(elevated.knots().multiplicity(1.0), 2);
        assert_eq!(elevated.knots().multiplicity(2.0), 3);
        assert!(elevated
            .knots()
            .are_valid(4, elevated.homogeneous_points().len()));
        assert_same_shape(&curve, &elevated);
    }

    #[test]
    fn test_elevate_rational_circle_quadrant() {
        let curve = NurbsCurve::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Some(vec![1.0, 1.0, 2.0]),
        )
        .unwrap();
        let elevated = elevate_degree(&curve, 3);
        assert_eq!(elevated.degree(), 5);
        assert_same_shape(&curve, &elevated);
    }

    #[test]
    fn test_elevate_through_full_multiplicity_knot() {
        let curve = NurbsCurve::from_points(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let (left, right) = curve.split(0.4).unwrap();
        let mut points = left.control_points();
        points.extend(right.control_points());
        let mut knots = left.knots().as_slice().to_vec();
        knots.truncate(knots.len() - 3);
        knots.extend_from_slice(right.knots().as_slice());
        let joined = NurbsCurve::from_points(2, knots, points).unwrap();

        let elevated = elevate_degree(&joined, 1);
        assert_eq!(elevated.knots().multiplicity(0.4), 4);
        assert!(elevated
            .knots()
            .are_valid(3, elevated.homogeneous_points().len()));
        assert_same_shape(&curve, &elevated);
    }
}
