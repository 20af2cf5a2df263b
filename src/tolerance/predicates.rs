//! Geometric predicates with explicit tolerance.

use crate::primitives::Point3;
use num_traits::Float;

/// Returns `true` if `a`, `b` and `c` lie on one line within `eps`.
///
/// The test compares the area of the parallelogram spanned by `b - a` and
/// `c - a` against `eps`, scaled by the longer of the two edges so the result
/// does not depend on the overall size of the input.
pub fn are_collinear<F: Float>(a: Point3<F>, b: Point3<F>, c: Point3<F>, eps: F) -> bool {
    let ab = b - a;
    let ac = c - a;
    let scale = ab.magnitude().max(ac.magnitude());
    if scale <= eps {
        return true;
    }
    ab.cross(ac).magnitude() / scale <= eps
}

/// Returns `true` if two points are closer than `eps`.
#[inline]
pub fn are_coincident<F: Float>(a: Point3<F>, b: Point3<F>, eps: F) -> bool {
    a.distance(b) <= eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let c = Point3::new(3.0, 3.0, 3.0);
        assert!(are_collinear(a, b, c, 1e-9));
    }

    #[test]
    fn test_not_collinear() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!(!are_collinear(a, b, c, 1e-9));
    }

    #[test]
    fn test_repeated_point_is_collinear() {
        let a = Point3::new(2.0, 1.0, 0.0);
        assert!(are_collinear(a, a, a, 1e-9));
    }

    #[test]
    fn test_coincident() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0, 2.0, 3.0 + 1e-12);
        assert!(are_coincident(a, b, 1e-9));
        assert!(!are_coincident(a, Point3::new(1.0, 2.0, 4.0), 1e-9));
    }
}
