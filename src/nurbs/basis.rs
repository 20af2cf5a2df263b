//! B-spline basis functions and their derivatives.
//!
//! Both routines use the triangular Cox-de Boor table from Piegl & Tiller,
//! *The NURBS Book*, algorithms A2.2 and A2.3. Only the `degree + 1`
//! functions that can be non-zero on the given span are computed.

use crate::tolerance::from_usize;
use num_traits::Float;

/// Evaluates the `degree + 1` non-vanishing basis functions at `parameter`.
///
/// `span` must be the knot span containing `parameter` (see
/// [`KnotVector::span`](crate::knots::KnotVector::span)). Entry `j` of the
/// result is `N[span - degree + j]`. The values sum to one.
///
/// # Example
///
/// ```
/// use splinekit::nurbs::basis_functions;
///
/// let knots = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 5.0, 5.0, 5.0];
/// let n = basis_functions(2, &knots, 4, 2.5);
/// assert_eq!(n, vec![0.125, 0.75, 0.125]);
/// ```
pub fn basis_functions<F: Float>(degree: usize, knots: &[F], span: usize, parameter: F) -> Vec<F> {
    let mut n = vec![F::zero(); degree + 1];
    let mut left = vec![F::zero(); degree + 1];
    let mut right = vec![F::zero(); degree + 1];
    n[0] = F::one();

    for j in 1..=degree {
        left[j] = parameter - knots[span + 1 - j];
        right[j] = knots[span + j] - parameter;
        let mut saved = F::zero();

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }

    n
}

/// Evaluates the non-vanishing basis functions and their derivatives up to `order`.
///
/// Returns an `(order + 1) × (degree + 1)` table where row `k` holds the
/// `k`-th derivatives. Derivatives above `degree` vanish identically and are
/// returned as rows of zeros.
pub fn derivative_basis_functions<F: Float>(
    span: usize,
    parameter: F,
    degree: usize,
    order: usize,
    knots: &[F],
) -> Vec<Vec<F>> {
    let p = degree;
    let zero = F::zero();

    // Upper triangle holds basis functions, lower triangle the knot differences.
    let mut ndu = vec![vec![zero; p + 1]; p + 1];
    let mut left = vec![zero; p + 1];
    let mut right = vec![zero; p + 1];
    ndu[0][0] = F::one();

    for j in 1..=p {
        left[j] = parameter - knots[span + 1 - j];
        right[j] = knots[span + j] - parameter;
        let mut saved = zero;

        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    let mut ders = vec![vec![zero; p + 1]; order + 1];
    for (j, d) in ders[0].iter_mut().enumerate() {
        *d = ndu[j][p];
    }

    let top = order.min(p);
    let mut a = vec![vec![zero; p + 1]; 2];

    for r in 0..=p {
        let (mut s1, mut s2) = (0usize, 1usize);
        a[0][0] = F::one();

        for k in 1..=top {
            let mut d = zero;
            let rk = r as isize - k as isize;
            let pk = p - k;

            if rk >= 0 {
                a[s2][0] = a[s1][0] / ndu[pk + 1][rk as usize];
                d = a[s2][0] * ndu[rk as usize][pk];
            }

            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r <= pk + 1 { k - 1 } else { p - r };

            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][idx];
                d = d + a[s2][j] * ndu[idx][pk];
            }

            if r <= pk {
                a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                d = d + a[s2][k] * ndu[r][pk];
            }

            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    // Multiply through by degree·(degree-1)·…·(degree-k+1).
    let mut factor = from_usize::<F>(p);
    for k in 1..=top {
        for d in ders[k].iter_mut() {
            *d = *d * factor;
        }
        factor = factor * from_usize::<F>(p - k);
    }

    ders
}

/// Binomial coefficient `C(n, k)` as a float; zero when `k > n`.
pub fn binomial<F: Float>(n: usize, k: usize) -> F {
    if k > n {
        return F::zero();
    }
    let k = k.min(n - k);
    let mut result = F::one();
    for i in 0..k {
        result = result * from_usize::<F>(n - i) / from_usize::<F>(i + 1);
    }
    result.round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knots::KnotVector;
    use approx::assert_relative_eq;

    const KNOTS: [f64; 11] = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 5.0, 5.0, 5.0];

    #[test]
    fn test_basis_functions_known_values() {
        let n = basis_functions(2, &KNOTS, 4, 2.5);
        assert_eq!(n.len(), 3);
        assert_relative_eq!(n[0], 0.125, epsilon = 1e-12);
        assert_relative_eq!(n[1], 0.75, epsilon = 1e-12);
        assert_relative_eq!(n[2], 0.125, epsilon = 1e-12);
        assert_relative_eq!(n.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_partition_of_unity() {
        let knots = KnotVector::new(KNOTS.to_vec());
        for i in 0..=200 {
            let t = 5.0 * i as f64 / 200.0;
            let span = knots.span(2, t);
            let n = basis_functions(2, &KNOTS, span, t);
            assert_relative_eq!(n.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            assert!(n.iter().all(|&v| v >= -1e-12));
        }
    }

    #[test]
    fn test_derivatives_row_zero_matches_basis() {
        let ders = derivative_basis_functions(4, 2.5, 2, 2, &KNOTS);
        let n = basis_functions(2, &KNOTS, 4, 2.5);
        for j in 0..3 {
            assert_relative_eq!(ders[0][j], n[j], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_derivatives_known_values() {
        // Piegl & Tiller example 2.4: N'_{2,2}(2.5) = -0.5, N'_{3,2} = 0, N'_{4,2} = 0.5
        let ders = derivative_basis_functions(4, 2.5, 2, 2, &KNOTS);
        assert_relative_eq!(ders[1][0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(ders[1][1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ders[1][2], 0.5, epsilon = 1e-12);
        // Second derivatives: 1, -2, 1
        assert_relative_eq!(ders[2][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ders[2][1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(ders[2][2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivatives_sum_to_zero() {
        let knots = [0.0, 0.0, 0.0, 0.0, 0.3, 0.5, 0.9, 1.0, 1.0, 1.0, 1.0];
        let kv = KnotVector::new(knots.to_vec());
        for i in 0..=50 {
            let t = i as f64 / 50.0;
            let ders = derivative_basis_functions(kv.span(3, t), t, 3, 3, &knots);
            for row in ders.iter().skip(1) {
                assert_relative_eq!(row.iter().sum::<f64>(), 0.0, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_derivatives_above_degree_vanish() {
        let ders = derivative_basis_functions(4, 2.5, 2, 4, &KNOTS);
        assert_eq!(ders.len(), 5);
        assert!(ders[3].iter().all(|&v| v == 0.0));
        assert!(ders[4].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial::<f64>(5, 0), 1.0);
        assert_eq!(binomial::<f64>(5, 2), 10.0);
        assert_eq!(binomial::<f64>(6, 3), 20.0);
        assert_eq!(binomial::<f64>(3, 4), 0.0);
    }

    #[test]
    fn test_f32_support() {
        let knots: Vec<f32> = KNOTS.iter().map(|&k| k as f32).collect();
        let n = basis_functions(2, &knots, 4, 2.5_f32);
        assert!((n.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }
}
