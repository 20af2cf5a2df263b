//! Bounded one-dimensional Newton iterations.

use crate::error::{SplineError, SplineResult};
use crate::tolerance::MAX_ITERATIONS;
use log::warn;
use num_traits::Float;

/// Finds a root of `f` on `[lo, hi]` where `f(lo)` and `f(hi)` differ in sign.
///
/// `f` returns the value and its derivative. Newton steps that leave the
/// current bracket are replaced by bisection, so the iteration always
/// converges. Stops when `|f| <= tolerance` or the bracket collapses; after
/// `MAX_ITERATIONS` the best estimate is returned with a warning.
///
/// Returns [`SplineError::DegenerateInput`] if the ends do not bracket a root.
pub fn newton_bisect<F, E>(mut f: E, lo: F, hi: F, guess: F, tolerance: F) -> SplineResult<F>
where
    F: Float,
    E: FnMut(F) -> SplineResult<(F, F)>,
{
    let (mut a, mut b) = (lo.min(hi), lo.max(hi));
    let (fa, _) = f(a)?;
    if fa.abs() <= tolerance {
        return Ok(a);
    }
    let (fb, _) = f(b)?;
    if fb.abs() <= tolerance {
        return Ok(b);
    }
    if fa.signum() == fb.signum() {
        return Err(SplineError::DegenerateInput);
    }
    let sign_a = fa.signum();
    let two = F::one() + F::one();

    let mut t = if guess > a && guess < b { guess } else { (a + b) / two };
    for _ in 0..MAX_ITERATIONS {
        let (ft, dft) = f(t)?;
        if ft.abs() <= tolerance {
            return Ok(t);
        }
        if ft.signum() == sign_a {
            a = t;
        } else {
            b = t;
        }
        if b - a <= F::epsilon() * (F::one() + t.abs()) {
            return Ok(t);
        }

        let newton = t - ft / dft;
        t = if newton.is_finite() && newton > a && newton < b {
            newton
        } else {
            (a + b) / two
        };
    }

    warn!(
        "bracketed newton stopped after {} iterations at t = {:?}",
        MAX_ITERATIONS,
        t.to_f64()
    );
    Ok(t)
}

/// Runs Newton's method on `f` from `guess`, clamping every iterate to
/// `[lo, hi]`.
///
/// Succeeds when `|f| <= tolerance` or the step falls below `step_tolerance`
/// (which includes stalling against a bound). Fails with
/// [`SplineError::ConvergenceFailed`] on a vanishing derivative or after
/// `MAX_ITERATIONS` steps.
pub fn newton_clamped<F, E>(
    mut f: E,
    lo: F,
    hi: F,
    guess: F,
    tolerance: F,
    step_tolerance: F,
) -> SplineResult<F>
where
    F: Float,
    E: FnMut(F) -> SplineResult<(F, F)>,
{
    let mut t = guess.max(lo).min(hi);
    for iteration in 0..MAX_ITERATIONS {
        let (ft, dft) = f(t)?;
        if ft.abs() <= tolerance {
            return Ok(t);
        }
        if !(dft.abs() > F::epsilon()) {
            return Err(SplineError::ConvergenceFailed {
                iterations: iteration,
            });
        }
        let next = (t - ft / dft).max(lo).min(hi);
        if (next - t).abs() <= step_tolerance {
            return Ok(next);
        }
        t = next;
    }

    warn!("newton iteration hit the cap of {} iterations", MAX_ITERATIONS);
    Err(SplineError::ConvergenceFailed {
        iterations: MAX_ITERATIONS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_bisect_sqrt2() {
        let root = newton_bisect(|x: f64| Ok((x * x - 2.0, 2.0 * x)), 0.0, 2.0, 1.0, 1e-14).unwrap();
        assert_relative_eq!(root, 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_newton_bisect_triple_root() {
        // The guess lies outside the bracket, so the search starts by bisecting.
        let root =
            newton_bisect(|x: f64| Ok((x * x * x, 3.0 * x * x)), -1.0, 2.0, 5.0, 1e-12).unwrap();
        assert!(root.abs() < 1e-4);
    }

    #[test]
    fn test_newton_bisect_requires_bracket() {
        let result = newton_bisect(|x: f64| Ok((x * x + 1.0, 2.0 * x)), -1.0, 1.0, 0.0, 1e-12);
        assert_eq!(result, Err(SplineError::DegenerateInput));
    }

    #[test]
    fn test_newton_bisect_propagates_errors() {
        let result = newton_bisect(
            |_x: f64| -> SplineResult<(f64, f64)> { Err(SplineError::NonFinite) },
            0.0,
            1.0,
            0.5,
            1e-12,
        );
        assert_eq!(result, Err(SplineError::NonFinite));
    }

    #[test]
    fn test_newton_clamped_converges() {
        let root =
            newton_clamped(|x: f64| Ok((x.cos() - x, -x.sin() - 1.0)), 0.0, 1.0, 0.5, 1e-14, 0.0)
                .unwrap();
        assert_relative_eq!(root, 0.739_085_133_215_160_6, epsilon = 1e-12);
    }

    #[test]
    fn test_newton_clamped_stalls_on_bound() {
        // The root at x = 3 lies outside the interval; the iterate sticks at 1.
        let t = newton_clamped(|x: f64| Ok((x - 3.0, 1.0)), 0.0, 1.0, 0.5, 1e-12, 1e-12).unwrap();
        assert_eq!(t, 1.0);
    }

    #[test]
    fn test_newton_clamped_zero_derivative() {
        let result = newton_clamped(|_x: f64| Ok((1.0, 0.0)), 0.0, 1.0, 0.5, 1e-12, 1e-12);
        assert_eq!(
            result,
            Err(SplineError::ConvergenceFailed { iterations: 0 })
        );
    }
}
