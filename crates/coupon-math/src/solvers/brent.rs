//! Brent's method.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Brent's method on the bracket `[a, b]`.
///
/// Inverse quadratic interpolation and secant steps, falling back to
/// bisection whenever the interpolated point is unsafe, so the bracket
/// always shrinks.
///
/// Returns once `|f(b)| < tolerance`. A bracket that shrinks to floating
/// point resolution first (a jump through zero rather than a root) also
/// returns, with the remaining `residual` reported.
///
/// # Errors
///
/// - [`MathError::InvalidBracket`] if `f(a)` and `f(b)` have the same sign
///   (or either is non-finite)
/// - [`MathError::ConvergenceFailed`] if the iteration cap is reached
///
/// # Example
///
/// ```rust
/// use coupon_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    let same_sign = fa != 0.0 && fb != 0.0 && fa.signum() == fb.signum();
    if !fa.is_finite() || !fb.is_finite() || same_sign {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }
    if fa == 0.0 {
        return Ok(SolverResult {
            root: a,
            iterations: 0,
            residual: 0.0,
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..config.max_iterations {
        // Keep the root between b and c.
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        // b is the best estimate.
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        // Smallest bracket floating point can still split.
        let tol = 2.0 * f64::EPSILON * b.abs() + f64::MIN_POSITIVE;
        let half = 0.5 * (c - b);

        if fb.abs() < config.tolerance || half.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * half * s, 1.0 - s)
            } else {
                // Inverse quadratic
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * half * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let limit_interp = 3.0 * half * q - (tol * q).abs();
            let limit_prev = (e * q).abs();
            if 2.0 * p < limit_interp.min(limit_prev) {
                e = d;
                d = p / q;
            } else {
                d = half;
                e = d;
            }
        } else {
            d = half;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(half) };
        fb = f(b);
        log::trace!("brent iter {iteration}: b = {b:.12e}, f = {fb:.3e}");

        if !fb.is_finite() {
            return Err(MathError::convergence_failed(iteration + 1, f64::INFINITY));
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        fb.abs(),
    ))
}
