//! Newton-Raphson iteration.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Smallest derivative magnitude accepted before the step is abandoned.
pub(crate) const MIN_DERIVATIVE: f64 = 1e-14;

/// Newton-Raphson: `x_{n+1} = x_n - f(x_n) / f'(x_n)`.
///
/// Converges when `|f(x)| < tolerance` or the step is smaller than
/// `tolerance`.
///
/// # Errors
///
/// - [`MathError::DivisionByZero`] when the derivative vanishes
/// - [`MathError::ConvergenceFailed`] when an iterate becomes non-finite or
///   the iteration cap is reached
///
/// # Example
///
/// ```rust
/// use coupon_math::solvers::{newton_raphson, SolverConfig};
///
/// let result = newton_raphson(|x| x * x - 2.0, |x| 2.0 * x, 1.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if !fx.is_finite() {
            return Err(MathError::convergence_failed(iteration, f64::INFINITY));
        }
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() < MIN_DERIVATIVE {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;
        log::trace!("newton iter {iteration}: x = {x:.12e}, f = {fx:.3e}");

        if !x.is_finite() {
            return Err(MathError::convergence_failed(iteration + 1, f64::INFINITY));
        }
        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(x).abs(),
    ))
}

/// Newton-Raphson with a central finite-difference derivative.
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    newton_raphson(&f, |x| central_difference(&f, x), initial_guess, config)
}

/// Central difference with a step scaled to `x`.
pub(crate) fn central_difference<F: Fn(f64) -> f64>(f: &F, x: f64) -> f64 {
    let h = 1e-7 * x.abs().max(1.0);
    (f(x + h) - f(x - h)) / (2.0 * h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let result =
            newton_raphson(|x| x * x - 2.0, |x| 2.0 * x, 1.5, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_numerical_derivative() {
        let result = newton_raphson_numerical(|x| x.exp() - 3.0, 1.0, &SolverConfig::default())
            .unwrap();
        assert_relative_eq!(result.root, 3.0f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_zero_derivative() {
        let err = newton_raphson(|x| x * x * x - 1.0, |x| 3.0 * x * x, 0.0, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, MathError::DivisionByZero { .. }));
    }

    #[test]
    fn test_iteration_cap() {
        // atan overshoots from far out and oscillates with growing amplitude
        let err = newton_raphson(
            f64::atan,
            |x| 1.0 / (1.0 + x * x),
            1.5,
            &SolverConfig::new(1e-12, 6),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MathError::ConvergenceFailed { .. } | MathError::DivisionByZero { .. }
        ));
    }
}
