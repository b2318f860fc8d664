//! Secant method.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Secant iteration from two starting points.
///
/// Superlinear near the root but not bracketed, so it can wander off.
///
/// # Errors
///
/// - [`MathError::DivisionByZero`] if two iterates have equal function values
/// - [`MathError::ConvergenceFailed`] on a non-finite iterate or the iteration cap
pub fn secant<F>(f: F, x0: f64, x1: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut x_prev = x0;
    let mut x = x1;
    let mut f_prev = f(x_prev);
    let mut fx = f(x);

    for iteration in 0..config.max_iterations {
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let denom = fx - f_prev;
        if denom.abs() < f64::MIN_POSITIVE {
            return Err(MathError::DivisionByZero { value: denom });
        }

        let step = fx * (x - x_prev) / denom;
        x_prev = x;
        f_prev = fx;
        x -= step;
        if !x.is_finite() {
            return Err(MathError::convergence_failed(iteration + 1, fx));
        }
        fx = f(x);

        if step.abs() < config.tolerance * (1.0 + x.abs()) && fx.abs() < config.tolerance.sqrt() {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: fx,
            });
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, fx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_root() {
        let result = secant(|x| x * x * x - 2.0, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 2f64.cbrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_flat_function() {
        let err = secant(|_| 1.0, 0.0, 1.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::DivisionByZero { .. }));
    }
}
