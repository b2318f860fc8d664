//! Newton first, Brent fallback.

use crate::error::MathResult;
use crate::solvers::newton::{central_difference, MIN_DERIVATIVE};
use crate::solvers::{brent, find_bracket, SolverConfig, SolverResult};

/// Consecutive residual increases tolerated before Newton is abandoned.
const MAX_GROWING_STEPS: u32 = 3;

/// Expansion steps when no bracket is supplied.
const BRACKET_EXPANSIONS: u32 = 50;

/// Why the Newton phase gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Divergence {
    NonFinite,
    ZeroDerivative,
    Oscillation,
    IterationCap,
}

/// Newton-Raphson with a Brent safety net.
///
/// Newton runs from `initial_guess` using the analytic derivative. It is
/// abandoned on a non-finite step, a vanishing derivative, oscillation
/// (the residual growing for several consecutive steps) or the iteration
/// cap. Brent then runs on `bounds`, or on a bracket found by expanding
/// around the guess when `bounds` is `None`.
///
/// # Errors
///
/// - [`MathError::InvalidBracket`](crate::MathError::InvalidBracket) if the fallback interval has no sign change
/// - [`MathError::ConvergenceFailed`](crate::MathError::ConvergenceFailed) if Brent also hits the iteration cap
///
/// # Example
///
/// ```rust
/// use coupon_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let newton_iterations = match guarded_newton(&f, &df, initial_guess, config) {
        Ok(result) => return Ok(result),
        Err((reason, iterations)) => {
            log::debug!(
                "newton abandoned after {iterations} iterations ({reason:?}), falling back to brent"
            );
            iterations
        }
    };

    let (a, b) = match bounds {
        Some(bracket) => bracket,
        None => {
            let width = 0.1 * initial_guess.abs().max(0.1);
            find_bracket(&f, initial_guess - width, initial_guess + width, BRACKET_EXPANSIONS)?
        }
    };

    brent(&f, a, b, config).map(|mut result| {
        result.iterations += newton_iterations;
        result
    })
}

/// [`hybrid`] with a finite-difference derivative.
pub fn hybrid_numerical<F>(
    f: F,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    hybrid(&f, |x| central_difference(&f, x), initial_guess, bounds, config)
}

fn guarded_newton<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> Result<SolverResult, (Divergence, u32)>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut last_residual = f64::INFINITY;
    let mut growing = 0;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if !fx.is_finite() {
            return Err((Divergence::NonFinite, iteration));
        }
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if fx.abs() > last_residual {
            growing += 1;
            if growing >= MAX_GROWING_STEPS {
                return Err((Divergence::Oscillation, iteration));
            }
        } else {
            growing = 0;
        }
        last_residual = fx.abs();

        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() < MIN_DERIVATIVE {
            return Err((Divergence::ZeroDerivative, iteration));
        }

        let step = fx / dfx;
        x -= step;
        if !x.is_finite() {
            return Err((Divergence::NonFinite, iteration + 1));
        }

        if step.abs() < config.tolerance {
            let residual = f(x);
            if residual.is_finite() {
                return Ok(SolverResult {
                    root: x,
                    iterations: iteration + 1,
                    residual,
                });
            }
            return Err((Divergence::NonFinite, iteration + 1));
        }
    }

    Err((Divergence::IterationCap, config.max_iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_path() {
        let result =
            hybrid(|x| x * x - 2.0, |x| 2.0 * x, 1.5, None, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_falls_back_on_zero_derivative() {
        // Newton from 0 has f'(0) = 0; Brent finds the root on the bracket.
        let f = |x: f64| x * x * x - 1.0;
        let df = |x: f64| 3.0 * x * x;
        let result = hybrid(f, df, 0.0, Some((-2.0, 2.0)), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_falls_back_on_oscillation() {
        // Newton on atan from 1.5 diverges with growing residuals
        let result = hybrid(
            f64::atan,
            |x| 1.0 / (1.0 + x * x),
            1.5,
            Some((-1.0, 2.0)),
            &SolverConfig::default(),
        )
        .unwrap();
        assert!(result.root.abs() < 1e-9);
    }

    #[test]
    fn test_fallback_without_bounds_finds_bracket() {
        let result = hybrid_numerical(f64::atan, 1.5, None, &SolverConfig::default()).unwrap();
        assert!(result.root.abs() < 1e-9);
    }

    #[test]
    fn test_bad_bracket_is_reported() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;
        let err = hybrid(f, df, 0.0, Some((-1.0, 1.0)), &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));
    }
}
