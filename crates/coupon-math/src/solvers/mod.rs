//! One-dimensional root finding.
//!
//! - [`newton_raphson`]: quadratic convergence, needs a derivative
//! - [`brent`]: guaranteed on a sign-changing bracket
//! - [`bisection`]: slow but simple bracketing method
//! - [`secant`]: derivative-free open method
//! - [`hybrid`]: Newton first, Brent on a bracket when Newton diverges
//! - [`find_bracket`]: geometric expansion until the sign changes
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton-Raphson | Quadratic | May diverge | Derivative |
//! | Brent | Superlinear | Guaranteed | Bracket |
//! | Secant | Superlinear | May diverge | Two guesses |
//! | Bisection | Linear | Guaranteed | Bracket |
//! | Hybrid | Quadratic | Guaranteed* | Guess (+ bracket) |
//!
//! *Provided a bracket is supplied or can be found.
//!
//! # Example: yield from price
//!
//! ```rust
//! use coupon_math::solvers::{hybrid, SolverConfig};
//!
//! // 5% annual coupon, 5 years, price 95
//! let price = |y: f64| (1..=5).map(|t| 5.0 / (1.0 + y).powi(t)).sum::<f64>() + 100.0 / (1.0 + y).powi(5);
//! let f = |y: f64| price(y) - 95.0;
//! let df = |y: f64| {
//!     (1..=5).map(|t| -(t as f64) * 5.0 / (1.0 + y).powi(t + 1)).sum::<f64>()
//!         - 500.0 / (1.0 + y).powi(6)
//! };
//!
//! let result = hybrid(f, df, 0.05, Some((-1.0, 1.0)), &SolverConfig::default()).unwrap();
//! assert!(result.root > 0.05);
//! ```

mod bisection;
mod bracket;
mod brent;
mod hybrid;
mod newton;
mod secant;

pub use bisection::bisection;
pub use bracket::find_bracket;
pub use brent::brent;
pub use hybrid::{hybrid, hybrid_numerical};
pub use newton::{newton_raphson, newton_raphson_numerical};
pub use secant::secant;

/// Default absolute tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default fallback bracket for yields.
pub const YIELD_BRACKET: (f64, f64) = (-1.0, 1.0);

/// Default bracket for spreads.
pub const SPREAD_BRACKET: (f64, f64) = (-0.01, 0.20);

/// Widened spread bracket used when [`SPREAD_BRACKET`] has no sign change.
pub const WIDE_SPREAD_BRACKET: (f64, f64) = (-0.05, 1.0);

/// Tolerance and iteration cap shared by all solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Convergence tolerance on |f(x)|. Newton, secant and bisection also
    /// stop on a final step or half-width below it; Brent does not.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Outcome of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root.
    pub root: f64,
    /// Iterations used.
    pub iterations: u32,
    /// f(root).
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    fn bond_price(y: f64, coupon: f64, years: i32, freq: i32) -> f64 {
        let n = years * freq;
        let c = coupon / f64::from(freq);
        let r = y / f64::from(freq);
        (1..=n).map(|k| c / (1.0 + r).powi(k)).sum::<f64>() + 100.0 / (1.0 + r).powi(n)
    }

    fn bond_dprice(y: f64, coupon: f64, years: i32, freq: i32) -> f64 {
        let n = years * freq;
        let c = coupon / f64::from(freq);
        let r = y / f64::from(freq);
        let fq = f64::from(freq);
        (1..=n)
            .map(|k| -(f64::from(k) / fq) * c / (1.0 + r).powi(k + 1))
            .sum::<f64>()
            - (f64::from(n) / fq) * 100.0 / (1.0 + r).powi(n + 1)
    }

    #[test]
    fn test_config_builders() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);
        assert_eq!(config.tolerance, 1e-8);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(SolverConfig::default().tolerance, 1e-10);
        assert_eq!(SolverConfig::default().max_iterations, 100);
    }

    #[test]
    fn test_par_bond_yield_is_coupon() {
        let f = |y: f64| bond_price(y, 5.0, 10, 2) - 100.0;
        let df = |y: f64| bond_dprice(y, 5.0, 10, 2);
        let result = newton_raphson(f, df, 0.03, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.05, epsilon = 1e-10);
    }

    #[test]
    fn test_all_solvers_agree() {
        let f = |y: f64| bond_price(y, 6.0, 7, 2) - 98.0;
        let df = |y: f64| bond_dprice(y, 6.0, 7, 2);
        let config = SolverConfig::default();

        let newton = newton_raphson(f, df, 0.06, &config).unwrap().root;
        let brent_root = brent(f, 0.0, 0.20, &config).unwrap().root;
        let hybrid_root = hybrid(f, df, 0.06, Some(YIELD_BRACKET), &config).unwrap().root;
        let secant_root = secant(f, 0.05, 0.07, &config).unwrap().root;
        let bisect_root = bisection(f, 0.0, 0.20, &config.with_max_iterations(200))
            .unwrap()
            .root;

        assert_relative_eq!(newton, brent_root, epsilon = 1e-9);
        assert_relative_eq!(newton, hybrid_root, epsilon = 1e-9);
        assert_relative_eq!(newton, secant_root, epsilon = 1e-9);
        assert_relative_eq!(newton, bisect_root, epsilon = 1e-8);
    }

    #[test]
    fn test_bracket_failure_is_distinct_from_iteration_cap() {
        let no_root = |x: f64| x * x + 1.0;
        let err = brent(no_root, -1.0, 1.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));

        let slow = |x: f64| x - 0.123_456_789;
        let err = bisection(slow, 0.0, 1.0, &SolverConfig::new(1e-14, 5)).unwrap_err();
        assert!(matches!(err, MathError::ConvergenceFailed { iterations: 5, .. }));
    }

    #[test]
    fn test_spread_like_problem() {
        let pv = |s: f64| {
            (1..=5)
                .map(|t| {
                    let t = f64::from(t);
                    let cf = if t == 5.0 { 105.0 } else { 5.0 };
                    cf * (-(0.03 + s) * t).exp()
                })
                .sum::<f64>()
        };
        let f = |s: f64| pv(s) - 97.0;
        let (a, b) = SPREAD_BRACKET;
        let result = brent(f, a, b, &SolverConfig::default()).unwrap();
        assert!(result.root > 0.0);
        assert!(f(result.root).abs() < 1e-10);
    }
}
