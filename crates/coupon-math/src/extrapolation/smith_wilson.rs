//! Smith-Wilson curve fitting and extrapolation.
//!
//! The discount function is
//!
//! ```text
//! P(t) = e^{-ωt} + Σⱼ ζⱼ W(t, uⱼ)
//! W(t, u) = e^{-ω(t+u)} (α min(t,u) - e^{-α max(t,u)} sinh(α min(t,u)))
//! ```
//!
//! with `ω = ln(1 + UFR)`. The weights `ζ` are solved so that `P` matches the
//! input discount factors exactly; beyond the inputs the instantaneous forward
//! converges to `ω`.

use nalgebra::{DMatrix, DVector};

use super::Extrapolator;
use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;
use crate::linear_algebra::solve_linear_system;

/// A fitted Smith-Wilson discount function.
///
/// ```rust
/// use coupon_math::extrapolation::SmithWilson;
///
/// let maturities = [1.0, 5.0, 20.0];
/// let dfs: Vec<f64> = maturities.iter().map(|t: &f64| (-0.03 * t).exp()).collect();
/// let sw = SmithWilson::fit(0.042, 0.1, &maturities, &dfs).unwrap();
/// assert!((sw.discount_factor(5.0) - dfs[1]).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SmithWilson {
    ufr: f64,
    alpha: f64,
    omega: f64,
    maturities: Vec<f64>,
    weights: Vec<f64>,
}

impl SmithWilson {
    /// Fits the weights to `(maturity, discount factor)` pairs.
    ///
    /// # Errors
    ///
    /// Invalid parameters, unsorted or non-positive maturities, non-positive
    /// discount factors, or a singular kernel matrix.
    pub fn fit(ufr: f64, alpha: f64, maturities: &[f64], dfs: &[f64]) -> MathResult<Self> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "alpha must be positive, got {alpha}"
            )));
        }
        if !(ufr > -1.0 && ufr.is_finite()) {
            return Err(MathError::invalid_input(format!("invalid UFR {ufr}")));
        }
        if maturities.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if maturities.len() != dfs.len() {
            return Err(MathError::DimensionMismatch {
                expected: maturities.len(),
                actual: dfs.len(),
            });
        }
        if maturities[0] <= 0.0 || maturities.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "maturities must be positive and strictly increasing",
            ));
        }
        if dfs.iter().any(|&p| !(p > 0.0 && p.is_finite())) {
            return Err(MathError::invalid_input("discount factors must be positive"));
        }

        let omega = ufr.ln_1p();
        let n = maturities.len();
        let kernel = DMatrix::from_fn(n, n, |i, j| {
            wilson(maturities[i], maturities[j], alpha, omega)
        });
        let rhs = DVector::from_fn(n, |i, _| dfs[i] - (-omega * maturities[i]).exp());
        let weights = solve_linear_system(&kernel, &rhs)?;

        Ok(Self {
            ufr,
            alpha,
            omega,
            maturities: maturities.to_vec(),
            weights: weights.iter().copied().collect(),
        })
    }

    /// Ultimate forward rate (annually compounded).
    #[must_use]
    pub fn ufr(&self) -> f64 {
        self.ufr
    }

    /// Convergence speed.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Continuously compounded UFR, the long-end forward.
    #[must_use]
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Fitted discount factor at `t ≥ 0`.
    #[must_use]
    pub fn discount_factor(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        (-self.omega * t).exp()
            + self
                .maturities
                .iter()
                .zip(&self.weights)
                .map(|(&u, &zeta)| zeta * wilson(t, u, self.alpha, self.omega))
                .sum::<f64>()
    }

    /// Continuously compounded zero rate at `t`.
    #[must_use]
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.instantaneous_forward(0.0);
        }
        -self.discount_factor(t).ln() / t
    }

    /// Instantaneous forward `-d ln P / dt`, by central difference.
    #[must_use]
    pub fn instantaneous_forward(&self, t: f64) -> f64 {
        let h = 1e-5;
        let lo = (t - h).max(0.0);
        let hi = t + h;
        -(self.discount_factor(hi).ln() - self.discount_factor(lo).ln()) / (hi - lo)
    }
}

fn wilson(t: f64, u: f64, alpha: f64, omega: f64) -> f64 {
    let lo = t.min(u);
    let hi = t.max(u);
    (-omega * (t + u)).exp() * (alpha * lo - (-alpha * hi).exp() * (alpha * lo).sinh())
}

impl Extrapolator for SmithWilson {
    /// Chains the Smith-Wilson forward curve onto the last point, so the
    /// result is continuous at `last_t` whatever the fit inputs were.
    fn extrapolate(&self, t: f64, last_t: f64, last_value: f64, _last_derivative: f64) -> f64 {
        if t <= last_t || t <= 0.0 {
            return last_value;
        }
        let ratio = self.discount_factor(t) / self.discount_factor(last_t);
        (last_value * last_t - ratio.ln()) / t
    }

    fn name(&self) -> &'static str {
        "Smith-Wilson"
    }
}

impl Interpolator for SmithWilson {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        if !x.is_finite() || x < 0.0 {
            return Err(MathError::invalid_input(format!("invalid time {x}")));
        }
        Ok(self.zero_rate(x))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        if !x.is_finite() || x <= 0.0 {
            return Err(MathError::invalid_input(format!("invalid time {x}")));
        }
        Ok((self.instantaneous_forward(x) - self.zero_rate(x)) / x)
    }

    fn min_x(&self) -> f64 {
        0.0
    }

    fn max_x(&self) -> f64 {
        f64::INFINITY
    }

    fn allows_extrapolation(&self) -> bool {
        true
    }
}
