//! Nelson-Siegel and Svensson zero-rate models.
//!
//! Both are fitted to market instruments by least squares rather than
//! interpolated through nodes; they implement [`Interpolator`] so a fitted
//! model can back a curve like any other scheme.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// `(1 - e^{-x}) / x`, with its series near zero.
fn slope_loading(x: f64) -> f64 {
    if x.abs() < 1e-8 {
        1.0 - x / 2.0 + x * x / 6.0
    } else {
        -(-x).exp_m1() / x
    }
}

/// `(1 - e^{-x}) / x - e^{-x}`.
fn hump_loading(x: f64) -> f64 {
    if x.abs() < 1e-8 {
        x / 2.0 - x * x / 3.0
    } else {
        slope_loading(x) - (-x).exp()
    }
}

/// Derivatives with respect to `x` of the two loadings.
fn loading_derivatives(x: f64) -> (f64, f64) {
    if x.abs() < 1e-8 {
        return (-0.5 + x / 3.0, 0.5 - 2.0 * x / 3.0);
    }
    let e = (-x).exp();
    let d1 = (e - slope_loading(x)) / x;
    (d1, d1 + e)
}

fn check_decay(name: &str, tau: f64) -> MathResult<()> {
    if tau > 0.0 && tau.is_finite() {
        Ok(())
    } else {
        Err(MathError::invalid_input(format!(
            "{name} must be positive, got {tau}"
        )))
    }
}

/// Nelson-Siegel zero curve.
///
/// ```text
/// z(t) = β₀ + β₁ L₁(t/τ) + β₂ L₂(t/τ)
/// f(t) = β₀ + β₁ e^{-t/τ} + β₂ (t/τ) e^{-t/τ}
/// ```
///
/// `β₀` is the long rate and `β₀ + β₁` the short rate.
///
/// ```rust
/// use coupon_math::interpolation::{Interpolator, NelsonSiegel};
///
/// let ns = NelsonSiegel::new(0.045, -0.02, 0.01, 2.0).unwrap();
/// assert!(ns.interpolate(0.25).unwrap() < ns.interpolate(30.0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelsonSiegel {
    beta0: f64,
    beta1: f64,
    beta2: f64,
    tau: f64,
}

impl NelsonSiegel {
    /// Number of free parameters.
    pub const PARAMETERS: usize = 4;

    /// Creates the model; `tau` must be positive.
    pub fn new(beta0: f64, beta1: f64, beta2: f64, tau: f64) -> MathResult<Self> {
        check_decay("tau", tau)?;
        Ok(Self {
            beta0,
            beta1,
            beta2,
            tau,
        })
    }

    /// Builds from `[β₀, β₁, β₂, τ]`.
    pub fn from_params(params: &[f64]) -> MathResult<Self> {
        match params {
            [b0, b1, b2, tau] => Self::new(*b0, *b1, *b2, *tau),
            _ => Err(MathError::DimensionMismatch {
                expected: Self::PARAMETERS,
                actual: params.len(),
            }),
        }
    }

    /// `[β₀, β₁, β₂, τ]`.
    #[must_use]
    pub fn params(&self) -> [f64; 4] {
        [self.beta0, self.beta1, self.beta2, self.tau]
    }

    /// Continuously compounded zero rate at `t` (`t ≤ 0` gives the short rate).
    #[must_use]
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }
        let x = t / self.tau;
        self.beta0 + self.beta1 * slope_loading(x) + self.beta2 * hump_loading(x)
    }

    /// Instantaneous forward rate at `t`.
    #[must_use]
    pub fn forward_rate(&self, t: f64) -> f64 {
        let x = t.max(0.0) / self.tau;
        let e = (-x).exp();
        self.beta0 + self.beta1 * e + self.beta2 * x * e
    }

    /// `exp(-z(t) t)`.
    #[must_use]
    pub fn discount_factor(&self, t: f64) -> f64 {
        (-self.zero_rate(t) * t.max(0.0)).exp()
    }
}

impl Interpolator for NelsonSiegel {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        if !t.is_finite() {
            return Err(MathError::invalid_input("non-finite time"));
        }
        Ok(self.zero_rate(t))
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        if !t.is_finite() {
            return Err(MathError::invalid_input("non-finite time"));
        }
        let x = t.max(0.0) / self.tau;
        let (d1, d2) = loading_derivatives(x);
        Ok((self.beta1 * d1 + self.beta2 * d2) / self.tau)
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

/// Svensson zero curve: Nelson-Siegel plus a second hump `β₃ L₂(t/τ₂)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svensson {
    beta0: f64,
    beta1: f64,
    beta2: f64,
    beta3: f64,
    tau1: f64,
    tau2: f64,
}

impl Svensson {
    /// Number of free parameters.
    pub const PARAMETERS: usize = 6;

    /// Creates the model; both decays must be positive.
    pub fn new(
        beta0: f64,
        beta1: f64,
        beta2: f64,
        beta3: f64,
        tau1: f64,
        tau2: f64,
    ) -> MathResult<Self> {
        check_decay("tau1", tau1)?;
        check_decay("tau2", tau2)?;
        Ok(Self {
            beta0,
            beta1,
            beta2,
            beta3,
            tau1,
            tau2,
        })
    }

    /// Builds from `[β₀, β₁, β₂, β₃, τ₁, τ₂]`.
    pub fn from_params(params: &[f64]) -> MathResult<Self> {
        match params {
            [b0, b1, b2, b3, t1, t2] => Self::new(*b0, *b1, *b2, *b3, *t1, *t2),
            _ => Err(MathError::DimensionMismatch {
                expected: Self::PARAMETERS,
                actual: params.len(),
            }),
        }
    }

    /// `[β₀, β₁, β₂, β₃, τ₁, τ₂]`.
    #[must_use]
    pub fn params(&self) -> [f64; 6] {
        [
            self.beta0, self.beta1, self.beta2, self.beta3, self.tau1, self.tau2,
        ]
    }

    /// Continuously compounded zero rate at `t`.
    #[must_use]
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }
        let x1 = t / self.tau1;
        let x2 = t / self.tau2;
        self.beta0
            + self.beta1 * slope_loading(x1)
            + self.beta2 * hump_loading(x1)
            + self.beta3 * hump_loading(x2)
    }

    /// Instantaneous forward rate at `t`.
    #[must_use]
    pub fn forward_rate(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        let x1 = t / self.tau1;
        let x2 = t / self.tau2;
        let e1 = (-x1).exp();
        self.beta0 + self.beta1 * e1 + self.beta2 * x1 * e1 + self.beta3 * x2 * (-x2).exp()
    }

    /// `exp(-z(t) t)`.
    #[must_use]
    pub fn discount_factor(&self, t: f64) -> f64 {
        (-self.zero_rate(t) * t.max(0.0)).exp()
    }
}

impl Interpolator for Svensson {
    fn interpolate(&self, t: f64) -> MathResult<f64> {
        if !t.is_finite() {
            return Err(MathError::invalid_input("non-finite time"));
        }
        Ok(self.zero_rate(t))
    }

    fn derivative(&self, t: f64) -> MathResult<f64> {
        if !t.is_finite() {
            return Err(MathError::invalid_input("non-finite time"));
        }
        let t = t.max(0.0);
        let (d1, d2) = loading_derivatives(t / self.tau1);
        let (_, d3) = loading_derivatives(t / self.tau2);
        Ok((self.beta1 * d1 + self.beta2 * d2) / self.tau1 + self.beta3 * d3 / self.tau2)
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
