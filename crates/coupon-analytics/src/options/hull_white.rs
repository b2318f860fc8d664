//! Hull-White one-factor short rate model.
//!
//! ```text
//! dr = (θ(t) − a·r) dt + σ dW
//! ```
//!
//! `θ(t)` is never written down: the lattice fits the initial curve
//! directly. The model contributes the variance of the deviation
//! `x(t) = r(t) − α(t)`:
//!
//! ```text
//! V(t) = σ² (1 − e^{−2at}) / (2a)
//! ```

use serde::{Deserialize, Serialize};

use super::ShortRateModel;
use crate::config::OasConfig;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Below this speed the variance uses its small-`a` expansion.
const SMALL_REVERSION: f64 = 1e-8;

/// Hull-White model parameters.
///
/// ```rust
/// use coupon_analytics::options::{HullWhite, ShortRateModel};
///
/// let model = HullWhite::new(0.03, 0.01).unwrap();
/// // about σ²t for short horizons
/// assert!((model.variance(0.1) - 1e-5).abs() < 1e-7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullWhite {
    mean_reversion: f64,
    volatility: f64,
}

impl HullWhite {
    /// Creates a model.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a negative or non-finite speed or volatility.
    pub fn new(mean_reversion: f64, volatility: f64) -> AnalyticsResult<Self> {
        if !(mean_reversion.is_finite() && mean_reversion >= 0.0) {
            return Err(AnalyticsError::invalid_config(
                "mean_reversion",
                format!("must be non-negative, got {mean_reversion}"),
            ));
        }
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(AnalyticsError::invalid_config(
                "volatility",
                format!("must be non-negative, got {volatility}"),
            ));
        }
        Ok(Self {
            mean_reversion,
            volatility,
        })
    }

    /// Model from lattice settings.
    pub fn from_config(config: &OasConfig) -> AnalyticsResult<Self> {
        Self::new(config.mean_reversion, config.volatility)
    }

    /// 3% mean reversion, 1% volatility.
    #[must_use]
    pub fn default_params() -> Self {
        Self {
            mean_reversion: 0.03,
            volatility: 0.01,
        }
    }
}

impl Default for HullWhite {
    fn default() -> Self {
        Self::default_params()
    }
}

impl ShortRateModel for HullWhite {
    fn variance(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let a = self.mean_reversion;
        let s2 = self.volatility * self.volatility;
        if a < SMALL_REVERSION {
            s2 * t * (1.0 - a * t)
        } else {
            s2 * (1.0 - (-2.0 * a * t).exp()) / (2.0 * a)
        }
    }

    fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    fn volatility(&self) -> f64 {
        self.volatility
    }

    fn name(&self) -> &'static str {
        "Hull-White"
    }
}
