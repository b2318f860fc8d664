//! Analytics configuration.
//!
//! Every field has a serde default, so a partial JSON document is enough:
//!
//! ```rust
//! use coupon_analytics::config::AnalyticsConfig;
//!
//! let config = AnalyticsConfig::from_json(r#"{ "risk": { "bump_bps": 25.0 } }"#).unwrap();
//! assert_eq!(config.risk.bump_bps, 25.0);
//! assert_eq!(config.oas.tree_steps, 100);
//! ```

use serde::{Deserialize, Serialize};

use coupon_core::Compounding;
use coupon_curves::bumping::STANDARD_KEY_TENORS;
use coupon_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::error::{AnalyticsError, AnalyticsResult};

// =============================================================================
// PRICING
// =============================================================================

/// Price and yield conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Yield compounding; `None` is street convention (the bond's frequency).
    #[serde(default)]
    pub compounding: Option<Compounding>,

    /// Settlement lag override; `None` uses the bond's own lag.
    #[serde(default)]
    pub settlement_days: Option<u32>,

    /// Solver tolerance on price.
    #[serde(default = "default_tolerance")]
    pub solver_tolerance: f64,

    /// Solver iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            compounding: None,
            settlement_days: None,
            solver_tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl PricingConfig {
    /// Solver settings.
    #[must_use]
    pub fn solver(&self) -> SolverConfig {
        SolverConfig::new(self.solver_tolerance, self.max_iterations)
    }

    /// Sets a fixed yield compounding.
    #[must_use]
    pub fn with_compounding(mut self, compounding: Compounding) -> Self {
        self.compounding = Some(compounding);
        self
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver_tolerance = tolerance;
        self
    }
}

// =============================================================================
// RISK
// =============================================================================

/// Bump sizes and key tenors for curve risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Parallel bump for effective duration and convexity, in basis points.
    #[serde(default = "default_bump_bps")]
    pub bump_bps: f64,

    /// Key-rate bump, in basis points.
    #[serde(default = "default_key_rate_bump_bps")]
    pub key_rate_bump_bps: f64,

    /// Key tenors in years, ascending.
    #[serde(default = "default_key_tenors")]
    pub key_tenors: Vec<f64>,
}

fn default_bump_bps() -> f64 {
    10.0
}

fn default_key_rate_bump_bps() -> f64 {
    1.0
}

fn default_key_tenors() -> Vec<f64> {
    STANDARD_KEY_TENORS.to_vec()
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bump_bps: default_bump_bps(),
            key_rate_bump_bps: default_key_rate_bump_bps(),
            key_tenors: default_key_tenors(),
        }
    }
}

impl RiskConfig {
    /// Parallel bump as a decimal rate.
    #[must_use]
    pub fn bump(&self) -> f64 {
        self.bump_bps / 10_000.0
    }
}

// =============================================================================
// OAS
// =============================================================================

/// Short rate lattice parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OasConfig {
    /// Minimum number of lattice steps to maturity.
    #[serde(default = "default_tree_steps")]
    pub tree_steps: usize,

    /// Hull-White mean reversion speed.
    #[serde(default = "default_mean_reversion")]
    pub mean_reversion: f64,

    /// Hull-White short rate volatility (absolute).
    #[serde(default = "default_volatility")]
    pub volatility: f64,

    /// Slack allowed when comparing OAS with the Z-spread, in basis points.
    #[serde(default = "default_z_tolerance_bps")]
    pub z_tolerance_bps: f64,
}

fn default_tree_steps() -> usize {
    100
}

fn default_mean_reversion() -> f64 {
    0.03
}

fn default_volatility() -> f64 {
    0.01
}

fn default_z_tolerance_bps() -> f64 {
    0.01
}

impl Default for OasConfig {
    fn default() -> Self {
        Self {
            tree_steps: default_tree_steps(),
            mean_reversion: default_mean_reversion(),
            volatility: default_volatility(),
            z_tolerance_bps: default_z_tolerance_bps(),
        }
    }
}

impl OasConfig {
    /// Sets the volatility.
    #[must_use]
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Sets the mean reversion.
    #[must_use]
    pub fn with_mean_reversion(mut self, mean_reversion: f64) -> Self {
        self.mean_reversion = mean_reversion;
        self
    }

    /// Sets the minimum step count.
    #[must_use]
    pub fn with_tree_steps(mut self, steps: usize) -> Self {
        self.tree_steps = steps;
        self
    }
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// All analytics settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Price and yield conventions.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Curve risk settings.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Lattice settings.
    #[serde(default)]
    pub oas: OasConfig,
}

impl AnalyticsConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> AnalyticsResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalyticsError::invalid_config("json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> AnalyticsResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalyticsError::invalid_config("json", e.to_string()))
    }

    /// Rejects non-positive tolerances, bumps and step counts.
    pub fn validate(&self) -> AnalyticsResult<()> {
        fn positive(field: &str, value: f64) -> AnalyticsResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(AnalyticsError::invalid_config(
                    field,
                    format!("must be positive, got {value}"),
                ))
            }
        }

        positive("pricing.solver_tolerance", self.pricing.solver_tolerance)?;
        if self.pricing.max_iterations == 0 {
            return Err(AnalyticsError::invalid_config(
                "pricing.max_iterations",
                "must be positive",
            ));
        }
        positive("risk.bump_bps", self.risk.bump_bps)?;
        positive("risk.key_rate_bump_bps", self.risk.key_rate_bump_bps)?;
        if self.risk.key_tenors.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AnalyticsError::invalid_config(
                "risk.key_tenors",
                "must be strictly increasing",
            ));
        }
        if self.oas.tree_steps == 0 {
            return Err(AnalyticsError::invalid_config("oas.tree_steps", "must be positive"));
        }
        positive("oas.mean_reversion", self.oas.mean_reversion)?;
        if !(self.oas.volatility.is_finite() && self.oas.volatility >= 0.0) {
            return Err(AnalyticsError::invalid_config(
                "oas.volatility",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing.solver_tolerance, 1e-10);
        assert_eq!(config.pricing.max_iterations, 100);
        assert_eq!(config.risk.bump_bps, 10.0);
        assert_eq!(config.risk.key_tenors.len(), STANDARD_KEY_TENORS.len());
        assert_eq!(config.oas.tree_steps, 100);
    }

    #[test]
    fn test_json_round_trip() {
        let config = AnalyticsConfig {
            pricing: PricingConfig::default().with_compounding(Compounding::Annual),
            ..AnalyticsConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(AnalyticsConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_empty_document() {
        let config = AnalyticsConfig::from_json("{}").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_validation() {
        assert!(AnalyticsConfig::from_json(r#"{ "risk": { "bump_bps": 0.0 } }"#).is_err());
        assert!(AnalyticsConfig::from_json(r#"{ "oas": { "tree_steps": 0 } }"#).is_err());
        assert!(AnalyticsConfig::from_json(r#"{ "pricing": { "solver_tolerance": -1.0 } }"#).is_err());
        assert!(AnalyticsConfig::from_json(r#"{ "risk": { "key_tenors": [2.0, 1.0] } }"#).is_err());
        assert!(matches!(
            AnalyticsConfig::from_json("not json"),
            Err(AnalyticsError::InvalidConfig { .. })
        ));
    }
}
