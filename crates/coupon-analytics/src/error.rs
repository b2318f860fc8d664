//! Error types for pricing, spread and risk calculations.
//!
//! Errors from the lower layers are carried unchanged, so a caller can still
//! tell a bracket failure from an iteration cap or a curve validation
//! failure from an out-of-range query.

use coupon_bonds::BondError;
use coupon_core::CoreError;
use coupon_curves::CurveError;
use coupon_math::MathError;
use thiserror::Error;

/// A specialized Result type for analytics.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors raised by the analytics layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// An argument is invalid (non-positive price, empty cash flows, ...).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },

    /// Settlement on or after maturity.
    #[error("Invalid settlement: settlement {settlement} must be before maturity {maturity}")]
    InvalidSettlement {
        /// Settlement date.
        settlement: String,
        /// Maturity date.
        maturity: String,
    },

    /// The option-adjusted spread came out above the Z-spread of a bond
    /// that only carries calls.
    #[error("OAS {oas_bps:.4}bp exceeds Z-spread {z_spread_bps:.4}bp")]
    OasExceedsZSpread {
        /// OAS in basis points.
        oas_bps: f64,
        /// Z-spread in basis points.
        z_spread_bps: f64,
    },

    /// The short rate lattice could not be built.
    #[error("Lattice calibration failed at step {step}: {reason}")]
    LatticeCalibration {
        /// Time step that failed.
        step: usize,
        /// Why.
        reason: String,
    },

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Offending field.
        field: String,
        /// Why.
        reason: String,
    },

    /// Root finding failed (bracket or iteration cap).
    #[error(transparent)]
    Math(#[from] MathError),

    /// Date or convention error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Curve query or construction error.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Bond definition or cash flow error.
    #[error(transparent)]
    Bond(BondError),
}

impl AnalyticsError {
    /// Invalid argument.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Settlement on or after maturity.
    #[must_use]
    pub fn invalid_settlement(settlement: impl ToString, maturity: impl ToString) -> Self {
        Self::InvalidSettlement {
            settlement: settlement.to_string(),
            maturity: maturity.to_string(),
        }
    }

    /// Rejected configuration value.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for an iteration cap, as opposed to a bracket failure.
    #[must_use]
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::Math(MathError::ConvergenceFailed { .. }))
    }

    /// True when the solver bracket had no sign change.
    #[must_use]
    pub fn is_bracket_failure(&self) -> bool {
        matches!(self, Self::Math(MathError::InvalidBracket { .. }))
    }
}

impl From<BondError> for AnalyticsError {
    fn from(err: BondError) -> Self {
        match err {
            BondError::InvalidSettlement {
                settlement,
                maturity,
            } => Self::InvalidSettlement {
                settlement,
                maturity,
            },
            other => Self::Bond(other),
        }
    }
}
