//! Error types for curve construction and queries.

use coupon_core::CoreError;
use coupon_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised by curves, instruments and bootstrapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Query time is negative, non-finite, or past the last pillar with no
    /// extrapolation configured.
    #[error("Time {t} out of range [{min}, {max}]")]
    OutOfRange {
        /// The requested time in years.
        t: f64,
        /// Smallest valid time.
        min: f64,
        /// Largest valid time.
        max: f64,
    },

    /// Not enough pillars or instruments.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required.
        required: usize,
        /// Actually provided.
        got: usize,
    },

    /// Pillar times are not strictly increasing.
    #[error("Non-monotonic pillar times at index {index}: {prev} >= {current}")]
    NonMonotonicTenors {
        /// Index of the offending pillar.
        index: usize,
        /// Previous time.
        prev: f64,
        /// Current time.
        current: f64,
    },

    /// Malformed input data (bad tenor string, negative DF, ...).
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What is wrong.
        reason: String,
    },

    /// A single instrument could not be solved during bootstrap.
    #[error("Bootstrap failed at {instrument}: {reason}")]
    BootstrapFailed {
        /// Description of the instrument.
        instrument: String,
        /// Why it failed.
        reason: String,
    },

    /// Post-build validation rejected the curve.
    #[error("Curve validation failed at {subject}: {reason} ({failures} failure(s) in total)")]
    ValidationFailed {
        /// First offending instrument or tenor.
        subject: String,
        /// What was violated there.
        reason: String,
        /// Total number of violations found.
        failures: usize,
    },

    /// Underlying numerical failure.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Underlying date or convention failure.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an out-of-range error.
    #[must_use]
    pub fn out_of_range(t: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange { t, min, max }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a bootstrap failure for one instrument.
    #[must_use]
    pub fn bootstrap_failed(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BootstrapFailed {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// True for failures of post-build validation.
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CurveError::out_of_range(-1.0, 0.0, 30.0);
        assert_eq!(err.to_string(), "Time -1 out of range [0, 30]");

        let err = CurveError::bootstrap_failed("Deposit 1Y", "no bracket");
        assert!(err.to_string().contains("Deposit 1Y"));
    }

    #[test]
    fn test_from_math_error() {
        let err: CurveError = MathError::SingularMatrix.into();
        assert!(matches!(err, CurveError::Math(_)));
        assert!(!err.is_validation_failure());
    }
}
