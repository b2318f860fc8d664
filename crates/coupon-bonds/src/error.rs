//! Error types for bond operations.

use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur while defining bonds or deriving their cash flows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Invalid bond specification.
    #[error("Invalid bond specification: {reason}")]
    InvalidSpec {
        /// Description of what's invalid.
        reason: String,
    },

    /// Missing required field.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// Coupon schedule could not be generated.
    #[error("Invalid schedule: {reason}")]
    InvalidSchedule {
        /// Description of the failure.
        reason: String,
    },

    /// Settlement is on or after maturity.
    #[error("Settlement date {settlement} is not before maturity {maturity}")]
    InvalidSettlement {
        /// Settlement date.
        settlement: String,
        /// Maturity date.
        maturity: String,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] coupon_core::CoreError),

    /// Curve error.
    #[error("Curve error: {0}")]
    Curve(#[from] coupon_curves::CurveError),
}

impl BondError {
    /// Creates an invalid specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid schedule error.
    #[must_use]
    pub fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            reason: reason.into(),
        }
    }

    /// Creates an invalid settlement error.
    #[must_use]
    pub fn invalid_settlement(settlement: impl ToString, maturity: impl ToString) -> Self {
        Self::InvalidSettlement {
            settlement: settlement.to_string(),
            maturity: maturity.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_core::{CoreError, Date};

    #[test]
    fn test_error_display() {
        let err = BondError::missing_field("maturity");
        assert_eq!(err.to_string(), "Missing required field: maturity");

        let settle = Date::from_ymd(2030, 1, 2).unwrap();
        let maturity = Date::from_ymd(2029, 6, 15).unwrap();
        let err = BondError::invalid_settlement(settle, maturity);
        assert!(err.to_string().contains("2030-01-02"));
    }

    #[test]
    fn test_from_core() {
        let err: BondError = CoreError::invalid_date("bad").into();
        assert!(matches!(err, BondError::Core(_)));
    }
}
