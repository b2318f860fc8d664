//! Error types for numerical routines.

use thiserror::Error;

/// Result alias for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Failures of the numerical layer.
///
/// Bracket failures and iteration caps are deliberately separate variants:
/// callers react differently to "no root in this interval" and "ran out of
/// iterations".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The iteration cap was reached before the tolerance was met.
    #[error("Did not converge after {iterations} iterations (residual {residual:.3e})")]
    ConvergenceFailed {
        /// Iterations performed.
        iterations: u32,
        /// Absolute residual at the last iterate.
        residual: f64,
    },

    /// The function has the same sign at both ends of the bracket.
    #[error("No sign change on [{a}, {b}]: f(a) = {fa:.3e}, f(b) = {fb:.3e}")]
    InvalidBracket {
        /// Lower end.
        a: f64,
        /// Upper end.
        b: f64,
        /// f(a).
        fa: f64,
        /// f(b).
        fb: f64,
    },

    /// A divisor (typically a derivative) vanished.
    #[error("Division by (near) zero: {value:.3e}")]
    DivisionByZero {
        /// The offending divisor.
        value: f64,
    },

    /// A linear system could not be solved.
    #[error("Singular matrix")]
    SingularMatrix,

    /// Operand shapes do not agree.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// A query fell outside the data range of an interpolator that does not
    /// extrapolate.
    #[error("Extrapolation not allowed: {x} outside [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// Query point.
        x: f64,
        /// Lower end of the data.
        min: f64,
        /// Upper end of the data.
        max: f64,
    },

    /// Not enough points for the method.
    #[error("Insufficient data: need {required}, got {actual}")]
    InsufficientData {
        /// Minimum number of points.
        required: usize,
        /// Points supplied.
        actual: usize,
    },

    /// An argument is invalid.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Iteration cap reached.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Invalid argument.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Too few points.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Returns true for the two convergence-type failures.
    #[must_use]
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. } | Self::InvalidBracket { .. }
        )
    }
}
