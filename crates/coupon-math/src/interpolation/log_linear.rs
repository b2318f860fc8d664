//! Log-linear interpolation.

use super::{check_query, segment, validate_nodes, Interpolator};
use crate::error::{MathError, MathResult};

/// Linear interpolation of `ln(y)`.
///
/// On discount factors this gives piecewise flat instantaneous forwards.
/// All node values must be strictly positive.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    extrapolate: bool,
}

impl LogLinearInterpolator {
    /// Creates the interpolator from strictly positive values.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        if let Some(bad) = ys.iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation needs positive values, got {bad}"
            )));
        }
        Ok(Self {
            xs,
            log_ys: ys.iter().map(|y| y.ln()).collect(),
            extrapolate: false,
        })
    }

    /// Allows queries outside the node range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.extrapolate = true;
        self
    }

    /// Slope of `ln(y)` at `x`, which is minus the forward rate for a
    /// discount factor curve.
    pub fn log_slope(&self, x: f64) -> MathResult<f64> {
        check_query(x, self.min_x(), self.max_x(), self.extrapolate)?;
        let i = segment(&self.xs, x);
        Ok((self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]))
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let slope = self.log_slope(x)?;
        let i = segment(&self.xs, x);
        Ok((self.log_ys[i] + slope * (x - self.xs[i])).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(self.interpolate(x)? * self.log_slope(x)?)
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_forward_between_nodes() {
        let dfs = vec![1.0, (-0.05f64).exp(), (-0.11f64).exp()];
        let interp = LogLinearInterpolator::new(vec![0.0, 1.0, 2.0], dfs).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), (-0.025f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(interp.log_slope(1.5).unwrap(), -0.06, epsilon = 1e-14);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
    }
}
