//! Piecewise linear interpolation.

use super::{check_query, segment, validate_nodes, Interpolator};
use crate::error::MathResult;

/// Piecewise linear interpolation between nodes.
///
/// Outside the data (when enabled) the end segments are extended.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolate: bool,
}

impl LinearInterpolator {
    /// Creates the interpolator. Needs at least two strictly increasing nodes.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        Ok(Self {
            xs,
            ys,
            extrapolate: false,
        })
    }

    /// Allows queries outside the node range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.extrapolate = true;
        self
    }

    fn slope(&self, i: usize) -> f64 {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_query(x, self.min_x(), self.max_x(), self.extrapolate)?;
        let i = segment(&self.xs, x);
        Ok(self.ys[i] + self.slope(i) * (x - self.xs[i]))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_query(x, self.min_x(), self.max_x(), self.extrapolate)?;
        Ok(self.slope(segment(&self.xs, x)))
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
    fn test_midpoints() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 3.0], vec![0.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 2.5);
        assert_relative_eq!(interp.derivative(2.0).unwrap(), 0.5);
    }

    #[test]
    fn test_extrapolation_extends_end_segment() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 2.0])
            .unwrap()
            .with_extrapolation();
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 4.0);
        assert_relative_eq!(interp.interpolate(-1.0).unwrap(), 0.0);
    }
}
