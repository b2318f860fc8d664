//! Natural cubic spline.

use super::{check_query, segment, validate_nodes, Interpolator};
use crate::error::MathResult;
use crate::linear_algebra::solve_tridiagonal;

/// Natural cubic spline (zero second derivative at both ends).
///
/// Second derivatives at the nodes are solved once at construction.
/// Outside the data (when enabled) the spline is continued linearly with
/// the end slope.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second: Vec<f64>,
    extrapolate: bool,
}

impl CubicSpline {
    /// Creates a natural spline through at least two nodes.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        let n = xs.len();
        let mut second = vec![0.0; n];

        if n > 2 {
            let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
            let interior = n - 2;
            let mut lower = Vec::with_capacity(interior.saturating_sub(1));
            let mut diag = Vec::with_capacity(interior);
            let mut upper = Vec::with_capacity(interior.saturating_sub(1));
            let mut rhs = Vec::with_capacity(interior);

            for i in 1..n - 1 {
                diag.push(2.0 * (h[i - 1] + h[i]));
                rhs.push(6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]));
                if i > 1 {
                    lower.push(h[i - 1]);
                }
                if i < n - 2 {
                    upper.push(h[i]);
                }
            }

            let m = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
            second[1..n - 1].copy_from_slice(&m);
        }

        Ok(Self {
            xs,
            ys,
            second,
            extrapolate: false,
        })
    }

    /// Allows queries outside the node range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.extrapolate = true;
        self
    }

    fn end_slope(&self, i: usize, at_right: bool) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let dy = (self.ys[i + 1] - self.ys[i]) / h;
        if at_right {
            dy + h * (self.second[i] + 2.0 * self.second[i + 1]) / 6.0
        } else {
            dy - h * (2.0 * self.second[i] + self.second[i + 1]) / 6.0
        }
    }

    fn eval(&self, x: f64) -> (f64, f64) {
        let n = self.xs.len();
        if x < self.xs[0] {
            let s = self.end_slope(0, false);
            return (self.ys[0] + s * (x - self.xs[0]), s);
        }
        if x > self.xs[n - 1] {
            let s = self.end_slope(n - 2, true);
            return (self.ys[n - 1] + s * (x - self.xs[n - 1]), s);
        }

        let i = segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        let (m0, m1) = (self.second[i], self.second[i + 1]);

        let value = a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * m0 + (b * b * b - b) * m1) * h * h / 6.0;
        let slope = (self.ys[i + 1] - self.ys[i]) / h
            + ((1.0 - 3.0 * a * a) * m0 + (3.0 * b * b - 1.0) * m1) * h / 6.0;
        (value, slope)
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_query(x, self.min_x(), self.max_x(), self.extrapolate)?;
        Ok(self.eval(x).0)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_query(x, self.min_x(), self.max_x(), self.extrapolate)?;
        Ok(self.eval(x).1)
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
    fn test_reproduces_linear_data() {
        let spline = CubicSpline::new(vec![0.0, 1.0, 2.0, 4.0], vec![1.0, 3.0, 5.0, 9.0]).unwrap();
        assert_relative_eq!(spline.interpolate(3.0).unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(spline.derivative(0.7).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_through_nodes() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 0.0, 1.0];
        let spline = CubicSpline::new(xs, ys).unwrap();
        // First derivative continuous at interior node
        let left = spline.derivative(1.0 - 1e-9).unwrap();
        let right = spline.derivative(1.0 + 1e-9).unwrap();
        assert_relative_eq!(left, right, epsilon = 1e-6);
    }

    #[test]
    fn test_two_points_is_linear() {
        let spline = CubicSpline::new(vec![0.0, 2.0], vec![0.0, 4.0]).unwrap();
        assert_relative_eq!(spline.interpolate(0.5).unwrap(), 1.0);
    }
}
