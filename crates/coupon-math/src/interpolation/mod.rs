//! Interpolation for curve construction.
//!
//! **Node based** (coefficients computed once at construction):
//! - [`LinearInterpolator`]: piecewise linear
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, for discount factors
//! - [`CubicSpline`]: natural cubic spline
//! - [`MonotoneConvex`]: Hagan-West on forwards, positive forwards guaranteed
//!
//! **Parametric**:
//! - [`NelsonSiegel`] and [`Svensson`]
//!
//! | Method | Smoothness | Positive forwards | Locality |
//! |--------|------------|-------------------|----------|
//! | Linear (zero rates) | C0 | No | Local |
//! | Log-linear (DFs) | C0 | If DFs decrease | Local |
//! | Cubic spline | C2 | No | Global |
//! | Monotone convex | C1 | Yes | Near-local |

mod cubic_spline;
mod linear;
mod log_linear;
mod monotone_convex;
mod parametric;

pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use monotone_convex::MonotoneConvex;
pub use parametric::{NelsonSiegel, Svensson};

use crate::error::{MathError, MathResult};

/// A one-dimensional interpolation scheme.
pub trait Interpolator: Send + Sync {
    /// Value at `x`.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// First derivative at `x`.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Smallest abscissa.
    fn min_x(&self) -> f64;

    /// Largest abscissa.
    fn max_x(&self) -> f64;

    /// True if queries outside `[min_x, max_x]` are answered.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// True if `x` lies within the data.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Checks lengths, finiteness and strict monotonicity of node data.
pub(crate) fn validate_nodes(xs: &[f64], ys: &[f64], required: usize) -> MathResult<()> {
    if xs.len() < required {
        return Err(MathError::insufficient_data(required, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::DimensionMismatch {
            expected: xs.len(),
            actual: ys.len(),
        });
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("node values must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i + 1]]` used for `x`, clamped to
/// the first and last segments.
pub(crate) fn segment(xs: &[f64], x: f64) -> usize {
    let upper = xs.partition_point(|&v| v <= x);
    upper.saturating_sub(1).min(xs.len().saturating_sub(2))
}

/// Rejects non-finite queries and, unless allowed, out-of-range ones.
pub(crate) fn check_query(x: f64, min: f64, max: f64, extrapolate: bool) -> MathResult<()> {
    if !x.is_finite() {
        return Err(MathError::invalid_input(format!("non-finite abscissa {x}")));
    }
    if !extrapolate && (x < min || x > max) {
        return Err(MathError::ExtrapolationNotAllowed { x, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_segment_lookup() {
        let xs = [0.0, 1.0, 2.0, 5.0];
        assert_eq!(segment(&xs, -1.0), 0);
        assert_eq!(segment(&xs, 0.0), 0);
        assert_eq!(segment(&xs, 1.0), 1);
        assert_eq!(segment(&xs, 4.9), 2);
        assert_eq!(segment(&xs, 5.0), 2);
        assert_eq!(segment(&xs, 9.0), 2);
    }

    #[test]
    fn test_validation() {
        assert!(validate_nodes(&[0.0, 1.0], &[1.0, 2.0], 2).is_ok());
        assert!(validate_nodes(&[0.0], &[1.0], 2).is_err());
        assert!(validate_nodes(&[1.0, 0.0], &[1.0, 2.0], 2).is_err());
        assert!(validate_nodes(&[0.0, 1.0], &[1.0, f64::NAN], 2).is_err());
    }

    #[test]
    fn test_all_node_interpolators_hit_nodes() {
        let times = vec![0.5, 1.0, 2.0, 3.0, 5.0];
        let rates = vec![0.02, 0.025, 0.03, 0.035, 0.04];

        let linear = LinearInterpolator::new(times.clone(), rates.clone()).unwrap();
        let spline = CubicSpline::new(times.clone(), rates.clone()).unwrap();
        let mc = MonotoneConvex::new(times.clone(), rates.clone()).unwrap();
        let dfs: Vec<f64> = times.iter().zip(&rates).map(|(t, r)| (-r * t).exp()).collect();
        let log_linear = LogLinearInterpolator::new(times.clone(), dfs.clone()).unwrap();

        for i in 0..times.len() {
            let t = times[i];
            assert_relative_eq!(linear.interpolate(t).unwrap(), rates[i], epsilon = 1e-14);
            assert_relative_eq!(spline.interpolate(t).unwrap(), rates[i], epsilon = 1e-14);
            assert_relative_eq!(mc.interpolate(t).unwrap(), rates[i], epsilon = 1e-14);
            assert_relative_eq!(log_linear.interpolate(t).unwrap(), dfs[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_out_of_range_is_error() {
        let linear = LinearInterpolator::new(vec![1.0, 2.0], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            linear.interpolate(3.0),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
        assert!(linear.interpolate(f64::NAN).is_err());
    }
}
