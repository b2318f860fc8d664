//! Linear zero-rate extrapolation.

use super::Extrapolator;

/// Continues the zero rate along its slope at the last point.
///
/// Over long horizons this can drive rates negative; prefer
/// [`super::SmithWilson`] for long-dated extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExtrapolator;

impl Extrapolator for LinearExtrapolator {
    fn extrapolate(&self, t: f64, last_t: f64, last_value: f64, last_derivative: f64) -> f64 {
        last_value + last_derivative * (t - last_t)
    }

    fn name(&self) -> &'static str {
        "Linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_slope_continuation() {
        let z = LinearExtrapolator.extrapolate(15.0, 10.0, 0.05, 0.001);
        assert_relative_eq!(z, 0.055, epsilon = 1e-15);
    }
}
