//! Flat zero-rate extrapolation.

use super::Extrapolator;

/// Holds the last zero rate, so the forward beyond the last point equals it.
///
/// ```rust
/// use coupon_math::extrapolation::{Extrapolator, FlatExtrapolator};
///
/// assert_eq!(FlatExtrapolator.extrapolate(15.0, 10.0, 0.05, 0.001), 0.05);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatExtrapolator;

impl Extrapolator for FlatExtrapolator {
    fn extrapolate(&self, _t: f64, _last_t: f64, last_value: f64, _last_derivative: f64) -> f64 {
        last_value
    }

    fn name(&self) -> &'static str {
        "Flat"
    }
}
