//! Parallel curve bumping.

use super::{CurveShift, ShiftedCurve, BP};
use crate::traits::Curve;

/// A constant zero-rate shift in basis points.
///
/// ```rust
/// use coupon_curves::bumping::ParallelBump;
///
/// let (up, down) = ParallelBump::symmetric(1.0);
/// assert_eq!(up.shift_bps(), 1.0);
/// assert_eq!(down.shift_decimal(), -0.0001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelBump {
    shift_bps: f64,
}

impl ParallelBump {
    /// Creates a bump of `shift_bps`.
    #[must_use]
    pub fn new(shift_bps: f64) -> Self {
        Self { shift_bps }
    }

    /// +1bp.
    #[must_use]
    pub fn one_bp_up() -> Self {
        Self::new(1.0)
    }

    /// −1bp.
    #[must_use]
    pub fn one_bp_down() -> Self {
        Self::new(-1.0)
    }

    /// `(+shift, −shift)` for central differences.
    #[must_use]
    pub fn symmetric(shift_bps: f64) -> (Self, Self) {
        (Self::new(shift_bps), Self::new(-shift_bps))
    }

    /// Shift in basis points.
    #[must_use]
    pub fn shift_bps(&self) -> f64 {
        self.shift_bps
    }

    /// Shift as a decimal rate.
    #[must_use]
    pub fn shift_decimal(&self) -> f64 {
        self.shift_bps / BP
    }

    /// Lays the bump over `curve`. Pass `&curve` to borrow.
    #[must_use]
    pub fn apply<C: Curve>(self, curve: C) -> ShiftedCurve<C, Self> {
        ShiftedCurve::new(curve, self)
    }
}

impl Default for ParallelBump {
    fn default() -> Self {
        Self::one_bp_up()
    }
}

impl CurveShift for ParallelBump {
    fn shift_at(&self, _t: f64) -> f64 {
        self.shift_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use approx::assert_relative_eq;
    use coupon_core::{Compounding, Date};
    use coupon_math::interpolation::NelsonSiegel;

    use crate::curves::NelsonSiegelCurve;

    #[test]
    fn test_parallel_bump_discount_factors() {
        let curve = DiscountCurveBuilder::new(Date::from_ymd(2025, 1, 2).unwrap())
            .add_zero_rate(2.0, 0.04)
            .add_zero_rate(10.0, 0.045)
            .build()
            .unwrap();
        let bumped = ParallelBump::new(25.0).apply(&curve);
        for t in [0.0, 1.0, 5.0, 10.0, 20.0] {
            assert_relative_eq!(
                bumped.discount_factor(t).unwrap(),
                curve.discount_factor(t).unwrap() * (-0.0025 * t).exp(),
                epsilon = 1e-15
            );
        }
        assert_relative_eq!(
            bumped.instantaneous_forward(3.0).unwrap(),
            curve.instantaneous_forward(3.0).unwrap() + 0.0025,
            epsilon = 1e-12
        );
        assert_eq!(bumped.max_time(), curve.max_time());
    }

    #[test]
    fn test_bump_matches_rebuilt_curve() {
        let curve = DiscountCurveBuilder::new(Date::from_ymd(2025, 1, 2).unwrap())
            .add_zero_rate(1.0, 0.03)
            .add_zero_rate(5.0, 0.035)
            .add_zero_rate(30.0, 0.04)
            .build()
            .unwrap();
        let overlay = ParallelBump::new(-10.0).apply(&curve);
        let rebuilt = curve.parallel_shift(-10.0).unwrap();
        for t in [1.0, 5.0, 30.0] {
            assert_relative_eq!(
                overlay.discount_factor(t).unwrap(),
                rebuilt.discount_factor(t).unwrap(),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_works_on_parametric_curves() {
        let ns = NelsonSiegelCurve::new(
            Date::from_ymd(2025, 1, 2).unwrap(),
            NelsonSiegel::new(0.04, -0.01, 0.005, 2.0).unwrap(),
            30.0,
        );
        let bumped = ParallelBump::one_bp_up().apply(ns);
        assert_relative_eq!(
            bumped.zero_rate(7.0, Compounding::Continuous).unwrap(),
            ns.zero_rate(7.0, Compounding::Continuous).unwrap() + 1e-4,
            epsilon = 1e-12
        );
    }
}
