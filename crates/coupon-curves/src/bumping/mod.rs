//! Curve bumping for sensitivity analysis.
//!
//! A bump is a zero-rate shift profile `s(t)` laid over an existing curve
//! without copying it:
//!
//! ```text
//! DF'(t) = DF(t) · exp(−s(t) · t)
//! ```
//!
//! - [`ParallelBump`]: constant shift (DV01, effective duration)
//! - [`KeyRateBump`]: triangular shift around one key tenor; a full set of
//!   key-rate bumps sums to a parallel bump at every maturity
//! - [`Scenario`]: several bumps applied together (stress tests)
//!
//! ```rust
//! use coupon_core::Date;
//! use coupon_curves::prelude::*;
//!
//! let curve = DiscountCurveBuilder::new(Date::from_ymd(2025, 1, 2).unwrap())
//!     .add_zero_rate(1.0, 0.04)
//!     .add_zero_rate(10.0, 0.045)
//!     .build()
//!     .unwrap();
//! let bumped = ParallelBump::new(1.0).apply(&curve);
//! assert!(bumped.discount_factor(5.0).unwrap() < curve.discount_factor(5.0).unwrap());
//! ```

mod key_rate;
mod parallel;
mod scenario;

pub use key_rate::{key_rate_profile, KeyRateBump, STANDARD_KEY_TENORS};
pub use parallel::ParallelBump;
pub use scenario::{presets, Scenario, ScenarioBump};

use coupon_core::Date;

use crate::error::CurveResult;
use crate::traits::{check_time, Curve};

/// Basis points per unit rate.
pub(crate) const BP: f64 = 10_000.0;

/// A zero-rate shift profile.
pub trait CurveShift: Send + Sync {
    /// Shift at `t`, in decimal rate units.
    fn shift_at(&self, t: f64) -> f64;

    /// `ds/dt` at `t`.
    fn slope_at(&self, _t: f64) -> f64 {
        0.0
    }
}

/// A curve seen through a shift profile.
#[derive(Debug, Clone, Copy)]
pub struct ShiftedCurve<C, S> {
    base: C,
    shift: S,
}

/// A curve under a [`ParallelBump`].
pub type BumpedCurve<C> = ShiftedCurve<C, ParallelBump>;

/// A curve under a [`KeyRateBump`].
pub type KeyRateBumpedCurve<C> = ShiftedCurve<C, KeyRateBump>;

/// A curve under a [`Scenario`].
pub type ScenarioCurve<C> = ShiftedCurve<C, Scenario>;

impl<C: Curve, S: CurveShift> ShiftedCurve<C, S> {
    /// Lays `shift` over `base`.
    #[must_use]
    pub fn new(base: C, shift: S) -> Self {
        Self { base, shift }
    }

    /// The unshifted curve.
    #[must_use]
    pub fn base(&self) -> &C {
        &self.base
    }

    /// The shift profile.
    #[must_use]
    pub fn shift(&self) -> &S {
        &self.shift
    }
}

impl<C: Curve, S: CurveShift> Curve for ShiftedCurve<C, S> {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let df = self.base.discount_factor(t)?;
        Ok(df * (-self.shift.shift_at(t) * t).exp())
    }

    fn reference_date(&self) -> Date {
        self.base.reference_date()
    }

    fn max_time(&self) -> f64 {
        self.base.max_time()
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        // d/dt [s(t)·t] = s(t) + t·s'(t)
        let forward = self.base.instantaneous_forward(t)?;
        Ok(forward + self.shift.shift_at(t) + t * self.shift.slope_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use approx::assert_relative_eq;
    use coupon_core::Compounding;

    struct Linear;

    impl CurveShift for Linear {
        fn shift_at(&self, t: f64) -> f64 {
            0.001 * t
        }

        fn slope_at(&self, _t: f64) -> f64 {
            0.001
        }
    }

    #[test]
    fn test_shift_applies_to_zero_rates() {
        let curve = DiscountCurveBuilder::new(Date::from_ymd(2025, 1, 2).unwrap())
            .add_zero_rate(1.0, 0.03)
            .add_zero_rate(10.0, 0.04)
            .build()
            .unwrap();
        let shifted = ShiftedCurve::new(&curve, Linear);
        for t in [0.5, 2.0, 7.0] {
            assert_relative_eq!(
                shifted.zero_rate(t, Compounding::Continuous).unwrap(),
                curve.zero_rate(t, Compounding::Continuous).unwrap() + 0.001 * t,
                epsilon = 1e-12
            );
            let numeric = -(shifted.discount_factor(t + 1e-5).unwrap().ln()
                - shifted.discount_factor(t - 1e-5).unwrap().ln())
                / 2e-5;
            assert_relative_eq!(
                shifted.instantaneous_forward(t).unwrap(),
                numeric,
                epsilon = 1e-7
            );
        }
    }
}
