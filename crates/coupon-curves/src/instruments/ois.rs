//! Overnight index swap.

use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};

use super::leg::FixedLeg;
use super::{add_tenor, CurveInstrument, InstrumentType};
use crate::error::CurveResult;
use crate::traits::Curve;

/// An overnight index swap.
///
/// Daily compounding of the overnight rate telescopes exactly to
/// `DF(start)/DF(end) − 1`, so an OIS prices like a swap with an annual
/// fixed leg. Up to one year there is a single period and the pillar has the
/// deposit-like closed form `DF(end) = DF(start) / (1 + r τ)`.
#[derive(Debug, Clone)]
pub struct Ois {
    leg: FixedLeg,
    notional: f64,
}

impl Ois {
    /// Creates an OIS with an annual ACT/360 fixed leg.
    pub fn new(start_date: Date, end_date: Date, rate: f64) -> CurveResult<Self> {
        Self::with_day_count(start_date, end_date, rate, DayCountConvention::Act360)
    }

    /// Creates an OIS with the given fixed day count (ACT/365F for SONIA).
    pub fn with_day_count(
        start_date: Date,
        end_date: Date,
        rate: f64,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        Ok(Self {
            leg: FixedLeg::new(start_date, end_date, rate, Frequency::Annual, day_count)?,
            notional: 1.0,
        })
    }

    /// Creates an OIS from spot and a tenor.
    pub fn from_tenor(spot_date: Date, tenor: &str, rate: f64) -> CurveResult<Self> {
        Self::new(spot_date, add_tenor(spot_date, tenor)?, rate)
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Fixed rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.leg.rate
    }

    /// Returns true when the swap has a single fixed payment.
    #[must_use]
    pub fn is_single_period(&self) -> bool {
        self.leg.payment_dates().nth(1).is_none()
    }
}

impl CurveInstrument for Ois {
    fn maturity(&self) -> Date {
        self.leg.end
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        Ok(self.notional * self.leg.swap_pv(curve)?)
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.leg.implied_end_df(curve)
    }

    fn notional(&self) -> f64 {
        self.notional
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Ois
    }

    fn description(&self) -> String {
        format!("OIS {:.4}% to {}", self.leg.rate * 100.0, self.leg.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_period_closed_form() {
        let today = Date::from_ymd(2025, 1, 2).unwrap();
        let ois = Ois::from_tenor(today, "6M", 0.043).unwrap();
        assert!(ois.is_single_period());

        let curve = DiscountCurveBuilder::new(today)
            .add_zero_rate(1.0, 0.04)
            .build()
            .unwrap();
        let tau = 181.0 / 360.0;
        assert_relative_eq!(
            ois.implied_df(&curve).unwrap(),
            1.0 / (1.0 + 0.043 * tau),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_multi_period() {
        let today = Date::from_ymd(2025, 1, 2).unwrap();
        let ois = Ois::from_tenor(today, "3Y", 0.04).unwrap();
        assert!(!ois.is_single_period());
        assert_eq!(ois.rate(), 0.04);
    }
}
