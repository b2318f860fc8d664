//! Forward rate agreement.

use coupon_core::daycounts::DayCountConvention;
use coupon_core::Date;

use super::{add_tenor, CurveInstrument, InstrumentType};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A forward rate agreement on `[start, end]`.
///
/// In a single-curve setting the fair rate is the simple forward, so
/// `DF(end) = DF(start) / (1 + F τ)`. The pillar is the end date.
#[derive(Debug, Clone, Copy)]
pub struct Fra {
    start_date: Date,
    end_date: Date,
    rate: f64,
    notional: f64,
    day_count: DayCountConvention,
}

impl Fra {
    /// Creates a FRA accruing ACT/360.
    pub fn new(start_date: Date, end_date: Date, rate: f64) -> CurveResult<Self> {
        if end_date <= start_date {
            return Err(CurveError::invalid_input(format!(
                "FRA end {end_date} must be after start {start_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
            rate,
            notional: 1.0,
            day_count: DayCountConvention::Act360,
        })
    }

    /// Creates an `NxM` FRA from spot, e.g. `from_tenors(spot, "3M", "6M", r)`.
    pub fn from_tenors(spot_date: Date, start: &str, end: &str, rate: f64) -> CurveResult<Self> {
        Self::new(add_tenor(spot_date, start)?, add_tenor(spot_date, end)?, rate)
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Accrual start.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Contract rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Accrual fraction.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count
            .year_fraction_f64(self.start_date, self.end_date)
    }
}

impl CurveInstrument for Fra {
    fn maturity(&self) -> Date {
        self.end_date
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor_at(self.start_date)?;
        let df_end = curve.discount_factor_at(self.end_date)?;
        Ok(self.notional * (df_start - df_end * (1.0 + self.rate * self.year_fraction())))
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor_at(self.start_date)?;
        Ok(df_start / (1.0 + self.rate * self.year_fraction()))
    }

    fn notional(&self) -> f64 {
        self.notional
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Fra
    }

    fn description(&self) -> String {
        format!(
            "FRA {:.4}% {} to {}",
            self.rate * 100.0,
            self.start_date,
            self.end_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use approx::assert_relative_eq;

    #[test]
    fn test_fair_rate_has_zero_pv() {
        let today = Date::from_ymd(2025, 1, 2).unwrap();
        let curve = DiscountCurveBuilder::new(today)
            .add_zero_rate(0.25, 0.04)
            .add_zero_rate(2.0, 0.045)
            .build()
            .unwrap();
        let template = Fra::from_tenors(today, "3M", "6M", 0.0).unwrap();
        let df_start = curve.discount_factor_at(template.start_date()).unwrap();
        let df_end = curve.discount_factor_at(template.maturity()).unwrap();
        let fair = (df_start / df_end - 1.0) / template.year_fraction();

        let fra = Fra::from_tenors(today, "3M", "6M", fair).unwrap();
        assert!(fra.pv(&curve).unwrap().abs() < 1e-14);
        assert_relative_eq!(
            fra.implied_df(&curve).unwrap(),
            curve.discount_factor_at(fra.maturity()).unwrap(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let today = Date::from_ymd(2025, 1, 2).unwrap();
        assert!(Fra::from_tenors(today, "6M", "3M", 0.04).is_err());
    }
}
