//! Money market deposit.

use coupon_core::daycounts::DayCountConvention;
use coupon_core::Date;

use super::{add_tenor, CurveInstrument, InstrumentType};
use crate::error::CurveResult;
use crate::traits::Curve;

/// A cash deposit paying simple interest at maturity.
///
/// ```text
/// PV = N × [DF(start) − DF(end) × (1 + r τ)]
/// DF(end) = DF(start) / (1 + r τ)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deposit {
    start_date: Date,
    end_date: Date,
    rate: f64,
    notional: f64,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit accruing ACT/360.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, rate: f64) -> Self {
        Self {
            start_date,
            end_date,
            rate,
            notional: 1.0,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Creates a deposit from a tenor such as `"ON"` or `"3M"`.
    pub fn from_tenor(spot_date: Date, tenor: &str, rate: f64) -> CurveResult<Self> {
        Ok(Self::new(spot_date, add_tenor(spot_date, tenor)?, rate))
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

    /// Start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Quoted simple rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Accrual fraction of the deposit period.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count
            .year_fraction_f64(self.start_date, self.end_date)
    }
}

impl CurveInstrument for Deposit {
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
        InstrumentType::Deposit
    }

    fn description(&self) -> String {
        format!(
            "Deposit {:.4}% {} to {}",
            self.rate * 100.0,
            self.start_date,
            self.end_date
        )
    }
}
