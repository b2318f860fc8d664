//! Government bond used as a curve instrument.

use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};
use rust_decimal::prelude::ToPrimitive;

use super::{CurveInstrument, InstrumentType};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A zero or fixed coupon bond quoted at a clean price per 100 face.
///
/// Cash flows are rolled backward from maturity on unadjusted dates. The PV
/// compares the curve value of the remaining flows, forward to settlement,
/// with the dirty price:
///
/// ```text
/// PV = N/100 × [Σ CFᵢ DF(Tᵢ) / DF(settle) − dirty]
/// ```
#[derive(Debug, Clone)]
pub struct BondInstrument {
    settlement: Date,
    maturity: Date,
    coupon_rate: f64,
    frequency: Frequency,
    day_count: DayCountConvention,
    clean_price: f64,
    notional: f64,
    previous_coupon: Date,
    coupon_dates: Vec<Date>,
}

impl BondInstrument {
    /// Creates a coupon bond accruing ACT/ACT ICMA.
    pub fn new(
        settlement: Date,
        maturity: Date,
        coupon_rate: f64,
        frequency: Frequency,
        clean_price: f64,
    ) -> CurveResult<Self> {
        if maturity <= settlement {
            return Err(CurveError::invalid_input(format!(
                "bond maturity {maturity} must be after settlement {settlement}"
            )));
        }
        if !(clean_price > 0.0 && clean_price.is_finite()) {
            return Err(CurveError::invalid_input(format!(
                "bond price must be positive, got {clean_price}"
            )));
        }
        let (previous_coupon, coupon_dates) = coupon_dates(settlement, maturity, frequency)?;
        Ok(Self {
            settlement,
            maturity,
            coupon_rate,
            frequency,
            day_count: DayCountConvention::ActActIcma,
            clean_price,
            notional: 1.0,
            previous_coupon,
            coupon_dates,
        })
    }

    /// Creates a zero-coupon bond (T-bill, strip) at `price`.
    pub fn zero_coupon(settlement: Date, maturity: Date, price: f64) -> CurveResult<Self> {
        Self::new(settlement, maturity, 0.0, Frequency::Zero, price)
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

    /// Quoted clean price.
    #[must_use]
    pub fn clean_price(&self) -> f64 {
        self.clean_price
    }

    /// Accrued interest per 100 face at settlement.
    #[must_use]
    pub fn accrued_interest(&self) -> f64 {
        if self.frequency.is_zero() || self.coupon_rate == 0.0 {
            return 0.0;
        }
        let next = self.coupon_dates[0];
        let fraction = self
            .day_count
            .year_fraction_in_period(
                self.previous_coupon,
                self.settlement,
                self.previous_coupon,
                next,
                self.frequency,
                Some(self.maturity),
            )
            .to_f64()
            .unwrap_or(0.0);
        100.0 * self.coupon_rate * fraction
    }

    /// Clean price plus accrued.
    #[must_use]
    pub fn dirty_price(&self) -> f64 {
        self.clean_price + self.accrued_interest()
    }

    /// Remaining `(date, amount)` flows per 100 face.
    #[must_use]
    pub fn cash_flows(&self) -> Vec<(Date, f64)> {
        let coupon = if self.frequency.is_zero() {
            0.0
        } else {
            100.0 * self.coupon_rate / f64::from(self.frequency.periods_per_year())
        };
        let last = self.coupon_dates.len() - 1;
        self.coupon_dates
            .iter()
            .enumerate()
            .map(|(i, &date)| {
                let principal = if i == last { 100.0 } else { 0.0 };
                (date, coupon + principal)
            })
            .collect()
    }
}

impl CurveInstrument for BondInstrument {
    fn maturity(&self) -> Date {
        self.maturity
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_settle = curve.discount_factor_at(self.settlement)?;
        let mut value = 0.0;
        for (date, amount) in self.cash_flows() {
            value += amount * curve.discount_factor_at(date)?;
        }
        Ok(self.notional * (value / df_settle - self.dirty_price()) / 100.0)
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let flows = self.cash_flows();
        let Some((&(_, last_amount), earlier)) = flows.split_last() else {
            return Err(CurveError::invalid_input("bond has no remaining cash flows"));
        };
        let mut known = 0.0;
        for &(date, amount) in earlier {
            known += amount * curve.discount_factor_at(date)?;
        }
        let df_settle = curve.discount_factor_at(self.settlement)?;
        Ok((self.dirty_price() * df_settle - known) / last_amount)
    }

    fn notional(&self) -> f64 {
        self.notional
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Bond
    }

    fn description(&self) -> String {
        format!(
            "Bond {:.3}% {} @ {:.4}",
            self.coupon_rate * 100.0,
            self.maturity,
            self.clean_price
        )
    }
}

/// Previous coupon date on or before settlement and the coupon dates after it.
fn coupon_dates(
    settlement: Date,
    maturity: Date,
    frequency: Frequency,
) -> CurveResult<(Date, Vec<Date>)> {
    let months = frequency.months_per_period() as i32;
    if months == 0 {
        return Ok((settlement, vec![maturity]));
    }
    let mut dates = vec![maturity];
    let mut k = 1;
    let previous = loop {
        let date = maturity.add_months(-k * months)?;
        if date <= settlement {
            break date;
        }
        dates.push(date);
        k += 1;
    };
    dates.reverse();
    Ok((previous, dates))
}
