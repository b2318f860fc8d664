//! Fixed leg shared by swaps and OIS.

use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Fixed payments on a regular schedule rolled backward from the end date.
#[derive(Debug, Clone)]
pub(crate) struct FixedLeg {
    pub(crate) start: Date,
    pub(crate) end: Date,
    pub(crate) rate: f64,
    pub(crate) frequency: Frequency,
    pub(crate) day_count: DayCountConvention,
    /// Accrual periods `(start, end)`, first to last.
    periods: Vec<(Date, Date)>,
}

impl FixedLeg {
    pub(crate) fn new(
        start: Date,
        end: Date,
        rate: f64,
        frequency: Frequency,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        if end <= start {
            return Err(CurveError::invalid_input(format!(
                "leg end {end} must be after start {start}"
            )));
        }
        let periods = accrual_periods(start, end, frequency)?;
        Ok(Self {
            start,
            end,
            rate,
            frequency,
            day_count,
            periods,
        })
    }

    pub(crate) fn payment_dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.periods.iter().map(|&(_, end)| end)
    }

    fn tau(&self, period: (Date, Date)) -> f64 {
        self.day_count.year_fraction_f64(period.0, period.1)
    }

    /// `Σ τᵢ DF(Tᵢ)` over all periods except the last.
    pub(crate) fn known_annuity(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let n = self.periods.len();
        self.periods[..n - 1]
            .iter()
            .map(|&p| -> CurveResult<f64> { Ok(self.tau(p) * curve.discount_factor_at(p.1)?) })
            .sum()
    }

    /// `Σ τᵢ DF(Tᵢ)` over all periods.
    pub(crate) fn annuity(&self, curve: &dyn Curve) -> CurveResult<f64> {
        Ok(self.known_annuity(curve)? + self.last_tau() * curve.discount_factor_at(self.end)?)
    }

    pub(crate) fn last_tau(&self) -> f64 {
        self.periods
            .last()
            .map_or(0.0, |&period| self.tau(period))
    }

    /// Receive-fixed PV per unit notional in a single-curve setting.
    pub(crate) fn swap_pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let fixed = self.rate * self.annuity(curve)?;
        let floating = curve.discount_factor_at(self.start)? - curve.discount_factor_at(self.end)?;
        Ok(fixed - floating)
    }

    /// Discount factor at the end that prices the swap at par.
    pub(crate) fn implied_end_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor_at(self.start)?;
        let known = self.rate * self.known_annuity(curve)?;
        Ok((df_start - known) / (1.0 + self.rate * self.last_tau()))
    }
}

/// Regular periods rolled backward from `end`, short stub at the front.
fn accrual_periods(start: Date, end: Date, frequency: Frequency) -> CurveResult<Vec<(Date, Date)>> {
    let months = frequency.months_per_period() as i32;
    if months == 0 {
        return Ok(vec![(start, end)]);
    }

    let mut ends = vec![end];
    let mut k = 1;
    loop {
        let date = end.add_months(-k * months)?;
        if date <= start {
            break;
        }
        ends.push(date);
        k += 1;
    }
    ends.reverse();

    let mut periods = Vec::with_capacity(ends.len());
    let mut prev = start;
    for date in ends {
        periods.push((prev, date));
        prev = date;
    }
    Ok(periods)
}
