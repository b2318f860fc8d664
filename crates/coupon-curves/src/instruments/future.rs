//! Short-rate futures (SOFR, Euribor, Eurodollar).

use coupon_core::daycounts::DayCountConvention;
use coupon_core::Date;

use super::{CurveInstrument, InstrumentType};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A short-rate future quoted as `100 − rate`.
///
/// Daily margining makes the futures rate exceed the forward; the
/// convexity adjustment is subtracted before the future is treated like a
/// FRA on its accrual period:
///
/// ```text
/// F = (100 − price) / 100 − adjustment
/// DF(end) = DF(start) / (1 + F τ)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RateFuture {
    accrual_start: Date,
    accrual_end: Date,
    price: f64,
    convexity_adjustment: f64,
    notional: f64,
    day_count: DayCountConvention,
}

impl RateFuture {
    /// Creates a future on `[accrual_start, accrual_end]` at `price`.
    pub fn new(accrual_start: Date, accrual_end: Date, price: f64) -> CurveResult<Self> {
        if accrual_end <= accrual_start {
            return Err(CurveError::invalid_input(format!(
                "future accrual end {accrual_end} must be after start {accrual_start}"
            )));
        }
        Ok(Self {
            accrual_start,
            accrual_end,
            price,
            convexity_adjustment: 0.0,
            notional: 1.0,
            day_count: DayCountConvention::Act360,
        })
    }

    /// Creates a three-month contract starting on the IMM date of `year`/`month`.
    pub fn imm(year: i32, month: u32, price: f64) -> CurveResult<Self> {
        let start = imm_date(year, month).ok_or_else(|| {
            CurveError::invalid_input(format!("no IMM date for {year}-{month:02}"))
        })?;
        let end = imm_date_after(start, 3)?;
        Self::new(start, end, price)
    }

    /// Sets an explicit convexity adjustment (in rate units).
    #[must_use]
    pub fn with_convexity_adjustment(mut self, adjustment: f64) -> Self {
        self.convexity_adjustment = adjustment;
        self
    }

    /// Sets the Hull-White convexity adjustment for the given model, with
    /// times measured from `reference_date`.
    #[must_use]
    pub fn with_hull_white_adjustment(
        self,
        reference_date: Date,
        mean_reversion: f64,
        volatility: f64,
    ) -> Self {
        let t1 = reference_date.days_between(&self.accrual_start) as f64 / 365.0;
        let t2 = reference_date.days_between(&self.accrual_end) as f64 / 365.0;
        self.with_convexity_adjustment(hull_white_convexity(
            mean_reversion,
            volatility,
            t1.max(0.0),
            t2.max(0.0),
        ))
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Quoted price.
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Accrual start.
    #[must_use]
    pub fn accrual_start(&self) -> Date {
        self.accrual_start
    }

    /// Convexity adjustment in rate units.
    #[must_use]
    pub fn convexity_adjustment(&self) -> f64 {
        self.convexity_adjustment
    }

    /// Rate implied by the price, before adjustment.
    #[must_use]
    pub fn futures_rate(&self) -> f64 {
        (100.0 - self.price) / 100.0
    }

    /// Forward rate after the convexity adjustment.
    #[must_use]
    pub fn forward_rate(&self) -> f64 {
        self.futures_rate() - self.convexity_adjustment
    }

    /// Accrual fraction.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count
            .year_fraction_f64(self.accrual_start, self.accrual_end)
    }
}

impl CurveInstrument for RateFuture {
    fn maturity(&self) -> Date {
        self.accrual_end
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor_at(self.accrual_start)?;
        let df_end = curve.discount_factor_at(self.accrual_end)?;
        let growth = 1.0 + self.forward_rate() * self.year_fraction();
        Ok(self.notional * (df_start - df_end * growth))
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let df_start = curve.discount_factor_at(self.accrual_start)?;
        Ok(df_start / (1.0 + self.forward_rate() * self.year_fraction()))
    }

    fn notional(&self) -> f64 {
        self.notional
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Future
    }

    fn description(&self) -> String {
        format!(
            "Future {} @ {:.3} ({:.4}%)",
            self.accrual_start,
            self.price,
            self.forward_rate() * 100.0
        )
    }
}

/// Hull-White futures convexity adjustment for a contract fixing at `t1`
/// and paying at `t2`.
///
/// ```text
/// B(s, t) = (1 − e^{−a(t−s)}) / a
/// CA = B(t1,t2)/(t2−t1) · [B(t1,t2)(1 − e^{−2a t1}) + 2a B(0,t1)²] · σ²/(4a)
/// ```
///
/// As `a → 0` this reduces to the Ho-Lee value `σ² t1 t2 / 2`.
#[must_use]
pub fn hull_white_convexity(mean_reversion: f64, volatility: f64, t1: f64, t2: f64) -> f64 {
    let a = mean_reversion;
    let sigma2 = volatility * volatility;
    if t2 <= t1 {
        return 0.0;
    }
    if a.abs() < 1e-8 {
        return 0.5 * sigma2 * t1 * t2;
    }
    let b = |s: f64, t: f64| -(-a * (t - s)).exp_m1() / a;
    let b12 = b(t1, t2);
    let b01 = b(0.0, t1);
    b12 / (t2 - t1) * (b12 * -(-2.0 * a * t1).exp_m1() + 2.0 * a * b01 * b01) * sigma2 / (4.0 * a)
}

/// Third Wednesday of the month.
#[must_use]
pub fn imm_date(year: i32, month: u32) -> Option<Date> {
    let first = Date::from_ymd(year, month, 1).ok()?;
    let weekday = i64::from(first.weekday().num_days_from_monday());
    let to_wednesday = (2 - weekday).rem_euclid(7);
    Some(first.add_days(to_wednesday + 14))
}

fn imm_date_after(date: Date, months: i32) -> CurveResult<Date> {
    let target = date.add_months(months)?;
    imm_date(target.year(), target.month())
        .ok_or_else(|| CurveError::invalid_input(format!("no IMM date after {date}")))
}
