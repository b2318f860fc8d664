//! Accrual fractions and accrued interest.
//!
//! Fractions are measured in coupon periods: a full regular period is
//! exactly one, so a coupon is `face × rate / frequency × fraction`.
//!
//! - ACT/ACT ICMA divides actual days by the actual days of the reference
//!   period. Stubs are split into notional regular periods rolled from the
//!   regular end of the stub (ICMA Rule 251).
//! - Every other convention uses its own year fraction times the
//!   frequency, which gives coupon × face × day count fraction.
//! - Inside the ex-coupon window the accrued is negative: minus the part
//!   of the next coupon the buyer no longer receives.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use coupon_core::calendars::Calendar;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};

use super::schedule::{roll, CouponPeriod, PeriodKind};

/// Hard cap on notional periods walked for one stub.
const MAX_NOTIONAL_PERIODS: i32 = 1200;

/// Day count, frequency and roll rules a bond accrues under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualRules {
    /// Day count convention.
    pub day_count: DayCountConvention,
    /// Coupon frequency.
    pub frequency: Frequency,
    /// End-of-month rolling for notional periods.
    pub end_of_month: bool,
    /// Maturity, for the 30E/360 ISDA termination rule.
    pub maturity: Date,
}

impl AccrualRules {
    /// Bundles the accrual rules of a bond.
    #[must_use]
    pub fn new(
        day_count: DayCountConvention,
        frequency: Frequency,
        end_of_month: bool,
        maturity: Date,
    ) -> Self {
        Self {
            day_count,
            frequency,
            end_of_month,
            maturity,
        }
    }

    /// Coupon periods accrued from `from` to `to` inside `period`.
    ///
    /// Zero-frequency bonds get the plain year fraction instead.
    #[must_use]
    pub fn fraction(&self, period: &CouponPeriod, from: Date, to: Date) -> f64 {
        if to <= from {
            return 0.0;
        }
        if self.frequency.is_zero() {
            return self.day_count.year_fraction_f64(from, to);
        }
        let f = Decimal::from(self.frequency.periods_per_year());

        let exact = match (self.day_count, period.kind) {
            (DayCountConvention::ActActIcma, PeriodKind::FrontStub | PeriodKind::BackStub) => {
                self.icma_stub(period, from, to)
            }
            (dc, _) => {
                dc.year_fraction_in_period(
                    from,
                    to,
                    period.accrual_start,
                    period.accrual_end,
                    self.frequency,
                    Some(self.maturity),
                ) * f
            }
        };
        exact.to_f64().unwrap_or(f64::NAN)
    }

    /// Length of the whole period in coupon periods.
    #[must_use]
    pub fn period_length(&self, period: &CouponPeriod) -> f64 {
        self.fraction(period, period.accrual_start, period.accrual_end)
    }

    /// Accrued interest at `settlement` for a coupon of `unit` per regular
    /// period.
    ///
    /// `ex_coupon` flips to the negative accrued of the ex-coupon window.
    #[must_use]
    pub fn accrued(&self, period: &CouponPeriod, settlement: Date, unit: f64, ex_coupon: bool) -> f64 {
        if ex_coupon {
            -unit * self.fraction(period, settlement, period.accrual_end)
        } else {
            unit * self.fraction(period, period.accrual_start, settlement)
        }
    }

    fn icma_stub(&self, period: &CouponPeriod, from: Date, to: Date) -> Decimal {
        let months = self.frequency.months_per_period() as i32;
        let icma = DayCountConvention::ActActIcma;
        let f = Decimal::from(self.frequency.periods_per_year());
        let mut total = Decimal::ZERO;

        for k in 1..=MAX_NOTIONAL_PERIODS {
            let bounds = match period.kind {
                PeriodKind::BackStub => (
                    roll(period.accrual_start, months * (k - 1), self.end_of_month),
                    roll(period.accrual_start, months * k, self.end_of_month),
                ),
                _ => (
                    roll(period.accrual_end, -months * k, self.end_of_month),
                    roll(period.accrual_end, -months * (k - 1), self.end_of_month),
                ),
            };
            let (Ok(start), Ok(end)) = bounds else {
                break;
            };

            let lo = from.max(start);
            let hi = to.min(end);
            if hi > lo {
                total += icma.year_fraction_in_period(lo, hi, start, end, self.frequency, None) * f;
            }

            let covered = match period.kind {
                PeriodKind::BackStub => end >= period.accrual_end,
                _ => start <= period.accrual_start,
            };
            if covered {
                break;
            }
        }
        total
    }
}

/// First date of the ex-coupon window: `days` business days before the
/// period end.
#[must_use]
pub fn ex_coupon_date(period: &CouponPeriod, days: u32, calendar: &dyn Calendar) -> Date {
    calendar.add_business_days(period.accrual_end, -i32::try_from(days).unwrap_or(i32::MAX))
}
