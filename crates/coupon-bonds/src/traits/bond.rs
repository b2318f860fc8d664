//! Core Bond trait definition.
//!
//! Implementors describe a bond's terms and coupon schedule; cash flows,
//! accrued interest and yield times are derived on demand by the provided
//! methods, so every bond type agrees on settlement and accrual rules.

use std::fmt;

use coupon_core::calendars::BusinessDayConvention;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{CashFlow, CashFlowKind, Date, Frequency};

use crate::cashflows::{ex_coupon_date, AccrualRules, CouponPeriod, Schedule};
use crate::error::{BondError, BondResult};
use crate::types::CalendarId;

/// Common interface of every bond.
///
/// All derived quantities are pure functions of the terms and the
/// settlement date.
pub trait Bond: Send + Sync + fmt::Debug {
    // ==================== Terms ====================

    /// Identifier (ISIN, CUSIP or a free-form name).
    fn identifier(&self) -> &str;

    /// Start of interest accrual.
    fn issue_date(&self) -> Date;

    /// Final redemption date.
    fn maturity(&self) -> Date;

    /// Annual coupon rate as a decimal (0.05 for 5%).
    fn coupon_rate(&self) -> f64;

    /// Coupon frequency.
    fn frequency(&self) -> Frequency;

    /// Accrual day count.
    fn day_count(&self) -> DayCountConvention;

    /// Face amount the cash flows are scaled to.
    fn face_value(&self) -> f64;

    /// Amount repaid at maturity.
    fn redemption_value(&self) -> f64 {
        self.face_value()
    }

    /// Business days from trade to settlement.
    fn settlement_days(&self) -> u32;

    /// Payment and settlement calendar.
    fn calendar(&self) -> CalendarId;

    /// Payment date adjustment.
    fn business_day_convention(&self) -> BusinessDayConvention;

    /// End-of-month rolling.
    fn end_of_month(&self) -> bool {
        true
    }

    /// Business days before a coupon date when the bond goes ex-coupon.
    fn ex_dividend_days(&self) -> Option<u32> {
        None
    }

    /// Coupon schedule.
    fn schedule(&self) -> &Schedule;

    /// Compounding frequency for street yields.
    fn yield_frequency(&self) -> Frequency {
        self.frequency()
    }

    // ==================== Coupons ====================

    /// Accrual rules of this bond.
    fn accrual_rules(&self) -> AccrualRules {
        AccrualRules::new(
            self.day_count(),
            self.frequency(),
            self.end_of_month(),
            self.maturity(),
        )
    }

    /// Coupon for one full regular period.
    fn coupon_unit(&self, _period: &CouponPeriod) -> f64 {
        let f = self.frequency().periods_per_year();
        if f == 0 {
            0.0
        } else {
            self.face_value() * self.coupon_rate() / f64::from(f)
        }
    }

    /// Coupon paid at the end of `period`.
    fn coupon_amount(&self, period: &CouponPeriod) -> f64 {
        self.coupon_unit(period) * self.accrual_rules().period_length(period)
    }

    /// Kind given to coupon flows.
    fn coupon_kind(&self) -> CashFlowKind {
        CashFlowKind::Coupon
    }

    // ==================== Settlement ====================

    /// Rejects settlement on or after maturity.
    fn check_settlement(&self, settlement: Date) -> BondResult<()> {
        if settlement >= self.maturity() {
            Err(BondError::invalid_settlement(settlement, self.maturity()))
        } else {
            Ok(())
        }
    }

    /// Settlement date for a trade on `trade_date`.
    fn settlement_date(&self, trade_date: Date) -> Date {
        self.calendar()
            .calendar()
            .settlement_date(trade_date, self.settlement_days())
    }

    /// True if settlement falls in the ex-coupon window of its period, or
    /// after the period's coupon was already paid (a payment date rolled
    /// back onto or before settlement).
    fn is_ex_coupon(&self, settlement: Date) -> bool {
        let Some(period) = self.schedule().period_containing(settlement) else {
            return false;
        };
        if period.payment_date <= settlement {
            return true;
        }
        match self.ex_dividend_days() {
            Some(days) if days > 0 => {
                settlement >= ex_coupon_date(period, days, self.calendar().calendar())
            }
            _ => false,
        }
    }

    /// Last coupon date on or before `settlement`.
    fn previous_coupon_date(&self, settlement: Date) -> Option<Date> {
        self.schedule()
            .period_containing(settlement)
            .map(|p| p.accrual_start)
    }

    /// First coupon date after `settlement`.
    fn next_coupon_date(&self, settlement: Date) -> Option<Date> {
        self.schedule()
            .period_containing(settlement)
            .map(|p| p.accrual_end)
    }

    /// True if `date` is an unadjusted coupon date.
    fn is_coupon_date(&self, date: Date) -> bool {
        self.schedule().periods().iter().any(|p| p.accrual_end == date)
    }

    // ==================== Cash flows ====================

    /// Flows paid after `settlement` with their street yield times in years.
    ///
    /// A period is included while both its unadjusted accrual end and its
    /// payment date are after settlement. Times count coupon periods under the bond's day count
    /// (fractional for the current period) divided by the frequency; zero
    /// frequency bonds use the plain year fraction.
    fn timed_cash_flows(&self, settlement: Date) -> BondResult<Vec<(CashFlow, f64)>> {
        self.check_settlement(settlement)?;

        let rules = self.accrual_rules();
        let periods = self.schedule().periods();
        let last = periods.len().saturating_sub(1);
        let ex_coupon = self.is_ex_coupon(settlement);
        let f = f64::from(self.frequency().periods_per_year());

        let mut elapsed = match periods.first() {
            Some(first) if settlement < first.accrual_start && f > 0.0 => {
                self.day_count()
                    .year_fraction_f64(settlement, first.accrual_start)
                    * f
            }
            _ => 0.0,
        };

        let mut flows = Vec::with_capacity(periods.len());
        for (i, period) in periods.iter().enumerate() {
            if period.accrual_end <= settlement {
                continue;
            }

            let time = if f > 0.0 {
                elapsed += if period.accrual_start < settlement {
                    rules.fraction(period, settlement, period.accrual_end)
                } else {
                    rules.period_length(period)
                };
                elapsed / f
            } else {
                self.day_count()
                    .year_fraction_f64(settlement, period.accrual_end)
            };
            if period.payment_date <= settlement {
                continue;
            }

            let coupon = if ex_coupon && period.contains(settlement) {
                0.0
            } else {
                self.coupon_amount(period)
            };

            let flow = if i == last {
                if coupon == 0.0 {
                    CashFlow::principal(period.payment_date, self.redemption_value())
                } else {
                    CashFlow::coupon(
                        period.payment_date,
                        coupon,
                        period.accrual_start,
                        period.accrual_end,
                    )
                    .plus(self.redemption_value())
                    .with_kind(CashFlowKind::CouponAndPrincipal)
                }
            } else if coupon == 0.0 {
                continue;
            } else {
                CashFlow::coupon(
                    period.payment_date,
                    coupon,
                    period.accrual_start,
                    period.accrual_end,
                )
                .with_kind(self.coupon_kind())
            };
            flows.push((flow, time));
        }
        Ok(flows)
    }

    /// Flows paid after `settlement`.
    fn cash_flows(&self, settlement: Date) -> BondResult<Vec<CashFlow>> {
        Ok(self
            .timed_cash_flows(settlement)?
            .into_iter()
            .map(|(cf, _)| cf)
            .collect())
    }

    /// Street yield times in years, aligned with [`cash_flows`](Self::cash_flows).
    fn yield_times(&self, settlement: Date) -> BondResult<Vec<f64>> {
        Ok(self
            .timed_cash_flows(settlement)?
            .into_iter()
            .map(|(_, t)| t)
            .collect())
    }

    /// Accrued interest at `settlement`, per the bond's face value.
    ///
    /// Zero before the first accrual date and on coupon dates; negative in
    /// the ex-coupon window.
    fn accrued_interest(&self, settlement: Date) -> BondResult<f64> {
        self.check_settlement(settlement)?;
        let Some(period) = self.schedule().period_containing(settlement) else {
            return Ok(0.0);
        };
        let unit = self.coupon_unit(period);
        if unit == 0.0 {
            return Ok(0.0);
        }
        Ok(self
            .accrual_rules()
            .accrued(period, settlement, unit, self.is_ex_coupon(settlement)))
    }

    // ==================== Convenience ====================

    /// Years to maturity ACT/365F.
    fn years_to_maturity(&self, from: Date) -> f64 {
        from.days_between(&self.maturity()) as f64 / 365.0
    }
}
