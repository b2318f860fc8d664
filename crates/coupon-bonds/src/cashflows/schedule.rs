//! Coupon schedule generation.
//!
//! Dates are rolled from an anchor by whole multiples of the coupon period,
//! backward from maturity (or the penultimate date) by default. Accrual
//! dates stay unadjusted; only payment dates move to business days.
//!
//! ```rust
//! use coupon_bonds::cashflows::{PeriodKind, Schedule, ScheduleConfig};
//! use coupon_core::{Date, Frequency};
//!
//! let config = ScheduleConfig::new(
//!     Date::from_ymd(2025, 3, 3).unwrap(),
//!     Date::from_ymd(2030, 6, 15).unwrap(),
//!     Frequency::SemiAnnual,
//! );
//! let schedule = Schedule::generate(&config).unwrap();
//! assert_eq!(schedule.len(), 11);
//! assert_eq!(schedule.periods()[0].kind, PeriodKind::FrontStub);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use coupon_core::calendars::BusinessDayConvention;
use coupon_core::{Date, Frequency};

use crate::error::{BondError, BondResult};
use crate::types::CalendarId;

/// How an irregular period is placed when no explicit stub date is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StubRule {
    /// Roll backward from maturity; any short period comes first.
    #[default]
    ShortFront,
    /// Roll backward and merge a short first period into the next one.
    LongFront,
    /// Roll forward from the start; any short period comes last.
    ShortBack,
    /// Roll forward and merge a short last period into the previous one.
    LongBack,
}

impl StubRule {
    fn rolls_forward(self) -> bool {
        matches!(self, StubRule::ShortBack | StubRule::LongBack)
    }
}

/// Whether a period has the regular length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// Exactly one coupon period long.
    Regular,
    /// Irregular first period.
    FrontStub,
    /// Irregular last period.
    BackStub,
}

/// One accrual period and its payment date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CouponPeriod {
    /// Unadjusted accrual start.
    pub accrual_start: Date,
    /// Unadjusted accrual end.
    pub accrual_end: Date,
    /// Business day adjusted payment date.
    pub payment_date: Date,
    /// Regular or stub.
    pub kind: PeriodKind,
}

impl CouponPeriod {
    /// True if `date` lies in `[accrual_start, accrual_end)`.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.accrual_start && date < self.accrual_end
    }

    /// True for a stub period.
    #[must_use]
    pub fn is_stub(&self) -> bool {
        self.kind != PeriodKind::Regular
    }
}

/// Inputs to [`Schedule::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    /// Start of the first accrual period (issue or dated date).
    pub start: Date,
    /// Maturity.
    pub end: Date,
    /// Coupon frequency.
    pub frequency: Frequency,
    /// Calendar for payment dates.
    pub calendar: CalendarId,
    /// Payment date adjustment.
    pub business_day_convention: BusinessDayConvention,
    /// Keep month-end anchors on month ends.
    pub end_of_month: bool,
    /// Explicit first coupon date.
    pub first_coupon: Option<Date>,
    /// Explicit penultimate coupon date.
    pub penultimate_coupon: Option<Date>,
    /// Stub placement without explicit dates.
    pub stub_rule: StubRule,
}

impl ScheduleConfig {
    /// Weekend calendar, Following, end-of-month rolling, short front stub.
    #[must_use]
    pub fn new(start: Date, end: Date, frequency: Frequency) -> Self {
        Self {
            start,
            end,
            frequency,
            calendar: CalendarId::WeekendOnly,
            business_day_convention: BusinessDayConvention::Following,
            end_of_month: true,
            first_coupon: None,
            penultimate_coupon: None,
            stub_rule: StubRule::ShortFront,
        }
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the business day convention.
    #[must_use]
    pub fn with_business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.business_day_convention = convention;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn with_end_of_month(mut self, eom: bool) -> Self {
        self.end_of_month = eom;
        self
    }

    /// Sets the first coupon date.
    #[must_use]
    pub fn with_first_coupon(mut self, date: Date) -> Self {
        self.first_coupon = Some(date);
        self
    }

    /// Sets the penultimate coupon date.
    #[must_use]
    pub fn with_penultimate_coupon(mut self, date: Date) -> Self {
        self.penultimate_coupon = Some(date);
        self
    }

    /// Sets the stub rule.
    #[must_use]
    pub fn with_stub_rule(mut self, rule: StubRule) -> Self {
        self.stub_rule = rule;
        self
    }

    fn validate(&self) -> BondResult<()> {
        if self.start >= self.end {
            return Err(BondError::invalid_schedule(format!(
                "start {} must be before end {}",
                self.start, self.end
            )));
        }
        if let Some(first) = self.first_coupon {
            if first <= self.start || first > self.end {
                return Err(BondError::invalid_schedule(format!(
                    "first coupon {first} outside ({}, {}]",
                    self.start, self.end
                )));
            }
        }
        if let Some(penultimate) = self.penultimate_coupon {
            let floor = self.first_coupon.unwrap_or(self.start);
            if penultimate < floor || penultimate >= self.end || penultimate <= self.start {
                return Err(BondError::invalid_schedule(format!(
                    "penultimate coupon {penultimate} outside [{floor}, {})",
                    self.end
                )));
            }
        }
        Ok(())
    }
}

/// Ordered coupon periods of a bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    periods: Vec<CouponPeriod>,
    frequency: Frequency,
}

impl Schedule {
    /// Generates the schedule described by `config`.
    pub fn generate(config: &ScheduleConfig) -> BondResult<Self> {
        config.validate()?;

        let months = config.frequency.months_per_period() as i32;
        let dates = if config.frequency.is_zero() {
            vec![config.start, config.end]
        } else if config.penultimate_coupon.is_none() && config.stub_rule.rolls_forward() {
            forward_dates(config, months)?
        } else {
            backward_dates(config, months)?
        };

        let calendar = config.calendar.calendar();
        let last = dates.len() - 2;
        let periods: Vec<CouponPeriod> = dates
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (start, end) = (pair[0], pair[1]);
                let regular =
                    config.frequency.is_zero() || is_regular(start, end, months, config.end_of_month);
                let kind = if regular {
                    PeriodKind::Regular
                } else if i == last && (i > 0 || config.stub_rule.rolls_forward()) {
                    PeriodKind::BackStub
                } else {
                    PeriodKind::FrontStub
                };
                CouponPeriod {
                    accrual_start: start,
                    accrual_end: end,
                    payment_date: calendar.adjust(end, config.business_day_convention),
                    kind,
                }
            })
            .collect();

        debug!(
            "generated {} coupon periods from {} to {}",
            periods.len(),
            config.start,
            config.end
        );

        Ok(Self {
            periods,
            frequency: config.frequency,
        })
    }

    /// Builds a schedule from existing periods.
    pub fn from_periods(periods: Vec<CouponPeriod>, frequency: Frequency) -> BondResult<Self> {
        if periods.is_empty() {
            return Err(BondError::invalid_schedule("no coupon periods"));
        }
        let contiguous = periods
            .windows(2)
            .all(|w| w[0].accrual_end == w[1].accrual_start);
        let ordered = periods.iter().all(|p| p.accrual_start < p.accrual_end);
        if !(contiguous && ordered) {
            return Err(BondError::invalid_schedule(
                "periods must be ordered and contiguous",
            ));
        }
        Ok(Self { periods, frequency })
    }

    /// The schedule cut short at `date`, for yield-to-call workouts.
    ///
    /// If `date` falls inside a period, that period ends on `date` and
    /// becomes a back stub.
    pub fn truncated(
        &self,
        date: Date,
        calendar: CalendarId,
        convention: BusinessDayConvention,
    ) -> BondResult<Self> {
        let mut periods = Vec::new();
        for period in &self.periods {
            if period.accrual_start >= date {
                break;
            }
            if period.accrual_end <= date {
                periods.push(*period);
            } else {
                periods.push(CouponPeriod {
                    accrual_start: period.accrual_start,
                    accrual_end: date,
                    payment_date: calendar.calendar().adjust(date, convention),
                    kind: PeriodKind::BackStub,
                });
            }
        }
        Self::from_periods(periods, self.frequency)
    }

    /// Coupon periods in date order.
    #[must_use]
    pub fn periods(&self) -> &[CouponPeriod] {
        &self.periods
    }

    /// Coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True if there are no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Unadjusted dates: accrual start followed by every period end.
    #[must_use]
    pub fn unadjusted_dates(&self) -> Vec<Date> {
        self.periods
            .first()
            .map(|p| p.accrual_start)
            .into_iter()
            .chain(self.periods.iter().map(|p| p.accrual_end))
            .collect()
    }

    /// Payment dates.
    #[must_use]
    pub fn payment_dates(&self) -> Vec<Date> {
        self.periods.iter().map(|p| p.payment_date).collect()
    }

    /// Period whose accrual contains `date`.
    #[must_use]
    pub fn period_containing(&self, date: Date) -> Option<&CouponPeriod> {
        self.periods.iter().find(|p| p.contains(date))
    }
}

/// Rolls `anchor` by `months`, pinning to month end when the anchor is one.
pub(crate) fn roll(anchor: Date, months: i32, end_of_month: bool) -> BondResult<Date> {
    let rolled = anchor.add_months(months)?;
    if end_of_month && anchor.is_end_of_month() {
        Ok(rolled.end_of_month())
    } else {
        Ok(rolled)
    }
}

/// True if `[start, end]` is exactly one coupon period.
pub(crate) fn is_regular(start: Date, end: Date, months: i32, end_of_month: bool) -> bool {
    if months <= 0 {
        return false;
    }
    let forward = roll(start, months, end_of_month).ok();
    let backward = roll(end, -months, end_of_month).ok();
    forward == Some(end) || backward == Some(start)
}

fn backward_dates(config: &ScheduleConfig, months: i32) -> BondResult<Vec<Date>> {
    let front = config.first_coupon.unwrap_or(config.start);
    let anchor = config.penultimate_coupon.unwrap_or(config.end);

    let mut dates = vec![config.end];
    if anchor != config.end {
        dates.push(anchor);
    }
    let mut k = 1;
    loop {
        let date = roll(anchor, -months * k, config.end_of_month)?;
        if date <= front {
            break;
        }
        dates.push(date);
        k += 1;
    }
    dates.push(front);
    if front != config.start {
        dates.push(config.start);
    }
    dates.reverse();

    if config.first_coupon.is_none()
        && config.stub_rule == StubRule::LongFront
        && dates.len() > 2
        && !is_regular(dates[0], dates[1], months, config.end_of_month)
    {
        dates.remove(1);
    }
    Ok(dates)
}

fn forward_dates(config: &ScheduleConfig, months: i32) -> BondResult<Vec<Date>> {
    let anchor = config.first_coupon.unwrap_or(config.start);

    let mut dates = vec![config.start];
    if anchor != config.start {
        dates.push(anchor);
    }
    let mut k = 1;
    loop {
        let date = roll(anchor, months * k, config.end_of_month)?;
        if date >= config.end {
            break;
        }
        dates.push(date);
        k += 1;
    }
    if dates.last() != Some(&config.end) {
        dates.push(config.end);
    }

    let n = dates.len();
    if config.stub_rule == StubRule::LongBack
        && n > 2
        && !is_regular(dates[n - 2], dates[n - 1], months, config.end_of_month)
    {
        dates.remove(n - 2);
    }
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_regular_schedule() {
        let config = ScheduleConfig::new(date(2020, 6, 15), date(2025, 6, 15), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config).unwrap();
        assert_eq!(schedule.len(), 10);
        assert!(schedule.periods().iter().all(|p| p.kind == PeriodKind::Regular));
        assert_eq!(schedule.periods()[0].accrual_end, date(2020, 12, 15));
        assert_eq!(schedule.unadjusted_dates().len(), 11);
    }

    #[test]
    fn test_short_front_stub() {
        let config = ScheduleConfig::new(date(2005, 5, 31), date(2025, 6, 15), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config).unwrap();
        let first = schedule.periods()[0];
        assert_eq!(first.kind, PeriodKind::FrontStub);
        assert_eq!(first.accrual_end, date(2005, 6, 15));
        assert_eq!(schedule.len(), 41);
        assert!(schedule.periods()[1..].iter().all(|p| !p.is_stub()));
    }

    #[test]
    fn test_long_front_stub() {
        let config = ScheduleConfig::new(date(2025, 3, 3), date(2030, 6, 15), Frequency::SemiAnnual)
            .with_stub_rule(StubRule::LongFront);
        let schedule = Schedule::generate(&config).unwrap();
        let first = schedule.periods()[0];
        assert_eq!(first.kind, PeriodKind::FrontStub);
        assert_eq!(first.accrual_end, date(2025, 12, 15));
        assert_eq!(schedule.len(), 10);
    }

    #[test]
    fn test_explicit_first_coupon() {
        let config = ScheduleConfig::new(date(2025, 1, 10), date(2028, 7, 1), Frequency::SemiAnnual)
            .with_first_coupon(date(2025, 7, 1));
        let schedule = Schedule::generate(&config).unwrap();
        assert_eq!(schedule.periods()[0].accrual_end, date(2025, 7, 1));
        assert_eq!(schedule.periods()[0].kind, PeriodKind::FrontStub);
        assert_eq!(schedule.len(), 7);
    }

    #[test]
    fn test_back_stubs() {
        let short = ScheduleConfig::new(date(2025, 1, 15), date(2027, 3, 1), Frequency::SemiAnnual)
            .with_stub_rule(StubRule::ShortBack);
        let schedule = Schedule::generate(&short).unwrap();
        let last = *schedule.periods().last().unwrap();
        assert_eq!(last.kind, PeriodKind::BackStub);
        assert_eq!(last.accrual_start, date(2027, 1, 15));

        let long = short.clone().with_stub_rule(StubRule::LongBack);
        let schedule = Schedule::generate(&long).unwrap();
        let last = *schedule.periods().last().unwrap();
        assert_eq!(last.accrual_start, date(2026, 7, 15));
        assert_eq!(last.kind, PeriodKind::BackStub);

        let explicit = ScheduleConfig::new(date(2025, 1, 15), date(2027, 3, 1), Frequency::SemiAnnual)
            .with_penultimate_coupon(date(2026, 7, 15));
        let schedule = Schedule::generate(&explicit).unwrap();
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.periods()[3].kind, PeriodKind::BackStub);
    }

    #[test]
    fn test_end_of_month_rolling() {
        let config = ScheduleConfig::new(date(2024, 2, 29), date(2026, 8, 31), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config).unwrap();
        let dates = schedule.unadjusted_dates();
        assert!(dates.contains(&date(2025, 2, 28)));
        assert!(dates.contains(&date(2024, 8, 31)));
        assert!(schedule.periods().iter().all(|p| !p.is_stub()));

        let feb = ScheduleConfig::new(date(2023, 8, 31), date(2025, 2, 28), Frequency::SemiAnnual);
        let dates = Schedule::generate(&feb).unwrap().unadjusted_dates();
        assert!(dates.contains(&date(2024, 8, 31)));
        let dates = Schedule::generate(&feb.with_end_of_month(false))
            .unwrap()
            .unadjusted_dates();
        assert!(dates.contains(&date(2024, 8, 28)));
    }

    #[test]
    fn test_payment_dates_adjusted() {
        // 2025-03-15 is a Saturday
        let config = ScheduleConfig::new(date(2024, 9, 15), date(2026, 3, 15), Frequency::SemiAnnual)
            .with_calendar(CalendarId::WeekendOnly);
        let schedule = Schedule::generate(&config).unwrap();
        let p = schedule.periods()[0];
        assert_eq!(p.accrual_end, date(2025, 3, 15));
        assert_eq!(p.payment_date, date(2025, 3, 17));
    }

    #[test]
    fn test_truncated() {
        let config = ScheduleConfig::new(date(2020, 6, 15), date(2030, 6, 15), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config).unwrap();
        let at_coupon = schedule
            .truncated(date(2025, 6, 15), CalendarId::WeekendOnly, BusinessDayConvention::Following)
            .unwrap();
        assert_eq!(at_coupon.len(), 10);
        assert!(!at_coupon.periods()[9].is_stub());

        let mid = schedule
            .truncated(date(2025, 8, 1), CalendarId::WeekendOnly, BusinessDayConvention::Following)
            .unwrap();
        assert_eq!(mid.len(), 11);
        assert_eq!(mid.periods()[10].kind, PeriodKind::BackStub);
    }

    #[test]
    fn test_invalid_configs() {
        let inverted = ScheduleConfig::new(date(2025, 1, 1), date(2024, 1, 1), Frequency::Annual);
        assert!(matches!(
            Schedule::generate(&inverted),
            Err(BondError::InvalidSchedule { .. })
        ));
        let bad_first = ScheduleConfig::new(date(2025, 1, 1), date(2030, 1, 1), Frequency::Annual)
            .with_first_coupon(date(2031, 1, 1));
        assert!(Schedule::generate(&bad_first).is_err());
    }
}
