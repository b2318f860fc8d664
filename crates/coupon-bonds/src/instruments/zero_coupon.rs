//! Zero coupon bonds.

use coupon_core::calendars::BusinessDayConvention;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};

use crate::cashflows::{Schedule, ScheduleConfig};
use crate::error::{BondError, BondResult};
use crate::traits::Bond;
use crate::types::CalendarId;

/// A bond paying only its redemption at maturity.
///
/// Accrued interest is always zero. Yields compound at the quote frequency
/// (semi-annual by default) over the year fraction to maturity.
///
/// ```rust
/// use coupon_bonds::prelude::*;
/// use coupon_core::Date;
///
/// let bill = ZeroCouponBond::new(
///     "B 0 06/26/26",
///     Date::from_ymd(2025, 12, 26).unwrap(),
///     Date::from_ymd(2026, 6, 26).unwrap(),
/// )
/// .unwrap();
/// let flows = bill.cash_flows(Date::from_ymd(2026, 1, 5).unwrap()).unwrap();
/// assert_eq!(flows.len(), 1);
/// assert_eq!(flows[0].amount, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroCouponBond {
    identifier: String,
    issue_date: Date,
    maturity: Date,
    day_count: DayCountConvention,
    quote_frequency: Frequency,
    settlement_days: u32,
    calendar: CalendarId,
    business_day_convention: BusinessDayConvention,
    face_value: f64,
    redemption_value: f64,
    schedule: Schedule,
}

impl ZeroCouponBond {
    /// Creates a zero with ACT/365F, semi-annual quotes, face 100 and T+1
    /// on the weekend calendar.
    pub fn new(identifier: impl Into<String>, issue_date: Date, maturity: Date) -> BondResult<Self> {
        if maturity <= issue_date {
            return Err(BondError::invalid_spec("maturity must be after issue_date"));
        }
        let calendar = CalendarId::WeekendOnly;
        let business_day_convention = BusinessDayConvention::Following;
        Ok(Self {
            identifier: identifier.into(),
            issue_date,
            maturity,
            day_count: DayCountConvention::Act365Fixed,
            quote_frequency: Frequency::SemiAnnual,
            settlement_days: 1,
            calendar,
            business_day_convention,
            face_value: 100.0,
            redemption_value: 100.0,
            schedule: single_period(issue_date, maturity, calendar, business_day_convention)?,
        })
    }

    /// Sets the day count for yield times.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the compounding frequency of quoted yields.
    #[must_use]
    pub fn with_quote_frequency(mut self, frequency: Frequency) -> Self {
        self.quote_frequency = frequency;
        self
    }

    /// Sets the settlement lag.
    #[must_use]
    pub fn with_settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Sets the face value; redemption follows it.
    pub fn with_face_value(mut self, face: f64) -> BondResult<Self> {
        if !(face.is_finite() && face > 0.0) {
            return Err(BondError::invalid_spec("face_value must be positive"));
        }
        self.face_value = face;
        self.redemption_value = face;
        Ok(self)
    }

    /// Sets the calendar and re-adjusts the payment date.
    pub fn with_calendar(
        mut self,
        calendar: CalendarId,
        convention: BusinessDayConvention,
    ) -> BondResult<Self> {
        self.calendar = calendar;
        self.business_day_convention = convention;
        self.schedule = single_period(self.issue_date, self.maturity, calendar, convention)?;
        Ok(self)
    }
}

fn single_period(
    issue_date: Date,
    maturity: Date,
    calendar: CalendarId,
    convention: BusinessDayConvention,
) -> BondResult<Schedule> {
    let config = ScheduleConfig::new(issue_date, maturity, Frequency::Zero)
        .with_calendar(calendar)
        .with_business_day_convention(convention);
    Schedule::generate(&config)
}

impl Bond for ZeroCouponBond {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn issue_date(&self) -> Date {
        self.issue_date
    }

    fn maturity(&self) -> Date {
        self.maturity
    }

    fn coupon_rate(&self) -> f64 {
        0.0
    }

    fn frequency(&self) -> Frequency {
        Frequency::Zero
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn face_value(&self) -> f64 {
        self.face_value
    }

    fn redemption_value(&self) -> f64 {
        self.redemption_value
    }

    fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    fn calendar(&self) -> CalendarId {
        self.calendar
    }

    fn business_day_convention(&self) -> BusinessDayConvention {
        self.business_day_convention
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn yield_frequency(&self) -> Frequency {
        self.quote_frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_core::CashFlowKind;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_single_redemption_flow() {
        let bond = ZeroCouponBond::new("Z 2030", date(2020, 3, 1), date(2030, 3, 1))
            .unwrap()
            .with_face_value(1000.0)
            .unwrap();
        let settle = date(2025, 3, 3);
        let flows = bond.cash_flows(settle).unwrap();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].kind, CashFlowKind::Principal);
        assert_eq!(flows[0].amount, 1000.0);
        assert_eq!(bond.accrued_interest(settle).unwrap(), 0.0);

        let times = bond.yield_times(settle).unwrap();
        assert_relative_eq!(times[0], 1824.0 / 365.0, epsilon = 1e-12);
        assert_eq!(bond.yield_frequency(), Frequency::SemiAnnual);
    }

    #[test]
    fn test_payment_date_adjusted() {
        // 2026-02-28 is a Saturday
        let bond = ZeroCouponBond::new("Z", date(2025, 2, 28), date(2026, 2, 28)).unwrap();
        let flows = bond.cash_flows(date(2025, 6, 2)).unwrap();
        assert_eq!(flows[0].date, date(2026, 3, 2));
        let modified = bond
            .with_calendar(CalendarId::WeekendOnly, BusinessDayConvention::ModifiedFollowing)
            .unwrap();
        assert_eq!(modified.cash_flows(date(2025, 6, 2)).unwrap()[0].date, date(2026, 2, 27));
    }

    #[test]
    fn test_invalid() {
        assert!(ZeroCouponBond::new("Z", date(2026, 1, 1), date(2025, 1, 1)).is_err());
        let bond = ZeroCouponBond::new("Z", date(2025, 1, 1), date(2026, 1, 1)).unwrap();
        assert!(bond.clone().with_face_value(0.0).is_err());
        assert!(matches!(
            bond.cash_flows(date(2026, 1, 1)),
            Err(BondError::InvalidSettlement { .. })
        ));
    }
}
