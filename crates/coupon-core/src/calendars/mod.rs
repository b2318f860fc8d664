//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait and weekend-only / joint calendars
//! - Rule-based holiday calendars ([`HolidayCalendarBuilder`])
//! - US government bond (SIFMA), TARGET2 and UK market calendars
//! - Business day adjustment conventions

mod conventions;
mod holidays;
mod markets;

pub use conventions::{adjust, BusinessDayConvention};
pub use holidays::{
    easter_sunday, HolidayCalendar, HolidayCalendarBuilder, HolidayRule, Observance, MAX_YEAR,
    MIN_YEAR,
};
pub use markets::{Target2Calendar, UkCalendar, UsGovernmentCalendar};

use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday (weekends included).
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Advances a date by a number of business days (negative moves back).
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.unsigned_abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Returns the next business day on or after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        conventions::following(date, self)
    }

    /// Returns the previous business day on or before the given date.
    fn previous_business_day(&self, date: Date) -> Date {
        conventions::preceding(date, self)
    }

    /// Counts business days in `(start, end]`.
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }

    /// Settlement date `lag` business days after `trade_date`.
    fn settlement_date(&self, trade_date: Date, lag: u32) -> Date {
        let start = self.next_business_day(trade_date);
        self.add_business_days(start, i32::try_from(lag).unwrap_or(i32::MAX))
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Calendar that combines multiple calendars: a day is a business day only
/// if every member calendar considers it one.
pub struct JointCalendar {
    calendars: Vec<Box<dyn Calendar>>,
    name: String,
}

impl JointCalendar {
    /// Creates a joint calendar from member calendars.
    #[must_use]
    pub fn new(calendars: Vec<Box<dyn Calendar>>) -> Self {
        let name = calendars
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>()
            .join(" + ");

        Self { calendars, name }
    }
}

impl std::fmt::Debug for JointCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JointCalendar").field("name", &self.name).finish()
    }
}

impl Calendar for JointCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.calendars.iter().all(|cal| cal.is_business_day(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;
        assert!(cal.is_business_day(date(2025, 1, 3)));
        assert!(!cal.is_business_day(date(2025, 1, 4)));
        assert!(cal.is_holiday(date(2025, 1, 5)));
    }

    #[test]
    fn test_add_business_days() {
        let cal = WeekendCalendar;
        // Friday + 1 = Monday
        assert_eq!(cal.add_business_days(date(2025, 1, 3), 1), date(2025, 1, 6));
        // Monday - 1 = Friday
        assert_eq!(cal.add_business_days(date(2025, 1, 6), -1), date(2025, 1, 3));
        assert_eq!(cal.add_business_days(date(2025, 1, 6), 0), date(2025, 1, 6));
    }

    #[test]
    fn test_business_days_between() {
        let cal = WeekendCalendar;
        assert_eq!(cal.business_days_between(date(2025, 1, 3), date(2025, 1, 10)), 5);
    }

    #[test]
    fn test_settlement_date_t_plus_2() {
        let cal = WeekendCalendar;
        // Thursday trade settles Monday
        assert_eq!(cal.settlement_date(date(2025, 1, 2), 2), date(2025, 1, 6));
        // Saturday trade rolls to Monday first
        assert_eq!(cal.settlement_date(date(2025, 1, 4), 1), date(2025, 1, 7));
    }

    #[test]
    fn test_joint_calendar() {
        let a = HolidayCalendar::new("A", [date(2025, 1, 6)]);
        let b = HolidayCalendar::new("B", [date(2025, 1, 7)]);
        let joint = JointCalendar::new(vec![Box::new(a), Box::new(b)]);
        assert_eq!(joint.name(), "A + B");
        assert!(!joint.is_business_day(date(2025, 1, 6)));
        assert!(!joint.is_business_day(date(2025, 1, 7)));
        assert_eq!(joint.next_business_day(date(2025, 1, 4)), date(2025, 1, 8));
    }
}
