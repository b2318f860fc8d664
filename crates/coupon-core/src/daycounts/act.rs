//! Actual/360 and Actual/365 day counts.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::{is_leap_year, Date};

/// Actual/360: actual days over a 360-day year. Money market convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed: actual days over 365 regardless of leap years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Leap: 366-day basis when the period contains 29 February.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Leap;

impl Act365Leap {
    fn contains_feb_29(start: Date, end: Date) -> bool {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        (lo.year()..=hi.year())
            .filter(|&y| is_leap_year(y))
            .filter_map(|y| Date::from_ymd(y, 2, 29).ok())
            .any(|feb29| feb29 > lo && feb29 <= hi)
    }
}

impl DayCount for Act365Leap {
    fn name(&self) -> &'static str {
        "ACT/365L"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let basis = if Self::contains_feb_29(start, end) {
            366
        } else {
            365
        };
        Decimal::from(self.day_count(start, end)) / Decimal::from(basis)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
