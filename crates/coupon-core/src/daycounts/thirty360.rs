//! 30/360 day count conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

fn thirty_360_days(y1: i64, m1: i64, d1: i64, y2: i64, m2: i64, d2: i64) -> i64 {
    360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
}

/// 30/360 US (Bond Basis), with the February end-of-month rules.
///
/// 1. If D1 is the last day of February, D1 = 30.
/// 2. Else if D1 is 31, D1 = 30.
/// 3. If D2 is the last day of February and D1 was the last day of February, D2 = 30.
/// 4. Else if D2 is 31 and D1 >= 30, D2 = 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        if start > end {
            return -self.day_count(end, start);
        }

        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        let start_feb_eom = start.is_last_day_of_february();
        if start_feb_eom {
            d1 = 30;
        } else if d1 == 31 {
            d1 = 30;
        }

        if end.is_last_day_of_february() && start_feb_eom {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        thirty_360_days(
            i64::from(start.year()),
            i64::from(start.month()),
            d1,
            i64::from(end.year()),
            i64::from(end.month()),
            d2,
        )
    }
}

/// 30E/360 (Eurobond Basis): day 31 becomes 30 on both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        if start > end {
            return -self.day_count(end, start);
        }
        let d1 = i64::from(start.day()).min(30);
        let d2 = i64::from(end.day()).min(30);

        thirty_360_days(
            i64::from(start.year()),
            i64::from(start.month()),
            d1,
            i64::from(end.year()),
            i64::from(end.month()),
            d2,
        )
    }
}

/// 30E/360 ISDA: month-end dates count as 30, except a February
/// month-end that is also the termination date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360EIsda {
    termination_date: Option<Date>,
}

impl Thirty360EIsda {
    /// Creates the convention with an optional termination (maturity) date.
    #[must_use]
    pub fn new(termination_date: Option<Date>) -> Self {
        Self { termination_date }
    }
}

impl DayCount for Thirty360EIsda {
    fn name(&self) -> &'static str {
        "30E/360 ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        if start > end {
            return -self.day_count(end, start);
        }
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        if start.is_end_of_month() {
            d1 = 30;
        }

        let is_feb_maturity =
            end.month() == 2 && self.termination_date.is_some_and(|term| term == end);
        if end.is_end_of_month() && !is_feb_maturity {
            d2 = 30;
        }

        thirty_360_days(
            i64::from(start.year()),
            i64::from(start.month()),
            d1,
            i64::from(end.year()),
            i64::from(end.month()),
            d2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_thirty360_us_basic() {
        assert_eq!(Thirty360US.day_count(date(2025, 1, 15), date(2025, 7, 15)), 180);
        assert_eq!(
            Thirty360US.year_fraction(date(2025, 1, 15), date(2025, 7, 15)),
            dec!(0.5)
        );
    }

    #[test]
    fn test_thirty360_us_day_31_rules() {
        // D1 = 31 -> 30, then D2 = 31 with D1 >= 30 -> 30
        assert_eq!(Thirty360US.day_count(date(2025, 1, 31), date(2025, 3, 31)), 60);
        // D1 < 30 leaves D2 = 31 untouched
        assert_eq!(Thirty360US.day_count(date(2025, 1, 15), date(2025, 3, 31)), 76);
    }

    #[test]
    fn test_thirty360_us_february_month_end() {
        // Feb 28 (non-leap) is the last day of February
        assert_eq!(Thirty360US.day_count(date(2023, 2, 28), date(2023, 8, 31)), 180);
        // Feb 29 (leap) is the last day of February
        assert_eq!(Thirty360US.day_count(date(2024, 2, 29), date(2024, 8, 31)), 180);
        // Feb 28 in a leap year is NOT the last day of February
        assert_eq!(Thirty360US.day_count(date(2024, 2, 28), date(2024, 8, 31)), 183);
        // Both ends last day of February
        assert_eq!(Thirty360US.day_count(date(2023, 2, 28), date(2024, 2, 29)), 360);
        // End on last day of Feb without start on Feb EOM: no D2 adjustment
        assert_eq!(Thirty360US.day_count(date(2024, 1, 15), date(2024, 2, 29)), 44);
    }

    #[test]
    fn test_thirty360_e() {
        assert_eq!(Thirty360E.day_count(date(2025, 1, 15), date(2025, 3, 31)), 75);
        assert_eq!(Thirty360E.day_count(date(2024, 2, 29), date(2024, 8, 31)), 181);
    }

    #[test]
    fn test_thirty360_e_isda() {
        let dc = Thirty360EIsda::default();
        assert_eq!(dc.day_count(date(2024, 2, 29), date(2024, 8, 31)), 180);

        let maturity = date(2025, 2, 28);
        let dc = Thirty360EIsda::new(Some(maturity));
        assert_eq!(dc.day_count(date(2024, 8, 31), maturity), 178);
    }

    #[test]
    fn test_reversed_is_antisymmetric() {
        let a = date(2023, 2, 28);
        let b = date(2023, 8, 31);
        assert_eq!(Thirty360US.day_count(b, a), -Thirty360US.day_count(a, b));
    }
}
