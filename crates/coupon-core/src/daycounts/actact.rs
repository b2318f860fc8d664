//! Actual/Actual day count conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA: the period is split at calendar-year boundaries and
/// each piece is divided by the length of its own year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            return Decimal::ZERO;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }

        if start.year() == end.year() {
            return Decimal::from(start.days_between(&end))
                / Decimal::from(start.days_in_year());
        }

        // Stub to the end of the first year, whole years, stub into the last year.
        let first_year_end = start.add_days(i64::from(start.days_in_year() - start.day_of_year()) + 1);
        let last_year_start = end.add_days(1 - i64::from(end.day_of_year()));

        let head = Decimal::from(start.days_between(&first_year_end))
            / Decimal::from(start.days_in_year());
        let tail = Decimal::from(last_year_start.days_between(&end))
            / Decimal::from(end.days_in_year());
        let whole_years = Decimal::from(end.year() - start.year() - 1);

        head + whole_years + tail
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ICMA: accrual measured in coupon periods.
///
/// The fraction of a period is actual days over actual days in the
/// reference period, and each period is worth `1 / frequency` years.
/// Used for government bonds and most Eurobonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActActIcma {
    frequency: u32,
}

impl ActActIcma {
    /// Creates the convention for a coupon frequency (periods per year).
    #[must_use]
    pub fn new(frequency: u32) -> Self {
        Self {
            frequency: frequency.max(1),
        }
    }

    /// Coupon frequency this instance was built for.
    #[must_use]
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Year fraction of `[start, end]` measured against an explicit
    /// reference period `[period_start, period_end]`.
    #[must_use]
    pub fn year_fraction_with_period(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
    ) -> Decimal {
        let days_in_period = period_start.days_between(&period_end);
        if days_in_period <= 0 {
            return Decimal::ZERO;
        }

        Decimal::from(start.days_between(&end))
            / (Decimal::from(self.frequency) * Decimal::from(days_in_period))
    }

    fn months_per_period(&self) -> i32 {
        (12 / self.frequency).max(1) as i32
    }
}

impl Default for ActActIcma {
    fn default() -> Self {
        Self::new(2)
    }
}

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT ICMA"
    }

    /// Without an explicit reference period, notional regular periods are
    /// rolled forward from `start`: whole periods count `1 / frequency`
    /// each and the remainder is pro-rated over its own notional period.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            return Decimal::ZERO;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }

        let step = self.months_per_period();
        let per_period = Decimal::ONE / Decimal::from(self.frequency);
        let mut total = Decimal::ZERO;
        let mut period_start = start;
        let mut n = 1;

        loop {
            let Ok(period_end) = start.add_months(step * n) else {
                break;
            };
            if period_end > end {
                return total + self.year_fraction_with_period(period_start, end, period_start, period_end);
            }
            total += per_period;
            if period_end == end {
                return total;
            }
            period_start = period_end;
            n += 1;
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
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
    fn test_actact_isda_full_years() {
        assert_eq!(ActActIsda.year_fraction(date(2025, 1, 1), date(2026, 1, 1)), dec!(1));
        assert_eq!(ActActIsda.year_fraction(date(2024, 1, 1), date(2025, 1, 1)), dec!(1));
    }

    #[test]
    fn test_actact_isda_cross_leap_boundary() {
        // 2024-07-01 to 2025-07-01: 184/366 + 181/365
        let yf = ActActIsda.year_fraction(date(2024, 7, 1), date(2025, 7, 1));
        let expected =
            Decimal::from(184) / Decimal::from(366) + Decimal::from(181) / Decimal::from(365);
        assert_eq!(yf, expected);
    }

    #[test]
    fn test_actact_isda_multi_year() {
        let yf = ActActIsda.year_fraction(date(2023, 12, 31), date(2026, 1, 2));
        let expected = Decimal::from(1) / Decimal::from(365)
            + dec!(2)
            + Decimal::from(1) / Decimal::from(365);
        assert_eq!(yf, expected);
    }

    #[test]
    fn test_actact_icma_with_period() {
        let dc = ActActIcma::new(2);
        let yf = dc.year_fraction_with_period(
            date(2025, 1, 15),
            date(2025, 4, 15),
            date(2025, 1, 15),
            date(2025, 7, 15),
        );
        assert_eq!(yf, Decimal::from(90) / Decimal::from(2 * 181));
    }

    #[test]
    fn test_actact_icma_full_period_is_exact() {
        let dc = ActActIcma::new(2);
        assert_eq!(dc.year_fraction(date(2025, 1, 15), date(2025, 7, 15)), dec!(0.5));
        assert_eq!(dc.year_fraction(date(2024, 8, 15), date(2025, 2, 15)), dec!(0.5));
    }

    #[test]
    fn test_actact_icma_partial_period() {
        let dc = ActActIcma::new(2);
        // One full period plus 92/184 of the next
        let yf = dc.year_fraction(date(2025, 1, 15), date(2025, 10, 15));
        let expected = dec!(0.5) + Decimal::from(92) / Decimal::from(2 * 184);
        assert_eq!(yf, expected);
    }
}
