//! Day count conventions.
//!
//! A day count convention maps a pair of dates to a year fraction. Fractions
//! are returned as [`Decimal`] so that the 30/360 family and coupon-period
//! based conventions are exact; [`DayCount::year_fraction_f64`] is the float
//! convenience used by pricing code.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360, money market
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`Act365Leap`]: Actual/365 Leap
//! - [`ActActIsda`]: Actual/Actual ISDA, split by calendar year
//! - [`ActActIcma`]: Actual/Actual ICMA, period based
//! - [`Thirty360US`]: 30/360 US with February end-of-month rules
//! - [`Thirty360E`]: 30E/360 Eurobond basis
//! - [`Thirty360EIsda`]: 30E/360 ISDA
//!
//! Every convention returns exactly zero for `start == end` and a negated
//! fraction when `end < start`.

mod act;
mod actact;
mod thirty360;

pub use act::{Act360, Act365Fixed, Act365Leap};
pub use actact::{ActActIcma, ActActIsda};
pub use thirty360::{Thirty360E, Thirty360EIsda, Thirty360US};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, Frequency};

/// A day count rule.
pub trait DayCount: Send + Sync {
    /// Market name of the convention.
    fn name(&self) -> &'static str;

    /// Year fraction between two dates.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Day count between two dates under this convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as `f64`.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(f64::NAN)
    }
}

/// Named day count convention, chosen once per instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// Actual/365 Leap.
    Act365Leap,
    /// Actual/Actual ISDA.
    ActActIsda,
    /// Actual/Actual ICMA (semi-annual reference periods when used stand-alone).
    ActActIcma,
    /// 30/360 US (Bond Basis).
    Thirty360US,
    /// 30E/360 (Eurobond Basis).
    Thirty360E,
    /// 30E/360 ISDA.
    Thirty360EIsda,
}

impl DayCountConvention {
    /// Boxed implementation of this convention.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Act365Leap => Box::new(Act365Leap),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::ActActIcma => Box::new(ActActIcma::default()),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
            DayCountConvention::Thirty360EIsda => Box::new(Thirty360EIsda::default()),
        }
    }

    /// Market name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act365Leap => "ACT/365L",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::ActActIcma => "ACT/ACT ICMA",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
            DayCountConvention::Thirty360EIsda => "30E/360 ISDA",
        }
    }

    /// All supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Act365Leap,
            DayCountConvention::ActActIsda,
            DayCountConvention::ActActIcma,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
            DayCountConvention::Thirty360EIsda,
        ]
    }

    /// Exact year fraction without boxing.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::Act365Leap => Act365Leap.year_fraction(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
            DayCountConvention::ActActIcma => ActActIcma::default().year_fraction(start, end),
            DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
            DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
            DayCountConvention::Thirty360EIsda => {
                Thirty360EIsda::default().year_fraction(start, end)
            }
        }
    }

    /// Year fraction as `f64`.
    #[must_use]
    pub fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(f64::NAN)
    }

    /// Day count between two dates.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCountConvention::Thirty360US => Thirty360US.day_count(start, end),
            DayCountConvention::Thirty360E => Thirty360E.day_count(start, end),
            DayCountConvention::Thirty360EIsda => Thirty360EIsda::default().day_count(start, end),
            _ => start.days_between(&end),
        }
    }

    /// Year fraction of `[start, end]` inside the coupon period
    /// `[period_start, period_end]`.
    ///
    /// ACT/ACT ICMA measures against the reference period so that a full
    /// regular period is exactly `1 / frequency`; other conventions ignore
    /// the period and use their own rule. `maturity` feeds the 30E/360 ISDA
    /// termination date rule.
    #[must_use]
    pub fn year_fraction_in_period(
        &self,
        start: Date,
        end: Date,
        period_start: Date,
        period_end: Date,
        frequency: Frequency,
        maturity: Option<Date>,
    ) -> Decimal {
        match self {
            DayCountConvention::ActActIcma => {
                ActActIcma::new(frequency.periods_per_year().max(1))
                    .year_fraction_with_period(start, end, period_start, period_end)
            }
            DayCountConvention::Thirty360EIsda => {
                Thirty360EIsda::new(maturity).year_fraction(start, end)
            }
            other => other.year_fraction(start, end),
        }
    }

    /// Days-per-year basis used for simple interest quotes.
    #[must_use]
    pub const fn basis(&self) -> u32 {
        match self {
            DayCountConvention::Act360
            | DayCountConvention::Thirty360US
            | DayCountConvention::Thirty360E
            | DayCountConvention::Thirty360EIsda => 360,
            DayCountConvention::Act365Fixed
            | DayCountConvention::Act365Leap
            | DayCountConvention::ActActIsda
            | DayCountConvention::ActActIcma => 365,
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses market names ("ACT/360", "30/360 US") and common aliases
    /// ("BOND", "EUROBOND", "ACTUAL/ACTUAL").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACT365" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT/365L" | "ACT/365 LEAP" => Ok(DayCountConvention::Act365Leap),
            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTUAL/ACTUAL ISDA" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "ACT/ACT ICMA" | "ACTUAL/ACTUAL ICMA" | "ISMA" | "ICMA" => {
                Ok(DayCountConvention::ActActIcma)
            }
            "30/360" | "30/360 US" | "30U/360" | "BOND" | "BOND BASIS" => {
                Ok(DayCountConvention::Thirty360US)
            }
            "30E/360" | "EUROBOND" | "30/360 ICMA" => Ok(DayCountConvention::Thirty360E),
            "30E/360 ISDA" => Ok(DayCountConvention::Thirty360EIsda),
            _ => Err(CoreError::unknown_convention(s)),
        }
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
    fn test_zero_length_interval_is_zero_for_all() {
        let d = date(2024, 2, 29);
        for dc in DayCountConvention::all() {
            assert_eq!(dc.year_fraction(d, d), Decimal::ZERO, "{dc}");
            assert_eq!(dc.to_day_count().year_fraction(d, d), Decimal::ZERO, "{dc}");
        }
    }

    #[test]
    fn test_act360_act365_ratio() {
        let start = date(2025, 3, 10);
        let end = date(2025, 9, 22);
        let a360 = DayCountConvention::Act360.year_fraction_f64(start, end);
        let a365 = DayCountConvention::Act365Fixed.year_fraction_f64(start, end);
        approx::assert_relative_eq!(a360 / a365, 365.0 / 360.0, epsilon = 1e-14);
    }

    #[test]
    fn test_icma_in_period() {
        let yf = DayCountConvention::ActActIcma.year_fraction_in_period(
            date(2025, 1, 15),
            date(2025, 7, 15),
            date(2025, 1, 15),
            date(2025, 7, 15),
            Frequency::SemiAnnual,
            None,
        );
        assert_eq!(yf, dec!(0.5));

        let yf = DayCountConvention::ActActIcma.year_fraction_in_period(
            date(2025, 1, 15),
            date(2026, 1, 15),
            date(2025, 1, 15),
            date(2026, 1, 15),
            Frequency::Annual,
            None,
        );
        assert_eq!(yf, dec!(1));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(
            "act/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert_eq!(
            "BOND".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Thirty360US
        );
        assert!("ACT/999".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for dc in DayCountConvention::all() {
            let parsed: DayCountConvention = dc.name().parse().unwrap();
            assert_eq!(parsed, *dc);
            assert_eq!(dc.to_day_count().name(), dc.name());
        }
    }
}
