//! Market holiday calendars.
//!
//! Each calendar is expanded once into a [`HolidayCalendar`] and shared
//! through a lazily initialised global instance.

use chrono::Weekday;
use once_cell::sync::Lazy;

use super::holidays::{HolidayCalendar, HolidayRule, Observance};
use super::Calendar;
use crate::types::Date;

static US_GOVERNMENT: Lazy<HolidayCalendar> = Lazy::new(build_us_government);
static TARGET2: Lazy<HolidayCalendar> = Lazy::new(build_target2);
static UK: Lazy<HolidayCalendar> = Lazy::new(build_uk);

fn ymd(year: i32, month: u32, day: u32) -> Date {
    // Only called with literal, valid dates.
    Date::from_ymd(year, month, day).unwrap_or_else(|_| Date::from(chrono::NaiveDate::MIN))
}

/// US government bond market calendar (SIFMA recommended closes).
///
/// ## Holidays
///
/// - New Year's Day (Sunday observed Monday; Saturday not observed)
/// - Martin Luther King Jr. Day (3rd Monday in January)
/// - Presidents' Day (3rd Monday in February)
/// - Good Friday
/// - Memorial Day (last Monday in May)
/// - Juneteenth (June 19, observed) from 2022
/// - Independence Day (July 4, observed)
/// - Labor Day (1st Monday in September)
/// - Columbus Day (2nd Monday in October)
/// - Veterans Day (November 11, observed)
/// - Thanksgiving Day (4th Thursday in November)
/// - Christmas Day (December 25, observed)
///
/// Early closes are not modelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsGovernmentCalendar;

impl UsGovernmentCalendar {
    /// Shared holiday set.
    #[must_use]
    pub fn global() -> &'static HolidayCalendar {
        &US_GOVERNMENT
    }
}

impl Calendar for UsGovernmentCalendar {
    fn name(&self) -> &str {
        "US Government"
    }

    fn is_business_day(&self, date: Date) -> bool {
        US_GOVERNMENT.is_business_day(date)
    }
}

fn build_us_government() -> HolidayCalendar {
    HolidayCalendar::builder("US Government")
        .fixed(1, 1, Observance::SundayToMonday)
        .nth_weekday(1, Weekday::Mon, 3)
        .nth_weekday(2, Weekday::Mon, 3)
        .easter(-2)
        .last_weekday(5, Weekday::Mon)
        .rule_from(
            HolidayRule::Fixed {
                month: 6,
                day: 19,
                observance: Observance::NearestWeekday,
            },
            2022,
        )
        .fixed(7, 4, Observance::NearestWeekday)
        .nth_weekday(9, Weekday::Mon, 1)
        .nth_weekday(10, Weekday::Mon, 2)
        .fixed(11, 11, Observance::NearestWeekday)
        .nth_weekday(11, Weekday::Thu, 4)
        .fixed(12, 25, Observance::NearestWeekday)
        // Hurricane Sandy
        .one_off(ymd(2012, 10, 30))
        .build()
}

/// TARGET2 (Eurozone payments) calendar.
///
/// New Year's Day, Good Friday, Easter Monday, Labour Day (May 1),
/// Christmas Day and Boxing Day. Weekend holidays are not moved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Target2Calendar;

impl Target2Calendar {
    /// Shared holiday set.
    #[must_use]
    pub fn global() -> &'static HolidayCalendar {
        &TARGET2
    }
}

impl Calendar for Target2Calendar {
    fn name(&self) -> &str {
        "TARGET2"
    }

    fn is_business_day(&self, date: Date) -> bool {
        TARGET2.is_business_day(date)
    }
}

fn build_target2() -> HolidayCalendar {
    HolidayCalendar::builder("TARGET2")
        .fixed(1, 1, Observance::None)
        .easter(-2)
        .easter(1)
        .fixed(5, 1, Observance::None)
        .fixed(12, 25, Observance::None)
        .fixed(12, 26, Observance::None)
        .one_off(ymd(1999, 12, 31))
        .one_off(ymd(2001, 12, 31))
        .build()
}

/// UK (London) bank holiday calendar.
///
/// New Year's Day, Good Friday, Easter Monday, Early May, Spring and Summer
/// bank holidays, Christmas and Boxing Day with substitute days, plus the
/// one-off royal and millennium holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct UkCalendar;

impl UkCalendar {
    /// Shared holiday set.
    #[must_use]
    pub fn global() -> &'static HolidayCalendar {
        &UK
    }
}

impl Calendar for UkCalendar {
    fn name(&self) -> &str {
        "UK"
    }

    fn is_business_day(&self, date: Date) -> bool {
        UK.is_business_day(date)
    }
}

fn build_uk() -> HolidayCalendar {
    HolidayCalendar::builder("UK")
        .fixed(1, 1, Observance::Substitute)
        .easter(-2)
        .easter(1)
        .rule_from(
            HolidayRule::NthWeekday {
                month: 5,
                weekday: Weekday::Mon,
                n: 1,
            },
            1978,
        )
        .last_weekday(5, Weekday::Mon)
        .last_weekday(8, Weekday::Mon)
        .fixed(12, 25, Observance::Substitute)
        .fixed(12, 26, Observance::Substitute)
        // Early May moved to VE day anniversaries
        .except(ymd(1995, 5, 1))
        .one_off(ymd(1995, 5, 8))
        .except(ymd(2020, 5, 4))
        .one_off(ymd(2020, 5, 8))
        // Spring bank holiday moved for jubilees
        .except(ymd(2002, 5, 27))
        .one_off(ymd(2002, 6, 4))
        .except(ymd(2012, 5, 28))
        .one_off(ymd(2012, 6, 4))
        .except(ymd(2022, 5, 30))
        .one_off(ymd(2022, 6, 2))
        // One-off holidays
        .one_off(ymd(1999, 12, 31))
        .one_off(ymd(2002, 6, 3))
        .one_off(ymd(2011, 4, 29))
        .one_off(ymd(2012, 6, 5))
        .one_off(ymd(2022, 6, 3))
        .one_off(ymd(2022, 9, 19))
        .one_off(ymd(2023, 5, 8))
        .build()
}
