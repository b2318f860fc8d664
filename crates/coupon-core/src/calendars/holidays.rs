//! Rule-based holiday calendars.
//!
//! Holidays are expanded once, at construction, into a set of dates over a
//! fixed year range, so each later query is a single set lookup.

use std::collections::HashSet;

use chrono::Weekday;

use super::Calendar;
use crate::types::{days_in_month, Date};

/// First year covered by rule-based calendars.
pub const MIN_YEAR: i32 = 1950;

/// Last year covered by rule-based calendars.
pub const MAX_YEAR: i32 = 2200;

/// How a fixed-date holiday that lands on a weekend is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observance {
    /// Not moved; a weekend holiday is simply lost.
    None,
    /// Saturday moves to Friday, Sunday to Monday.
    NearestWeekday,
    /// Sunday moves to Monday, Saturday is lost.
    SundayToMonday,
    /// Moves to the next weekday that is not already a holiday.
    Substitute,
}

/// A recurring holiday definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    /// Same month and day every year.
    Fixed {
        /// Month (1-12).
        month: u32,
        /// Day of month.
        day: u32,
        /// Weekend observance.
        observance: Observance,
    },
    /// The n-th given weekday of a month (n starts at 1).
    NthWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday.
        weekday: Weekday,
        /// Occurrence.
        n: u32,
    },
    /// The last given weekday of a month.
    LastWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday.
        weekday: Weekday,
    },
    /// Offset in days from Easter Sunday (e.g. -2 for Good Friday).
    Easter {
        /// Days relative to Easter Sunday.
        offset: i64,
    },
}

impl HolidayRule {
    fn date_in(&self, year: i32) -> Option<Date> {
        match *self {
            HolidayRule::Fixed { month, day, .. } => Date::from_ymd(year, month, day).ok(),
            HolidayRule::NthWeekday { month, weekday, n } => {
                let first = Date::from_ymd(year, month, 1).ok()?;
                let shift = days_until(first.weekday(), weekday);
                let day = 1 + shift + 7 * (n.max(1) - 1);
                (day <= days_in_month(year, month))
                    .then(|| Date::from_ymd(year, month, day).ok())
                    .flatten()
            }
            HolidayRule::LastWeekday { month, weekday } => {
                let last = Date::from_ymd(year, month, days_in_month(year, month)).ok()?;
                let back = days_until(weekday, last.weekday());
                Some(last.add_days(-i64::from(back)))
            }
            HolidayRule::Easter { offset } => easter_sunday(year).map(|e| e.add_days(offset)),
        }
    }

    fn observance(&self) -> Observance {
        match self {
            HolidayRule::Fixed { observance, .. } => *observance,
            _ => Observance::None,
        }
    }
}

/// Days from weekday `from` forward to weekday `to` (0-6).
fn days_until(from: Weekday, to: Weekday) -> u32 {
    (7 + to.num_days_from_monday() - from.num_days_from_monday()) % 7
}

/// Easter Sunday (Gregorian), anonymous computus.
#[must_use]
pub fn easter_sunday(year: i32) -> Option<Date> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    Date::from_ymd(year, month as u32, day as u32).ok()
}

/// A weekend-plus-holidays calendar backed by an explicit holiday set.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    name: String,
    holidays: HashSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar from explicit holiday dates (weekends are always closed).
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Starts a rule-based calendar.
    pub fn builder(name: impl Into<String>) -> HolidayCalendarBuilder {
        HolidayCalendarBuilder::new(name)
    }

    /// Returns true if `date` is a listed holiday (weekends excluded).
    #[must_use]
    pub fn is_listed_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }

    /// Number of listed holidays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Returns true if no holidays are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.holidays.contains(&date)
    }
}

/// Builder expanding [`HolidayRule`]s into a [`HolidayCalendar`].
#[derive(Debug, Clone)]
pub struct HolidayCalendarBuilder {
    name: String,
    rules: Vec<(HolidayRule, i32, i32)>,
    extra: Vec<Date>,
    excluded: Vec<Date>,
    first_year: i32,
    last_year: i32,
}

impl HolidayCalendarBuilder {
    /// Creates an empty builder covering [`MIN_YEAR`, `MAX_YEAR`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            extra: Vec::new(),
            excluded: Vec::new(),
            first_year: MIN_YEAR,
            last_year: MAX_YEAR,
        }
    }

    /// Restricts the expanded year range.
    #[must_use]
    pub fn year_range(mut self, first: i32, last: i32) -> Self {
        self.first_year = first;
        self.last_year = last;
        self
    }

    /// Adds a rule applying in every year.
    #[must_use]
    pub fn rule(mut self, rule: HolidayRule) -> Self {
        self.rules.push((rule, i32::MIN, i32::MAX));
        self
    }

    /// Adds a rule applying only from `year` onwards.
    #[must_use]
    pub fn rule_from(mut self, rule: HolidayRule, year: i32) -> Self {
        self.rules.push((rule, year, i32::MAX));
        self
    }

    /// Adds a fixed-date holiday.
    #[must_use]
    pub fn fixed(self, month: u32, day: u32, observance: Observance) -> Self {
        self.rule(HolidayRule::Fixed {
            month,
            day,
            observance,
        })
    }

    /// Adds an n-th weekday holiday.
    #[must_use]
    pub fn nth_weekday(self, month: u32, weekday: Weekday, n: u32) -> Self {
        self.rule(HolidayRule::NthWeekday { month, weekday, n })
    }

    /// Adds a last-weekday-of-month holiday.
    #[must_use]
    pub fn last_weekday(self, month: u32, weekday: Weekday) -> Self {
        self.rule(HolidayRule::LastWeekday { month, weekday })
    }

    /// Adds an Easter-relative holiday.
    #[must_use]
    pub fn easter(self, offset: i64) -> Self {
        self.rule(HolidayRule::Easter { offset })
    }

    /// Adds a one-off holiday.
    #[must_use]
    pub fn one_off(mut self, date: Date) -> Self {
        self.extra.push(date);
        self
    }

    /// Removes a date the rules would otherwise produce (a moved holiday).
    #[must_use]
    pub fn except(mut self, date: Date) -> Self {
        self.excluded.push(date);
        self
    }

    /// Expands the rules into a calendar.
    #[must_use]
    pub fn build(self) -> HolidayCalendar {
        let mut holidays = HashSet::new();

        for year in self.first_year..=self.last_year {
            for (rule, from, to) in &self.rules {
                if year < *from || year > *to {
                    continue;
                }
                let Some(date) = rule.date_in(year) else {
                    continue;
                };
                let observed = match rule.observance() {
                    Observance::None => Some(date),
                    Observance::NearestWeekday => match date.weekday() {
                        Weekday::Sat => Some(date.add_days(-1)),
                        Weekday::Sun => Some(date.add_days(1)),
                        _ => Some(date),
                    },
                    Observance::SundayToMonday => match date.weekday() {
                        Weekday::Sun => Some(date.add_days(1)),
                        _ => Some(date),
                    },
                    Observance::Substitute => {
                        let mut d = date;
                        while d.is_weekend() || holidays.contains(&d) {
                            d = d.add_days(1);
                        }
                        Some(d)
                    }
                };
                if let Some(d) = observed.filter(|d| !d.is_weekend()) {
                    holidays.insert(d);
                }
            }
        }

        for date in &self.excluded {
            holidays.remove(date);
        }
        holidays.extend(self.extra);
        log::trace!("built calendar {} with {} holidays", self.name, holidays.len());

        HolidayCalendar {
            name: self.name,
            holidays,
        }
    }
}
