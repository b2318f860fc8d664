//! Value types shared by the bond definitions.

mod options;

pub use options::{CallSchedule, ExerciseEntry, ExerciseSchedule, ExerciseStyle, PutSchedule};

use std::fmt;
use std::str::FromStr;

use coupon_core::calendars::{
    Calendar, Target2Calendar, UkCalendar, UsGovernmentCalendar, WeekendCalendar,
};
use coupon_core::CoreError;
use serde::{Deserialize, Serialize};

/// Business day calendar a bond rolls and settles on.
///
/// Bonds store the identifier rather than the calendar itself so that they
/// stay `Clone` and serializable; [`CalendarId::calendar`] resolves it to the
/// shared implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CalendarId {
    /// Weekends only.
    #[default]
    WeekendOnly,
    /// US government bond market (SIFMA).
    UsGovernment,
    /// Eurozone TARGET2.
    Target2,
    /// London.
    Uk,
}

impl CalendarId {
    /// Weekend-only calendar (no holidays).
    #[must_use]
    pub fn weekend_only() -> Self {
        Self::WeekendOnly
    }

    /// US government calendar.
    #[must_use]
    pub fn us_government() -> Self {
        Self::UsGovernment
    }

    /// TARGET2 calendar.
    #[must_use]
    pub fn target2() -> Self {
        Self::Target2
    }

    /// UK calendar.
    #[must_use]
    pub fn uk() -> Self {
        Self::Uk
    }

    /// The calendar implementation.
    #[must_use]
    pub fn calendar(&self) -> &'static dyn Calendar {
        match self {
            Self::WeekendOnly => &WeekendCalendar,
            Self::UsGovernment => &UsGovernmentCalendar,
            Self::Target2 => &Target2Calendar,
            Self::Uk => &UkCalendar,
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WeekendOnly => "WEEKEND",
            Self::UsGovernment => "USGov",
            Self::Target2 => "TARGET2",
            Self::Uk => "UK",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CalendarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEEKEND" | "WEEKENDS" | "NONE" => Ok(Self::WeekendOnly),
            "USGOV" | "US" | "SIFMA" | "USGOVERNMENT" => Ok(Self::UsGovernment),
            "TARGET" | "TARGET2" | "EUR" => Ok(Self::Target2),
            "UK" | "GB" | "LONDON" => Ok(Self::Uk),
            _ => Err(CoreError::unknown_convention(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_core::Date;

    #[test]
    fn test_calendar_resolution() {
        // Independence Day 2025 falls on a Friday
        let july4 = Date::from_ymd(2025, 7, 4).unwrap();
        assert!(CalendarId::WeekendOnly.calendar().is_business_day(july4));
        assert!(!CalendarId::UsGovernment.calendar().is_business_day(july4));
        assert_eq!(CalendarId::Target2.calendar().name(), "TARGET2");
    }

    #[test]
    fn test_parse_round_trip() {
        for id in [
            CalendarId::WeekendOnly,
            CalendarId::UsGovernment,
            CalendarId::Target2,
            CalendarId::Uk,
        ] {
            assert_eq!(id.to_string().parse::<CalendarId>().unwrap(), id);
        }
        assert!("Mars".parse::<CalendarId>().is_err());
    }
}
