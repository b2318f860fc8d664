//! Call and put schedules for bonds with embedded options.

use coupon_core::Date;
use serde::{Deserialize, Serialize};

use crate::error::{BondError, BondResult};

/// When an embedded option can be exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExerciseStyle {
    /// Only on the listed dates.
    European,
    /// On any coupon date from the first listed date.
    #[default]
    Bermudan,
    /// On any date from the first listed date.
    American,
}

/// One exercise price, applying from `date` until the next entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// First date this price applies.
    pub date: Date,
    /// Clean exercise price per 100 face.
    pub price: f64,
}

impl ExerciseEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(date: Date, price: f64) -> Self {
        Self { date, price }
    }
}

/// Exercise dates and prices of a call or put provision.
///
/// ```
/// use coupon_bonds::types::{CallSchedule, ExerciseStyle};
/// use coupon_core::Date;
///
/// let calls = CallSchedule::new(ExerciseStyle::American)
///     .with_entry(Date::from_ymd(2027, 1, 15).unwrap(), 102.0)
///     .with_entry(Date::from_ymd(2028, 1, 15).unwrap(), 101.0)
///     .with_entry(Date::from_ymd(2029, 1, 15).unwrap(), 100.0);
///
/// let d = Date::from_ymd(2028, 6, 1).unwrap();
/// assert_eq!(calls.price_on(d), Some(101.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExerciseSchedule {
    style: ExerciseStyle,
    entries: Vec<ExerciseEntry>,
}

/// Issuer call schedule.
pub type CallSchedule = ExerciseSchedule;

/// Holder put schedule.
pub type PutSchedule = ExerciseSchedule;

impl ExerciseSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new(style: ExerciseStyle) -> Self {
        Self {
            style,
            entries: Vec::new(),
        }
    }

    /// Adds an entry, keeping entries sorted by date.
    #[must_use]
    pub fn with_entry(mut self, date: Date, price: f64) -> Self {
        let at = self.entries.partition_point(|e| e.date <= date);
        self.entries.insert(at, ExerciseEntry::new(date, price));
        self
    }

    /// Exercise style.
    #[must_use]
    pub fn style(&self) -> ExerciseStyle {
        self.style
    }

    /// Entries sorted by date.
    #[must_use]
    pub fn entries(&self) -> &[ExerciseEntry] {
        &self.entries
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First exercise date.
    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.entries.first().map(|e| e.date)
    }

    /// Last listed date.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.entries.last().map(|e| e.date)
    }

    /// Exercise price applying on `date`, ignoring the style.
    #[must_use]
    pub fn price_on(&self, date: Date) -> Option<f64> {
        self.entries
            .iter()
            .take_while(|e| e.date <= date)
            .last()
            .map(|e| e.price)
    }

    /// Exercise price if the option can be exercised on `date`.
    ///
    /// `is_coupon_date` tells whether `date` is a coupon date of the bond,
    /// which is what Bermudan exercise requires.
    #[must_use]
    pub fn exercise_price(&self, date: Date, is_coupon_date: bool) -> Option<f64> {
        match self.style {
            ExerciseStyle::European => self
                .entries
                .iter()
                .find(|e| e.date == date)
                .map(|e| e.price),
            ExerciseStyle::Bermudan => {
                let listed = self.entries.iter().any(|e| e.date == date);
                if listed || is_coupon_date {
                    self.price_on(date)
                } else {
                    None
                }
            }
            ExerciseStyle::American => self.price_on(date),
        }
    }

    /// Checks the entries against the bond's life.
    pub fn validate(&self, issue_date: Date, maturity: Date) -> BondResult<()> {
        for entry in &self.entries {
            if entry.date <= issue_date || entry.date > maturity {
                return Err(BondError::invalid_spec(format!(
                    "exercise date {} outside ({issue_date}, {maturity}]",
                    entry.date
                )));
            }
            if !(entry.price.is_finite() && entry.price > 0.0) {
                return Err(BondError::invalid_spec(format!(
                    "exercise price must be positive, got {}",
                    entry.price
                )));
            }
        }
        Ok(())
    }
}
