//! Bonds with embedded calls and puts.

use coupon_core::calendars::BusinessDayConvention;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};
use serde::{Deserialize, Serialize};

use super::FixedRateBond;
use crate::cashflows::Schedule;
use crate::error::{BondError, BondResult};
use crate::traits::Bond;
use crate::types::{CalendarId, CallSchedule, ExerciseSchedule, ExerciseStyle, PutSchedule};

/// What ends a workout bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutKind {
    /// Issuer call.
    Call,
    /// Holder put.
    Put,
    /// Final maturity.
    Maturity,
}

/// The bond redeemed on one exercise date.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    /// Redemption date.
    pub date: Date,
    /// Redemption price per 100 face.
    pub price: f64,
    /// Call, put or maturity.
    pub kind: WorkoutKind,
    /// Bond with the schedule cut at `date`.
    pub bond: FixedRateBond,
}

/// A fixed rate bond with a call schedule and an optional put schedule.
///
/// Cash flows and accrued interest are those of the underlying bullet;
/// the options matter only to option-aware analytics (yield to worst,
/// OAS).
///
/// ```rust
/// use coupon_bonds::prelude::*;
/// use coupon_core::Date;
///
/// let base = FixedRateBond::builder()
///     .coupon_percent(6.0)
///     .issue_date(Date::from_ymd(2022, 3, 15).unwrap())
///     .maturity(Date::from_ymd(2032, 3, 15).unwrap())
///     .build()
///     .unwrap();
/// let calls = CallSchedule::new(ExerciseStyle::Bermudan)
///     .with_entry(Date::from_ymd(2027, 3, 15).unwrap(), 101.0)
///     .with_entry(Date::from_ymd(2029, 3, 15).unwrap(), 100.0);
/// let bond = CallableBond::new(base, calls).unwrap();
///
/// let workouts = bond.workouts(Date::from_ymd(2026, 1, 5).unwrap()).unwrap();
/// assert_eq!(workouts.len(), 11);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallableBond {
    base: FixedRateBond,
    calls: CallSchedule,
    puts: Option<PutSchedule>,
}

impl CallableBond {
    /// Creates a callable bond.
    ///
    /// # Errors
    ///
    /// `InvalidSpec` if the call schedule is empty or has dates outside
    /// the bond's life.
    pub fn new(base: FixedRateBond, calls: CallSchedule) -> BondResult<Self> {
        if calls.is_empty() {
            return Err(BondError::invalid_spec("call schedule has no entries"));
        }
        calls.validate(base.issue_date(), base.maturity())?;
        Ok(Self {
            base,
            calls,
            puts: None,
        })
    }

    /// Adds a put schedule.
    pub fn with_puts(mut self, puts: PutSchedule) -> BondResult<Self> {
        puts.validate(self.base.issue_date(), self.base.maturity())?;
        self.puts = (!puts.is_empty()).then_some(puts);
        Ok(self)
    }

    /// The underlying bullet bond.
    #[must_use]
    pub fn base(&self) -> &FixedRateBond {
        &self.base
    }

    /// Call schedule.
    #[must_use]
    pub fn call_schedule(&self) -> &CallSchedule {
        &self.calls
    }

    /// Put schedule, if any.
    #[must_use]
    pub fn put_schedule(&self) -> Option<&PutSchedule> {
        self.puts.as_ref()
    }

    /// True if the bond carries a put.
    #[must_use]
    pub fn has_put(&self) -> bool {
        self.puts.is_some()
    }

    /// Call price if the issuer can call on `date`.
    #[must_use]
    pub fn call_price(&self, date: Date) -> Option<f64> {
        self.calls.exercise_price(date, self.base.is_coupon_date(date))
    }

    /// Put price if the holder can put on `date`.
    #[must_use]
    pub fn put_price(&self, date: Date) -> Option<f64> {
        self.puts
            .as_ref()
            .and_then(|p| p.exercise_price(date, self.base.is_coupon_date(date)))
    }

    /// Exercise dates of `schedule` after `settlement` and before maturity.
    ///
    /// Bermudan and American options are sampled on the listed dates plus
    /// every coupon date from the first listed date.
    #[must_use]
    pub fn exercise_dates(&self, schedule: &ExerciseSchedule, settlement: Date) -> Vec<Date> {
        let maturity = self.base.maturity();
        let mut dates: Vec<Date> = schedule.entries().iter().map(|e| e.date).collect();
        if schedule.style() != ExerciseStyle::European {
            if let Some(first) = schedule.first_date() {
                dates.extend(
                    self.base
                        .schedule()
                        .periods()
                        .iter()
                        .map(|p| p.accrual_end)
                        .filter(|&d| d >= first),
                );
            }
        }
        dates.retain(|&d| d > settlement && d < maturity);
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Every call, put and the maturity as redemption bonds, by date.
    pub fn workouts(&self, settlement: Date) -> BondResult<Vec<Workout>> {
        self.base.check_settlement(settlement)?;
        let mut workouts = Vec::new();

        for date in self.exercise_dates(&self.calls, settlement) {
            if let Some(price) = self.call_price(date) {
                workouts.push(Workout {
                    date,
                    price,
                    kind: WorkoutKind::Call,
                    bond: self.base.to_workout(date, price)?,
                });
            }
        }
        if let Some(puts) = &self.puts {
            for date in self.exercise_dates(puts, settlement) {
                if let Some(price) = self.put_price(date) {
                    workouts.push(Workout {
                        date,
                        price,
                        kind: WorkoutKind::Put,
                        bond: self.base.to_workout(date, price)?,
                    });
                }
            }
        }
        workouts.push(Workout {
            date: self.base.maturity(),
            price: 100.0 * self.base.redemption_value() / self.base.face_value(),
            kind: WorkoutKind::Maturity,
            bond: self.base.clone(),
        });
        workouts.sort_by_key(|w| w.date);
        Ok(workouts)
    }
}

impl Bond for CallableBond {
    fn identifier(&self) -> &str {
        self.base.identifier()
    }

    fn issue_date(&self) -> Date {
        self.base.issue_date()
    }

    fn maturity(&self) -> Date {
        self.base.maturity()
    }

    fn coupon_rate(&self) -> f64 {
        self.base.coupon_rate()
    }

    fn frequency(&self) -> Frequency {
        self.base.frequency()
    }

    fn day_count(&self) -> DayCountConvention {
        self.base.day_count()
    }

    fn face_value(&self) -> f64 {
        self.base.face_value()
    }

    fn redemption_value(&self) -> f64 {
        self.base.redemption_value()
    }

    fn settlement_days(&self) -> u32 {
        self.base.settlement_days()
    }

    fn calendar(&self) -> CalendarId {
        self.base.calendar()
    }

    fn business_day_convention(&self) -> BusinessDayConvention {
        self.base.business_day_convention()
    }

    fn end_of_month(&self) -> bool {
        self.base.end_of_month()
    }

    fn ex_dividend_days(&self) -> Option<u32> {
        self.base.ex_dividend_days()
    }

    fn schedule(&self) -> &Schedule {
        self.base.schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn base() -> FixedRateBond {
        FixedRateBond::builder()
            .identifier("CALL 6 2032")
            .coupon_percent(6.0)
            .issue_date(date(2022, 3, 15))
            .maturity(date(2032, 3, 15))
            .build()
            .unwrap()
    }

    #[test]
    fn test_bermudan_workouts() {
        let calls = CallSchedule::new(ExerciseStyle::Bermudan)
            .with_entry(date(2027, 3, 15), 101.0)
            .with_entry(date(2029, 3, 15), 100.0);
        let bond = CallableBond::new(base(), calls).unwrap();
        let settle = date(2026, 1, 5);

        let workouts = bond.workouts(settle).unwrap();
        // ten semi-annual call dates from 2027-03-15 to 2031-09-15, then maturity
        assert_eq!(workouts.len(), 11);
        assert_eq!(workouts[0].kind, WorkoutKind::Call);
        assert_eq!(workouts[0].price, 101.0);
        assert_eq!(workouts[4].date, date(2029, 3, 15));
        assert_eq!(workouts[4].price, 100.0);
        let last = workouts.last().unwrap();
        assert_eq!(last.kind, WorkoutKind::Maturity);
        assert_eq!(last.bond.maturity(), date(2032, 3, 15));

        assert_eq!(bond.call_price(date(2027, 6, 1)), None);
        assert_eq!(bond.call_price(date(2027, 9, 15)), Some(101.0));
    }

    #[test]
    fn test_european_and_puts() {
        let calls = CallSchedule::new(ExerciseStyle::European).with_entry(date(2028, 3, 15), 100.5);
        let puts = PutSchedule::new(ExerciseStyle::European).with_entry(date(2030, 3, 15), 100.0);
        let bond = CallableBond::new(base(), calls)
            .unwrap()
            .with_puts(puts)
            .unwrap();
        assert!(bond.has_put());

        let workouts = bond.workouts(date(2026, 1, 5)).unwrap();
        let kinds: Vec<WorkoutKind> = workouts.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WorkoutKind::Call, WorkoutKind::Put, WorkoutKind::Maturity]
        );
        assert_eq!(bond.put_price(date(2030, 3, 15)), Some(100.0));
        assert_eq!(bond.put_price(date(2030, 9, 15)), None);
    }

    #[test]
    fn test_passed_calls_dropped() {
        let calls = CallSchedule::new(ExerciseStyle::European).with_entry(date(2025, 3, 15), 101.0);
        let bond = CallableBond::new(base(), calls).unwrap();
        let workouts = bond.workouts(date(2026, 1, 5)).unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].kind, WorkoutKind::Maturity);
    }

    #[test]
    fn test_delegates_to_base() {
        let calls = CallSchedule::new(ExerciseStyle::American).with_entry(date(2027, 3, 15), 100.0);
        let bond = CallableBond::new(base(), calls).unwrap();
        let settle = date(2026, 1, 5);
        assert_eq!(
            bond.cash_flows(settle).unwrap(),
            bond.base().cash_flows(settle).unwrap()
        );
        assert_eq!(
            bond.accrued_interest(settle).unwrap(),
            bond.base().accrued_interest(settle).unwrap()
        );
    }

    #[test]
    fn test_invalid_schedules() {
        assert!(CallableBond::new(base(), CallSchedule::new(ExerciseStyle::Bermudan)).is_err());
        let late = CallSchedule::new(ExerciseStyle::European).with_entry(date(2033, 1, 1), 100.0);
        assert!(CallableBond::new(base(), late).is_err());
    }
}
