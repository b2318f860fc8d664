//! Yield to call, put and worst.

use log::debug;
use serde::{Deserialize, Serialize};

use coupon_bonds::{Bond, CallableBond, WorkoutKind};
use coupon_core::{Compounding, Date};
use coupon_math::solvers::SolverConfig;

use super::yields::{accrued_per_100, street_compounding, YieldFlows};
use crate::error::{AnalyticsError, AnalyticsResult};

/// Yield to one redemption date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutYield {
    /// Redemption date.
    pub date: Date,
    /// Redemption price per 100 face.
    pub price: f64,
    /// Whether the bond is called, put or matures.
    pub kind: WorkoutKind,
    /// Yield to that date.
    pub yield_rate: f64,
}

/// Yields to every call, put and maturity, by date.
///
/// The same clean price is used for every workout; accrued interest is that
/// of the underlying bond.
pub fn workout_yields(
    bond: &CallableBond,
    clean_price: f64,
    settlement: Date,
    compounding: Option<Compounding>,
    config: &SolverConfig,
) -> AnalyticsResult<Vec<WorkoutYield>> {
    let compounding = compounding.unwrap_or_else(|| street_compounding(bond));
    let dirty = clean_price + accrued_per_100(bond, settlement)?;
    let guess = bond.coupon_rate().max(0.01);

    bond.workouts(settlement)?
        .into_iter()
        .map(|workout| {
            let flows = YieldFlows::new(&workout.bond, settlement, compounding)?;
            let yield_rate = flows.solve(dirty, guess, config)?;
            Ok(WorkoutYield {
                date: workout.date,
                price: workout.price,
                kind: workout.kind,
                yield_rate,
            })
        })
        .collect()
}

fn first_of_kind(
    yields: Vec<WorkoutYield>,
    kinds: &[WorkoutKind],
    pick: impl Fn(&WorkoutYield, &WorkoutYield) -> bool,
) -> Option<WorkoutYield> {
    yields
        .into_iter()
        .filter(|w| kinds.contains(&w.kind))
        .reduce(|best, w| if pick(&w, &best) { w } else { best })
}

/// Lowest yield over the call dates and maturity.
///
/// Puts are excluded: they are the holder's option and only raise the yield.
pub fn yield_to_worst(
    bond: &CallableBond,
    clean_price: f64,
    settlement: Date,
    compounding: Option<Compounding>,
    config: &SolverConfig,
) -> AnalyticsResult<WorkoutYield> {
    let yields = workout_yields(bond, clean_price, settlement, compounding, config)?;
    let worst = first_of_kind(
        yields,
        &[WorkoutKind::Call, WorkoutKind::Maturity],
        |a, b| a.yield_rate < b.yield_rate,
    )
    .ok_or_else(|| AnalyticsError::invalid_input("no workout dates"))?;
    debug!(
        "{}: yield to worst {:.6} on {}",
        bond.identifier(),
        worst.yield_rate,
        worst.date
    );
    Ok(worst)
}

/// Yield to the first call after settlement.
pub fn yield_to_first_call(
    bond: &CallableBond,
    clean_price: f64,
    settlement: Date,
    compounding: Option<Compounding>,
    config: &SolverConfig,
) -> AnalyticsResult<WorkoutYield> {
    workout_yields(bond, clean_price, settlement, compounding, config)?
        .into_iter()
        .find(|w| w.kind == WorkoutKind::Call)
        .ok_or_else(|| {
            AnalyticsError::invalid_input(format!("no call after {settlement}"))
        })
}

/// Highest yield over the put dates.
pub fn yield_to_put(
    bond: &CallableBond,
    clean_price: f64,
    settlement: Date,
    compounding: Option<Compounding>,
    config: &SolverConfig,
) -> AnalyticsResult<WorkoutYield> {
    let yields = workout_yields(bond, clean_price, settlement, compounding, config)?;
    first_of_kind(yields, &[WorkoutKind::Put], |a, b| {
        a.yield_rate > b.yield_rate
    })
    .ok_or_else(|| AnalyticsError::invalid_input(format!("no put after {settlement}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_bonds::types::{CallSchedule, ExerciseStyle, PutSchedule};
    use coupon_bonds::FixedRateBond;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn base() -> FixedRateBond {
        FixedRateBond::builder()
            .coupon_percent(6.0)
            .issue_date(date(2022, 3, 15))
            .maturity(date(2032, 3, 15))
            .build()
            .unwrap()
    }

    fn callable() -> CallableBond {
        let calls = CallSchedule::new(ExerciseStyle::European)
            .with_entry(date(2027, 3, 15), 102.0)
            .with_entry(date(2029, 3, 15), 100.0);
        CallableBond::new(base(), calls).unwrap()
    }

    #[test]
    fn test_premium_bond_worst_is_a_call() {
        let bond = callable();
        let settle = date(2026, 1, 5);
        let config = SolverConfig::default();
        let yields = workout_yields(&bond, 108.0, settle, None, &config).unwrap();
        assert_eq!(yields.len(), 3);
        assert_eq!(yields.last().unwrap().kind, WorkoutKind::Maturity);

        let worst = yield_to_worst(&bond, 108.0, settle, None, &config).unwrap();
        assert_eq!(worst.kind, WorkoutKind::Call);
        assert!(yields.iter().all(|w| w.yield_rate >= worst.yield_rate));
    }

    #[test]
    fn test_discount_bond_worst_is_maturity() {
        let worst =
            yield_to_worst(&callable(), 92.0, date(2026, 1, 5), None, &SolverConfig::default())
                .unwrap();
        assert_eq!(worst.kind, WorkoutKind::Maturity);
        assert_eq!(worst.date, date(2032, 3, 15));
    }

    #[test]
    fn test_first_call_and_put() {
        let bond = callable()
            .with_puts(PutSchedule::new(ExerciseStyle::European).with_entry(date(2028, 3, 15), 100.0))
            .unwrap();
        let config = SolverConfig::default();
        let settle = date(2026, 1, 5);
        let first = yield_to_first_call(&bond, 101.0, settle, None, &config).unwrap();
        assert_eq!(first.date, date(2027, 3, 15));
        assert_eq!(first.price, 102.0);
        let put = yield_to_put(&bond, 101.0, settle, None, &config).unwrap();
        assert_eq!(put.date, date(2028, 3, 15));
        assert!(yield_to_put(&callable(), 101.0, settle, None, &config).is_err());
    }
}
