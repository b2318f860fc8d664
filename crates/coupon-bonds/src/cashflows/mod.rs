//! Coupon schedules and accrual.
//!
//! - [`Schedule`]: coupon periods with front and back stubs
//! - [`AccrualRules`]: accrual fractions in coupon periods, ICMA stubs and
//!   ex-coupon accrued interest

mod accrued;
mod schedule;

pub use accrued::{ex_coupon_date, AccrualRules};
pub use schedule::{CouponPeriod, PeriodKind, Schedule, ScheduleConfig, StubRule};
