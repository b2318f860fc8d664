//! # Coupon Bonds
//!
//! Bond definitions for the Coupon fixed income engine.
//!
//! - **Schedules**: backward generation from maturity with short or long
//!   front and back stubs, end-of-month rolling and adjusted payment dates
//! - **Instruments**: fixed rate, zero coupon, callable/putable and floating
//!   rate bonds
//! - **Accrual**: day count fractions per coupon period, ICMA notional
//!   periods for stubs, ex-coupon (negative) accrued interest
//!
//! Bonds are immutable. Cash flows, accrued interest and yield times are
//! derived from the terms for each settlement date and only flows strictly
//! after settlement are returned.
//!
//! ## Quick Start
//!
//! ```rust
//! use coupon_bonds::prelude::*;
//! use coupon_core::Date;
//!
//! let bond = FixedRateBond::builder()
//!     .identifier("UST 4.25 11/15/34")
//!     .coupon_percent(4.25)
//!     .issue_date(Date::from_ymd(2024, 11, 15).unwrap())
//!     .maturity(Date::from_ymd(2034, 11, 15).unwrap())
//!     .us_treasury()
//!     .build()
//!     .unwrap();
//!
//! let settle = Date::from_ymd(2025, 2, 14).unwrap();
//! let flows = bond.cash_flows(settle).unwrap();
//! assert_eq!(flows.len(), 20);
//! assert!(bond.accrued_interest(settle).unwrap() > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::float_cmp)]

pub mod cashflows;
pub mod error;
pub mod instruments;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{
        AccrualRules, CouponPeriod, PeriodKind, Schedule, ScheduleConfig, StubRule,
    };
    pub use crate::error::{BondError, BondResult};
    pub use crate::instruments::{
        CallableBond, FixedRateBond, FixedRateBondBuilder, FloatingRateNote,
        FloatingRateNoteBuilder, Workout, WorkoutKind, ZeroCouponBond,
    };
    pub use crate::traits::Bond;
    pub use crate::types::{
        CalendarId, CallSchedule, ExerciseEntry, ExerciseSchedule, ExerciseStyle, PutSchedule,
    };
}

pub use error::{BondError, BondResult};
pub use instruments::{
    CallableBond, FixedRateBond, FloatingRateNote, Workout, WorkoutKind, ZeroCouponBond,
};
pub use traits::Bond;
