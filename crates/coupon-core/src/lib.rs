//! # Coupon Core
//!
//! Foundational types for the Coupon fixed income engine.
//!
//! - **Types**: [`Date`], [`Frequency`], [`Compounding`], [`CashFlow`]
//! - **Day Count Conventions**: exact year fractions under market conventions
//! - **Business Day Calendars**: holiday calendars and roll conventions
//!
//! Everything in this crate is an immutable value type or a stateless rule,
//! so it can be shared freely across threads.
//!
//! ## Example
//!
//! ```rust
//! use coupon_core::prelude::*;
//!
//! let start = Date::from_ymd(2024, 2, 29).unwrap();
//! let end = Date::from_ymd(2024, 8, 31).unwrap();
//!
//! let yf = DayCountConvention::Thirty360US.year_fraction_f64(start, end);
//! assert!((yf - 0.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, HolidayCalendar, JointCalendar, Target2Calendar,
        UkCalendar, UsGovernmentCalendar, WeekendCalendar,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{CashFlow, CashFlowKind, Compounding, Date, Frequency};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{CashFlow, CashFlowKind, Compounding, Date, Frequency};
