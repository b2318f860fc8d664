//! # Coupon
//!
//! Fixed income analytics: curves built from market quotes, bonds and their
//! cash flows, and the prices, yields, spreads and risk that connect them.
//!
//! This crate re-exports the public API of the workspace:
//!
//! | module | crate | contents |
//! |--------|-------|----------|
//! | [`primitives`] | `coupon-core` | dates, day counts, calendars, cash flows |
//! | [`math`] | `coupon-math` | solvers, interpolation, extrapolation, least squares |
//! | [`curves`] | `coupon-curves` | discount curves, instruments, bootstrap, bumping |
//! | [`bonds`] | `coupon-bonds` | schedules, fixed, zero, callable and floating bonds |
//! | [`analytics`] | `coupon-analytics` | pricing, spreads, risk, standalone queries |
//!
//! Every fallible call in the workspace returns a typed error that converts
//! into [`Error`], so a whole workflow composes with `?`.
//!
//! ## Example
//!
//! ```rust
//! use coupon::prelude::*;
//!
//! fn run() -> coupon::Result<()> {
//!     let spot = Date::from_ymd(2025, 1, 2)?;
//!     let curve = SequentialBootstrapper::new(spot)
//!         .add(Deposit::from_tenor(spot, "6M", 0.0430)?)
//!         .add(Deposit::from_tenor(spot, "1Y", 0.0415)?)
//!         .add(Swap::from_tenor(spot, "3Y", 0.0400)?)
//!         .add(Swap::from_tenor(spot, "5Y", 0.0405)?)
//!         .bootstrap()?;
//!
//!     let bond = FixedRateBond::builder()
//!         .coupon_percent(4.75)
//!         .issue_date(Date::from_ymd(2024, 9, 30)?)
//!         .maturity(Date::from_ymd(2029, 9, 30)?)
//!         .us_corporate()
//!         .build()?;
//!
//!     let analysis = analyze(&bond, Some(&curve), spot, Quote::CleanPrice(100.25))?;
//!     assert!(analysis.z_spread.is_some());
//!     assert!(analysis.risk.modified_duration > 3.5);
//!     Ok(())
//! }
//! run().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use coupon_analytics as analytics;
pub use coupon_bonds as bonds;
pub use coupon_core as primitives;
pub use coupon_curves as curves;
pub use coupon_math as math;

/// Error covering every failure in the workspace.
///
/// Lower level errors (`CoreError`, `MathError`, `CurveError`, `BondError`)
/// convert into it with `?`.
pub use coupon_analytics::AnalyticsError as Error;

/// Result with [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Prelude module for convenient imports.
///
/// ```rust
/// use coupon::prelude::*;
/// ```
pub mod prelude {
    pub use coupon_analytics::prelude::*;
    pub use coupon_bonds::prelude::*;
    pub use coupon_core::prelude::*;
    pub use coupon_curves::prelude::*;
    pub use coupon_math::solvers::SolverConfig;

    pub use crate::{Error, Result};
}
