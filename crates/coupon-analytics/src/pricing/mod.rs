//! Bond pricing.
//!
//! - [`yields`]: price and yield conversion, street convention by default
//! - [`curve`]: discounting flows off a curve, with or without a spread
//! - [`PricingResult`]: clean, dirty, accrued and yield in one value
//! - [`workout`]: yield to call, put and worst
//! - [`money_market`]: discount, bond-equivalent and CD-equivalent yields
//! - [`quotes`]: 32nds price quotes
//! - [`batch`]: many bonds at once
//!
//! ```rust
//! use coupon_analytics::pricing::{price_from_yield, yield_from_price};
//! use coupon_bonds::FixedRateBond;
//! use coupon_core::{Compounding, Date};
//! use coupon_math::solvers::SolverConfig;
//!
//! let bond = FixedRateBond::builder()
//!     .coupon_percent(5.0)
//!     .issue_date(Date::from_ymd(2025, 1, 15).unwrap())
//!     .maturity(Date::from_ymd(2035, 1, 15).unwrap())
//!     .build()
//!     .unwrap();
//! let settle = Date::from_ymd(2025, 3, 3).unwrap();
//!
//! let dirty = price_from_yield(&bond, 0.047, settle, Compounding::SemiAnnual).unwrap();
//! let clean = dirty - bond_accrued(&bond, settle);
//! let y = yield_from_price(&bond, clean, settle, Compounding::SemiAnnual, &SolverConfig::default())
//!     .unwrap();
//! assert!((y - 0.047).abs() < 1e-10);
//! # fn bond_accrued(b: &FixedRateBond, s: Date) -> f64 {
//! #     coupon_analytics::pricing::accrued_per_100(b, s).unwrap()
//! # }
//! ```

pub mod batch;
pub mod curve;
pub mod money_market;
pub mod quotes;
mod result;
pub mod workout;
pub mod yields;

pub use batch::{price_batch, yield_batch};
pub use curve::{price_from_curve, price_with_spread, DiscountedFlows};
pub use quotes::{format_fractional_price, parse_fractional_price};
pub use result::PricingResult;
pub use workout::{
    workout_yields, yield_to_first_call, yield_to_put, yield_to_worst, WorkoutYield,
};
pub use yields::{
    accrued_per_100, clean_price_from_yield, compounding_for, price_from_yield,
    street_compounding, yield_from_dirty_price, yield_from_price, YieldFlows,
};
