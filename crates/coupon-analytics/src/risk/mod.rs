//! Interest rate risk.
//!
//! - [`duration`]: Macaulay and modified duration, analytic convexity
//! - [`effective`]: curve-bumped duration and convexity through a [`CurvePricer`]
//! - [`dv01`]: price value of a basis point
//! - [`key_rate`]: key-rate DV01s that reconcile with the parallel DV01
//! - [`spread_duration`]: Z-spread sensitivity
//! - [`RiskMetrics`]: yield risk in one value
//!
//! ```rust
//! use coupon_analytics::risk::{dv01, modified_duration};
//! use coupon_bonds::FixedRateBond;
//! use coupon_core::{Compounding, Date};
//!
//! let bond = FixedRateBond::builder()
//!     .coupon_percent(5.0)
//!     .issue_date(Date::from_ymd(2025, 1, 15).unwrap())
//!     .maturity(Date::from_ymd(2030, 1, 15).unwrap())
//!     .build()
//!     .unwrap();
//! let settle = Date::from_ymd(2025, 1, 15).unwrap();
//! let md = modified_duration(&bond, 0.05, settle, Compounding::SemiAnnual).unwrap();
//! let dv01 = dv01(&bond, 0.05, settle, Compounding::SemiAnnual).unwrap();
//! // at par the DV01 per 100 is the modified duration in basis points
//! assert!((dv01 - md * 1e-2).abs() < 1e-10);
//! ```

pub mod duration;
pub mod dv01;
pub mod effective;
pub mod key_rate;
mod metrics;
pub mod spread_duration;

pub use duration::{
    convexity, macaulay_duration, modified_duration, modified_from_macaulay,
    price_change_from_duration, price_change_with_convexity,
};
pub use dv01::{
    curve_dv01, dv01, dv01_from_duration, dv01_from_prices, dv01_notional, notional_from_dv01,
    ONE_BP,
};
pub use effective::{
    effective_convexity, effective_duration, CurvePricer, EffectiveRisk, FrnPricer, OasPricer,
    SpreadPricer,
};
pub use key_rate::{
    key_rate_dv01s, key_rate_dv01s_with_config, key_rate_profile_for, standard_key_rate_dv01s,
    KeyRateDv01, KeyRateProfile,
};
pub use metrics::RiskMetrics;
pub use spread_duration::{spread_duration, spread_dv01};
