//! # Coupon Analytics
//!
//! Pricing, spread and risk calculations over `coupon-bonds` instruments and
//! `coupon-curves` term structures.
//!
//! - **Pricing**: price and yield in street convention, clean and dirty
//!   prices, curve discounting, yield to call/put/worst, money-market
//!   yields, 32nds quotes, batch pricing
//! - **Spreads**: G, I, Z, asset swap (par-par and proceeds), discount
//!   margin, and OAS on a Hull-White lattice
//! - **Risk**: Macaulay and modified duration, convexity, DV01, effective
//!   and key-rate measures, spread duration
//! - **Options**: short rate lattices fitted to the discount curve
//! - **Functions**: one-call queries on a bond and a quote
//!
//! ## Architecture
//!
//! `coupon-analytics` depends on `coupon-bonds` for instrument definitions;
//! bonds never depend on analytics. Every calculation is a pure function of
//! its inputs, so curves and bonds can be shared across threads freely.
//!
//! ## Usage
//!
//! ```rust
//! use coupon_analytics::prelude::*;
//! use coupon_bonds::FixedRateBond;
//! use coupon_core::Date;
//! use coupon_curves::DiscountCurveBuilder;
//!
//! let settle = Date::from_ymd(2025, 1, 2).unwrap();
//! let bond = FixedRateBond::builder()
//!     .coupon_percent(5.0)
//!     .issue_date(Date::from_ymd(2024, 7, 15).unwrap())
//!     .maturity(Date::from_ymd(2031, 7, 15).unwrap())
//!     .build()
//!     .unwrap();
//! let curve = DiscountCurveBuilder::new(settle)
//!     .add_zero_rate(1.0, 0.041)
//!     .add_zero_rate(10.0, 0.044)
//!     .build()
//!     .unwrap();
//!
//! let pricing = PricingResult::from_clean_price(&bond, 101.25, settle, &PricingConfig::default())
//!     .unwrap();
//! let z = z_spread(&bond, &curve, pricing.dirty_price, settle).unwrap();
//! let metrics = RiskMetrics::from_yield(&bond, pricing.yield_to_maturity, settle, pricing.compounding)
//!     .unwrap();
//! assert!(z > 0.0);
//! assert!(metrics.modified_duration > 5.0);
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

pub mod config;
pub mod error;
pub mod functions;
pub mod options;
pub mod pricing;
pub mod risk;
pub mod spreads;

pub use config::{AnalyticsConfig, OasConfig, PricingConfig, RiskConfig};
pub use error::{AnalyticsError, AnalyticsResult};

/// Prelude module for convenient imports.
///
/// ```rust
/// use coupon_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AnalyticsConfig, OasConfig, PricingConfig, RiskConfig};
    pub use crate::error::{AnalyticsError, AnalyticsResult};

    // Pricing
    pub use crate::pricing::money_market::{
        bond_equivalent_yield, discount_yield, money_market_yield,
    };
    pub use crate::pricing::{
        accrued_per_100, clean_price_from_yield, parse_fractional_price, price_batch,
        price_from_curve, price_from_yield, price_with_spread, yield_batch, yield_from_price,
        yield_to_worst, PricingResult, WorkoutYield,
    };

    // Spreads
    pub use crate::spreads::{
        discount_margin, g_spread, i_spread, z_spread, AssetSwap, AswType,
        DiscountMarginCalculator, GSpreadCalculator, OasCalculator, OasResult, ZSpreadCalculator,
    };

    // Risk
    pub use crate::risk::{
        convexity, curve_dv01, dv01, effective_convexity, effective_duration, key_rate_dv01s,
        macaulay_duration, modified_duration, spread_duration, CurvePricer, EffectiveRisk,
        FrnPricer, KeyRateProfile, OasPricer, RiskMetrics, SpreadPricer,
    };

    // Options
    pub use crate::options::{HullWhite, RateLattice, ShortRateModel};

    // Queries
    pub use crate::functions::{analyze, BondAnalysis, Quote};
}
