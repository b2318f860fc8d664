//! Standalone bond queries.
//!
//! Each function takes a bond, a settlement date and a price or yield, plus
//! a curve where the measure needs one. Yields use the bond's street
//! convention compounding; prices are per 100 face.
//!
//! ```rust
//! use coupon_analytics::functions::{analyze, Quote};
//! use coupon_bonds::FixedRateBond;
//! use coupon_core::Date;
//!
//! let bond = FixedRateBond::builder()
//!     .coupon_percent(4.0)
//!     .issue_date(Date::from_ymd(2024, 5, 15).unwrap())
//!     .maturity(Date::from_ymd(2034, 5, 15).unwrap())
//!     .us_treasury()
//!     .build()
//!     .unwrap();
//! let settle = Date::from_ymd(2025, 2, 3).unwrap();
//!
//! let analysis = analyze(&bond, None, settle, Quote::CleanPrice(98.5)).unwrap();
//! assert!(analysis.pricing.yield_to_maturity > 0.04);
//! assert!(analysis.z_spread.is_none());
//! ```

use serde::{Deserialize, Serialize};

use coupon_bonds::Bond;
use coupon_core::Date;
use coupon_curves::Curve;

use crate::config::PricingConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::{self, street_compounding, PricingResult};
use crate::risk::{self, RiskMetrics, SpreadPricer};
use crate::spreads::{self, ZSpreadCalculator};

// ============================================================================
// PRICE AND YIELD
// ============================================================================

/// Street convention yield to maturity from a clean price.
pub fn yield_to_maturity<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    clean_price: f64,
) -> AnalyticsResult<f64> {
    Ok(PricingResult::from_clean_price(bond, clean_price, settlement, &PricingConfig::default())?
        .yield_to_maturity)
}

/// Dirty price from a street convention yield.
pub fn dirty_price_from_yield<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
) -> AnalyticsResult<f64> {
    pricing::price_from_yield(bond, yield_rate, settlement, street_compounding(bond))
}

/// Clean price from a street convention yield.
pub fn clean_price_from_yield<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
) -> AnalyticsResult<f64> {
    pricing::clean_price_from_yield(bond, yield_rate, settlement, street_compounding(bond))
}

/// Accrued interest per 100 face.
pub fn accrued_interest<B: Bond + ?Sized>(bond: &B, settlement: Date) -> AnalyticsResult<f64> {
    pricing::accrued_per_100(bond, settlement)
}

// ============================================================================
// RISK
// ============================================================================

/// Macaulay duration at a street convention yield.
pub fn macaulay_duration<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
) -> AnalyticsResult<f64> {
    risk::macaulay_duration(bond, yield_rate, settlement, street_compounding(bond))
}

/// Modified duration at a street convention yield.
pub fn modified_duration<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
) -> AnalyticsResult<f64> {
    risk::modified_duration(bond, yield_rate, settlement, street_compounding(bond))
}

/// Convexity at a street convention yield.
pub fn convexity<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
) -> AnalyticsResult<f64> {
    risk::convexity(bond, yield_rate, settlement, street_compounding(bond))
}

/// DV01 per 100 face at a street convention yield.
pub fn dv01<B: Bond + ?Sized>(bond: &B, settlement: Date, yield_rate: f64) -> AnalyticsResult<f64> {
    risk::dv01(bond, yield_rate, settlement, street_compounding(bond))
}

/// DV01 of a `face` notional position.
pub fn dv01_notional<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
    face: f64,
) -> AnalyticsResult<f64> {
    Ok(risk::dv01_notional(dv01(bond, settlement, yield_rate)?, face))
}

/// Estimated dirty price change per 100 for a yield move, with convexity.
pub fn estimate_price_change<B: Bond + ?Sized>(
    bond: &B,
    settlement: Date,
    yield_rate: f64,
    yield_change: f64,
) -> AnalyticsResult<f64> {
    let metrics = RiskMetrics::from_yield(bond, yield_rate, settlement, street_compounding(bond))?;
    Ok(metrics.price_change(yield_change))
}

/// Effective duration off a curve at a constant Z-spread.
pub fn effective_duration<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    settlement: Date,
    z_spread: f64,
    bump_bps: f64,
) -> AnalyticsResult<f64> {
    risk::effective_duration(&SpreadPricer::with_spread(bond, settlement, z_spread), curve, bump_bps)
}

/// Effective convexity off a curve at a constant Z-spread.
pub fn effective_convexity<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    settlement: Date,
    z_spread: f64,
    bump_bps: f64,
) -> AnalyticsResult<f64> {
    risk::effective_convexity(&SpreadPricer::with_spread(bond, settlement, z_spread), curve, bump_bps)
}

// ============================================================================
// SPREADS
// ============================================================================

/// Z-spread from a clean price.
pub fn z_spread<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    settlement: Date,
    clean_price: f64,
) -> AnalyticsResult<f64> {
    spreads::z_spread_from_clean(bond, curve, clean_price, settlement)
}

/// G-spread from a clean price over a government curve.
pub fn g_spread<B: Bond + ?Sized>(
    bond: &B,
    government_curve: &dyn Curve,
    settlement: Date,
    clean_price: f64,
) -> AnalyticsResult<f64> {
    let y = yield_to_maturity(bond, settlement, clean_price)?;
    spreads::g_spread(bond, government_curve, y, settlement)
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// A market quote for a bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quote {
    /// Clean price per 100.
    CleanPrice(f64),
    /// Dirty price per 100.
    DirtyPrice(f64),
    /// Street convention yield (decimal).
    Yield(f64),
}

/// Everything one quote implies about a bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondAnalysis {
    /// Prices and yield.
    pub pricing: PricingResult,
    /// Yield risk.
    pub risk: RiskMetrics,
    /// Z-spread over the curve, if one was given.
    pub z_spread: Option<f64>,
    /// Effective duration at that Z-spread, if a curve was given.
    pub effective_duration: Option<f64>,
}

/// Prices, yield and risk of `bond` at one quote; spreads too when a curve
/// is given.
pub fn analyze<B: Bond + ?Sized>(
    bond: &B,
    curve: Option<&dyn Curve>,
    settlement: Date,
    quote: Quote,
) -> AnalyticsResult<BondAnalysis> {
    let config = PricingConfig::default();
    let pricing = match quote {
        Quote::CleanPrice(clean) => PricingResult::from_clean_price(bond, clean, settlement, &config)?,
        Quote::DirtyPrice(dirty) => {
            let clean = dirty - pricing::accrued_per_100(bond, settlement)?;
            PricingResult::from_clean_price(bond, clean, settlement, &config)?
        }
        Quote::Yield(y) => {
            if !y.is_finite() {
                return Err(AnalyticsError::invalid_input(format!("yield is {y}")));
            }
            PricingResult::from_yield(bond, y, settlement, &config)?
        }
    };
    let risk = RiskMetrics::from_yield(
        bond,
        pricing.yield_to_maturity,
        settlement,
        pricing.compounding,
    )?;

    let (z_spread, effective_duration) = match curve {
        Some(curve) => {
            let z = ZSpreadCalculator::new(curve).calculate(bond, pricing.dirty_price, settlement)?;
            let pricer = SpreadPricer::with_spread(bond, settlement, z);
            let ed = risk::effective_duration(&pricer, curve, 1.0)?;
            (Some(z), Some(ed))
        }
        None => (None, None),
    };

    Ok(BondAnalysis {
        pricing,
        risk,
        z_spread,
        effective_duration,
    })
}
