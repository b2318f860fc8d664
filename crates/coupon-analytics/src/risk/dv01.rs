//! DV01: price change for a one basis point move.
//!
//! ```text
//! DV01 = D_mod × Dirty × 0.0001          (per 100 face)
//! ```
//!
//! A position's DV01 scales the per-100 figure by `face / 100`.

use coupon_bonds::Bond;
use coupon_core::{Compounding, Date};
use coupon_curves::Curve;

use super::duration::modified_duration;
use super::effective::{CurvePricer, EffectiveRisk};
use crate::error::AnalyticsResult;
use crate::pricing::price_from_yield;

/// One basis point as a decimal rate.
pub const ONE_BP: f64 = 1e-4;

/// DV01 per 100 face from modified duration and dirty price.
#[must_use]
pub fn dv01_from_duration(modified: f64, dirty_price: f64) -> f64 {
    modified * dirty_price * ONE_BP
}

/// DV01 of `face` notional.
#[must_use]
pub fn dv01_notional(dv01_per_100: f64, face: f64) -> f64 {
    dv01_per_100 * face / 100.0
}

/// DV01 as half the price spread of a symmetric 1bp move.
#[must_use]
pub fn dv01_from_prices(price_up: f64, price_down: f64) -> f64 {
    (price_down - price_up) / 2.0
}

/// Face value needed for a target DV01.
#[must_use]
pub fn notional_from_dv01(target: f64, modified: f64, dirty_price: f64) -> f64 {
    let per_100 = dv01_from_duration(modified, dirty_price);
    if per_100.abs() < 1e-12 {
        return 0.0;
    }
    target / per_100 * 100.0
}

/// Yield DV01 per 100 face.
pub fn dv01<B: Bond + ?Sized>(
    bond: &B,
    yield_rate: f64,
    settlement: Date,
    compounding: Compounding,
) -> AnalyticsResult<f64> {
    let dirty = price_from_yield(bond, yield_rate, settlement, compounding)?;
    let modified = modified_duration(bond, yield_rate, settlement, compounding)?;
    Ok(dv01_from_duration(modified, dirty))
}

/// Curve DV01 per 100 face: reprices under a ±1bp parallel bump.
pub fn curve_dv01<P: CurvePricer + ?Sized>(pricer: &P, curve: &dyn Curve) -> AnalyticsResult<f64> {
    let risk = EffectiveRisk::calculate(pricer, curve, 1.0)?;
    Ok(dv01_from_prices(risk.price_up, risk.price_down))
}
