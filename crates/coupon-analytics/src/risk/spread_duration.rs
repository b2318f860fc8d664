//! Spread duration: sensitivity to the Z-spread with the curve fixed.

use coupon_bonds::Bond;
use coupon_core::Date;
use coupon_curves::Curve;

use super::dv01::ONE_BP;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::DiscountedFlows;

/// `(P(z − 1bp) − P(z + 1bp)) / (2·P(z)·1bp)`.
pub fn spread_duration<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    z_spread: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    let flows = DiscountedFlows::for_bond(bond, curve, settlement)?;
    let base = flows.price(z_spread);
    if base <= 0.0 {
        return Err(AnalyticsError::invalid_input(format!(
            "price at spread {z_spread} is {base}"
        )));
    }
    let down = flows.price(z_spread - ONE_BP);
    let up = flows.price(z_spread + ONE_BP);
    Ok((down - up) / (2.0 * base * ONE_BP))
}

/// Price change per 100 for a 1bp widening of the Z-spread.
pub fn spread_dv01<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    z_spread: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    let flows = DiscountedFlows::for_bond(bond, curve, settlement)?;
    Ok((flows.price(z_spread - ONE_BP) - flows.price(z_spread + ONE_BP)) / 2.0)
}
