//! Discounting bond flows off a curve.
//!
//! Flows are valued as of settlement: each is discounted with the forward
//! discount factor `DF(t)/DF(t_s)` and, for spread measures, a continuously
//! compounded spread over `t − t_s`. Curve times are ACT/365F from the
//! curve's reference date.

use coupon_bonds::Bond;
use coupon_core::{CashFlow, Date};
use coupon_curves::Curve;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Flows with their curve discount factors, scaled to 100 face.
#[derive(Debug, Clone)]
pub struct DiscountedFlows {
    /// `(amount per 100, time from settlement, forward discount factor)`.
    flows: Vec<(f64, f64, f64)>,
}

impl DiscountedFlows {
    /// Discounts `flows` of a bond with `face` off `curve`.
    pub fn new<C: Curve + ?Sized>(
        flows: &[CashFlow],
        face: f64,
        curve: &C,
        settlement: Date,
    ) -> AnalyticsResult<Self> {
        if flows.is_empty() {
            return Err(AnalyticsError::invalid_input(format!(
                "no cash flows after {settlement}"
            )));
        }
        let scale = 100.0 / face;
        let t_settle = curve.year_fraction(settlement);
        let df_settle = curve.discount_factor(t_settle)?;

        let flows = flows
            .iter()
            .filter(|cf| cf.date > settlement)
            .map(|cf| {
                let t = curve.year_fraction(cf.date);
                let df = curve.discount_factor(t)? / df_settle;
                Ok((cf.amount * scale, t - t_settle, df))
            })
            .collect::<AnalyticsResult<Vec<_>>>()?;
        Ok(Self { flows })
    }

    /// Discounts the cash flows of `bond` after `settlement`.
    pub fn for_bond<B: Bond + ?Sized, C: Curve + ?Sized>(
        bond: &B,
        curve: &C,
        settlement: Date,
    ) -> AnalyticsResult<Self> {
        Self::new(&bond.cash_flows(settlement)?, bond.face_value(), curve, settlement)
    }

    /// `(amount, time, discount factor)` triples.
    #[must_use]
    pub fn flows(&self) -> &[(f64, f64, f64)] {
        &self.flows
    }

    /// Dirty price per 100 under a continuous spread.
    #[must_use]
    pub fn price(&self, spread: f64) -> f64 {
        self.flows
            .iter()
            .map(|&(amount, t, df)| amount * df * (-spread * t).exp())
            .sum()
    }

    /// `dP/ds` under a continuous spread.
    #[must_use]
    pub fn spread_slope(&self, spread: f64) -> f64 {
        self.flows
            .iter()
            .map(|&(amount, t, df)| -t * amount * df * (-spread * t).exp())
            .sum()
    }
}

/// Dirty price per 100 of `bond` off `curve`.
pub fn price_from_curve<B: Bond + ?Sized, C: Curve + ?Sized>(
    bond: &B,
    curve: &C,
    settlement: Date,
) -> AnalyticsResult<f64> {
    Ok(DiscountedFlows::for_bond(bond, curve, settlement)?.price(0.0))
}

/// Dirty price per 100 of `bond` off `curve` plus a continuous spread.
pub fn price_with_spread<B: Bond + ?Sized, C: Curve + ?Sized>(
    bond: &B,
    curve: &C,
    settlement: Date,
    spread: f64,
) -> AnalyticsResult<f64> {
    Ok(DiscountedFlows::for_bond(bond, curve, settlement)?.price(spread))
}
