//! Curve-bumped risk.
//!
//! A [`CurvePricer`] reprices an instrument on any curve with its spread
//! held fixed. Effective measures come from symmetric parallel bumps `±h`:
//!
//! ```text
//! D_eff = (P₋ − P₊) / (2·P₀·h)
//! C_eff = (P₋ + P₊ − 2·P₀) / (P₀·h²)
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use coupon_bonds::{Bond, CallableBond, FloatingRateNote};
use coupon_core::Date;
use coupon_curves::bumping::ParallelBump;
use coupon_curves::Curve;

use crate::config::RiskConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::DiscountedFlows;
use crate::spreads::{DiscountMarginCalculator, OasCalculator};

/// Reprices an instrument on a given curve.
pub trait CurvePricer {
    /// Dirty price per 100 on `curve`.
    fn price_on(&self, curve: &dyn Curve) -> AnalyticsResult<f64>;
}

impl<F> CurvePricer for F
where
    F: Fn(&dyn Curve) -> AnalyticsResult<f64>,
{
    fn price_on(&self, curve: &dyn Curve) -> AnalyticsResult<f64> {
        self(curve)
    }
}

/// Fixed cash flows at a constant Z-spread.
#[derive(Debug, Clone, Copy)]
pub struct SpreadPricer<'a, B: ?Sized> {
    bond: &'a B,
    settlement: Date,
    spread: f64,
}

impl<'a, B: Bond + ?Sized> SpreadPricer<'a, B> {
    /// Prices off the curve with no spread.
    #[must_use]
    pub fn new(bond: &'a B, settlement: Date) -> Self {
        Self::with_spread(bond, settlement, 0.0)
    }

    /// Prices at Z-spread `spread`.
    #[must_use]
    pub fn with_spread(bond: &'a B, settlement: Date, spread: f64) -> Self {
        Self {
            bond,
            settlement,
            spread,
        }
    }
}

impl<B: Bond + ?Sized> CurvePricer for SpreadPricer<'_, B> {
    fn price_on(&self, curve: &dyn Curve) -> AnalyticsResult<f64> {
        Ok(DiscountedFlows::for_bond(self.bond, curve, self.settlement)?.price(self.spread))
    }
}

/// A callable bond at a constant OAS.
#[derive(Debug)]
pub struct OasPricer<'a> {
    bond: &'a CallableBond,
    calculator: &'a OasCalculator,
    settlement: Date,
    oas: f64,
}

impl<'a> OasPricer<'a> {
    /// Reprices `bond` on the lattice of `calculator` at `oas`.
    #[must_use]
    pub fn new(
        bond: &'a CallableBond,
        calculator: &'a OasCalculator,
        settlement: Date,
        oas: f64,
    ) -> Self {
        Self {
            bond,
            calculator,
            settlement,
            oas,
        }
    }
}

impl CurvePricer for OasPricer<'_> {
    fn price_on(&self, curve: &dyn Curve) -> AnalyticsResult<f64> {
        self.calculator
            .price(self.bond, curve, self.oas, self.settlement)
    }
}

/// A floating rate note at a constant discount margin.
///
/// Coupons are projected from the same curve that discounts them, so a
/// bump moves both.
#[derive(Debug, Clone, Copy)]
pub struct FrnPricer<'a> {
    frn: &'a FloatingRateNote,
    settlement: Date,
    margin: f64,
}

impl<'a> FrnPricer<'a> {
    /// Reprices `frn` at discount margin `margin`.
    #[must_use]
    pub fn new(frn: &'a FloatingRateNote, settlement: Date, margin: f64) -> Self {
        Self {
            frn,
            settlement,
            margin,
        }
    }
}

impl CurvePricer for FrnPricer<'_> {
    fn price_on(&self, curve: &dyn Curve) -> AnalyticsResult<f64> {
        DiscountMarginCalculator::new(curve).price_with_dm(self.frn, self.margin, self.settlement)
    }
}

/// Prices under a symmetric parallel bump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRisk {
    /// Unbumped price.
    pub base_price: f64,
    /// Price with rates up by the bump.
    pub price_up: f64,
    /// Price with rates down by the bump.
    pub price_down: f64,
    /// Bump size (decimal).
    pub bump: f64,
}

impl EffectiveRisk {
    /// Reprices under `±bump_bps`.
    pub fn calculate<P: CurvePricer + ?Sized>(
        pricer: &P,
        curve: &dyn Curve,
        bump_bps: f64,
    ) -> AnalyticsResult<Self> {
        if !(bump_bps.is_finite() && bump_bps > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "bump must be positive, got {bump_bps}bp"
            )));
        }
        let base_price = pricer.price_on(curve)?;
        if base_price.abs() < 1e-12 {
            return Err(AnalyticsError::invalid_input("base price is zero"));
        }
        let up = ParallelBump::new(bump_bps).apply(curve);
        let down = ParallelBump::new(-bump_bps).apply(curve);
        let risk = Self {
            base_price,
            price_up: pricer.price_on(&up)?,
            price_down: pricer.price_on(&down)?,
            bump: bump_bps / 1e4,
        };
        debug!(
            "effective risk at ±{bump_bps}bp: {:.6} / {:.6} / {:.6}",
            risk.price_down, risk.base_price, risk.price_up
        );
        Ok(risk)
    }

    /// Uses the parallel bump of `config`.
    pub fn with_config<P: CurvePricer + ?Sized>(
        pricer: &P,
        curve: &dyn Curve,
        config: &RiskConfig,
    ) -> AnalyticsResult<Self> {
        Self::calculate(pricer, curve, config.bump_bps)
    }

    /// Effective duration.
    #[must_use]
    pub fn duration(&self) -> f64 {
        (self.price_down - self.price_up) / (2.0 * self.base_price * self.bump)
    }

    /// Effective convexity.
    #[must_use]
    pub fn convexity(&self) -> f64 {
        (self.price_down + self.price_up - 2.0 * self.base_price)
            / (self.base_price * self.bump * self.bump)
    }

    /// Price change per 100 for a 1bp parallel move, from the bumps.
    #[must_use]
    pub fn dv01(&self) -> f64 {
        (self.price_down - self.price_up) / (2.0 * self.bump * 1e4)
    }
}

/// Effective duration under `±bump_bps`.
pub fn effective_duration<P: CurvePricer + ?Sized>(
    pricer: &P,
    curve: &dyn Curve,
    bump_bps: f64,
) -> AnalyticsResult<f64> {
    Ok(EffectiveRisk::calculate(pricer, curve, bump_bps)?.duration())
}

/// Effective convexity under `±bump_bps`.
pub fn effective_convexity<P: CurvePricer + ?Sized>(
    pricer: &P,
    curve: &dyn Curve,
    bump_bps: f64,
) -> AnalyticsResult<f64> {
    Ok(EffectiveRisk::calculate(pricer, curve, bump_bps)?.convexity())
}
