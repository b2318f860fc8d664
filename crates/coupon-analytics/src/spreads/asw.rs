//! Asset swap spreads.
//!
//! The buyer pays par (par-par) or the dirty price (proceeds) for the bond
//! plus a swap that exchanges the bond's coupons for floating plus a spread
//! over the bond's schedule.
//!
//! ```text
//! par-par  = (PV_curve − Dirty) / (100 × A)
//! proceeds = par-par × 100 / Dirty
//! ```
//!
//! `A` is the floating leg annuity: Σ τ_i × P(t_s, t_i) over the remaining
//! periods, with accrual cut at settlement.

use serde::{Deserialize, Serialize};

use coupon_bonds::Bond;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::Date;
use coupon_curves::Curve;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::{accrued_per_100, DiscountedFlows};

/// Asset swap package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AswType {
    /// Buyer pays par; the upfront difference goes into the spread.
    #[default]
    ParPar,
    /// Buyer pays the dirty price; swap notional is the proceeds.
    Proceeds,
}

/// Asset swap calculator over a swap curve.
pub struct AssetSwap<'a> {
    curve: &'a dyn Curve,
    floating_day_count: DayCountConvention,
}

impl std::fmt::Debug for AssetSwap<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetSwap")
            .field("reference_date", &self.curve.reference_date())
            .field("floating_day_count", &self.floating_day_count)
            .finish_non_exhaustive()
    }
}

impl<'a> AssetSwap<'a> {
    /// Creates a calculator with an ACT/360 floating leg.
    #[must_use]
    pub fn new(curve: &'a dyn Curve) -> Self {
        Self {
            curve,
            floating_day_count: DayCountConvention::Act360,
        }
    }

    /// Sets the floating leg day count.
    #[must_use]
    pub fn with_floating_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.floating_day_count = day_count;
        self
    }

    /// Floating leg annuity per unit notional, as of settlement.
    pub fn annuity<B: Bond + ?Sized>(&self, bond: &B, settlement: Date) -> AnalyticsResult<f64> {
        bond.check_settlement(settlement)?;
        let df_settle = self.curve.discount_factor_at(settlement)?;
        let mut annuity = 0.0;
        for period in bond.schedule().periods() {
            if period.payment_date <= settlement || period.accrual_end <= settlement {
                continue;
            }
            let start = period.accrual_start.max(settlement);
            let tau = self.floating_day_count.year_fraction_f64(start, period.accrual_end);
            annuity += tau * self.curve.discount_factor_at(period.payment_date)? / df_settle;
        }
        if annuity <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "{} has no floating periods after {settlement}",
                bond.identifier()
            )));
        }
        Ok(annuity)
    }

    /// Par-par asset swap spread (decimal) from a clean price per 100.
    pub fn par_par<B: Bond + ?Sized>(
        &self,
        bond: &B,
        clean_price: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        let dirty = clean_price + accrued_per_100(bond, settlement)?;
        let pv = DiscountedFlows::for_bond(bond, self.curve, settlement)?.price(0.0);
        let annuity = self.annuity(bond, settlement)?;
        Ok((pv - dirty) / (100.0 * annuity))
    }

    /// Proceeds asset swap spread (decimal) from a clean price per 100.
    pub fn proceeds<B: Bond + ?Sized>(
        &self,
        bond: &B,
        clean_price: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        let dirty = clean_price + accrued_per_100(bond, settlement)?;
        if dirty <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "dirty price must be positive, got {dirty}"
            )));
        }
        Ok(self.par_par(bond, clean_price, settlement)? * 100.0 / dirty)
    }

    /// Spread of the given package.
    pub fn calculate<B: Bond + ?Sized>(
        &self,
        bond: &B,
        clean_price: f64,
        settlement: Date,
        asw_type: AswType,
    ) -> AnalyticsResult<f64> {
        match asw_type {
            AswType::ParPar => self.par_par(bond, clean_price, settlement),
            AswType::Proceeds => self.proceeds(bond, clean_price, settlement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_bonds::FixedRateBond;
    use coupon_curves::{DiscountCurve, DiscountCurveBuilder};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn curve() -> DiscountCurve {
        DiscountCurveBuilder::new(date(2025, 1, 2))
            .add_zero_rate(0.5, 0.038)
            .add_zero_rate(3.0, 0.036)
            .add_zero_rate(10.0, 0.039)
            .build()
            .unwrap()
    }

    fn bond() -> FixedRateBond {
        FixedRateBond::builder()
            .coupon_percent(4.5)
            .issue_date(date(2024, 4, 15))
            .maturity(date(2031, 4, 15))
            .build()
            .unwrap()
    }

    #[test]
    fn test_zero_at_curve_price() {
        let curve = curve();
        let settle = date(2025, 2, 3);
        let pv = DiscountedFlows::for_bond(&bond(), &curve, settle).unwrap().price(0.0);
        let clean = pv - accrued_per_100(&bond(), settle).unwrap();
        let asw = AssetSwap::new(&curve);
        assert_relative_eq!(asw.par_par(&bond(), clean, settle).unwrap(), 0.0, epsilon = 1e-14);
        assert_relative_eq!(asw.proceeds(&bond(), clean, settle).unwrap(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_cheap_bond_positive_spread() {
        let curve = curve();
        let settle = date(2025, 2, 3);
        let asw = AssetSwap::new(&curve);
        let annuity = asw.annuity(&bond(), settle).unwrap();
        // roughly 6.2 years of ACT/360 accrual, discounted
        assert!(annuity > 5.0 && annuity < 6.3, "{annuity}");

        let pv = DiscountedFlows::for_bond(&bond(), &curve, settle).unwrap().price(0.0);
        let clean = pv - accrued_per_100(&bond(), settle).unwrap() - 2.0;
        let par_par = asw.calculate(&bond(), clean, settle, AswType::ParPar).unwrap();
        assert_relative_eq!(par_par, 2.0 / (100.0 * annuity), epsilon = 1e-12);

        let dirty = clean + accrued_per_100(&bond(), settle).unwrap();
        let proceeds = asw.calculate(&bond(), clean, settle, AswType::Proceeds).unwrap();
        assert_relative_eq!(proceeds, par_par * 100.0 / dirty, epsilon = 1e-14);
        assert!(par_par > 0.0 && proceeds > 0.0);
    }

    #[test]
    fn test_invalid_settlement() {
        let curve = curve();
        assert!(matches!(
            AssetSwap::new(&curve).par_par(&bond(), 100.0, date(2031, 4, 15)),
            Err(AnalyticsError::InvalidSettlement { .. })
        ));
    }
}
