//! Discount margin for floating rate notes.
//!
//! Coupons are projected from the forward curve at the quoted margin; the
//! discount margin is the continuous spread over the discount curve that
//! reprices the note:
//!
//! ```text
//! Dirty = Σ CF_i(fwd) × P_disc(t_s, t_i) × exp(−dm × (t_i − t_s))
//! ```

use log::debug;

use coupon_bonds::{Bond, FloatingRateNote};
use coupon_core::Date;
use coupon_curves::Curve;
use coupon_math::solvers::SolverConfig;

use super::solve_spread;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::DiscountedFlows;

/// Discount margin calculator.
///
/// Forward and discount curves may be the same curve.
pub struct DiscountMarginCalculator<'a> {
    forward_curve: &'a dyn Curve,
    discount_curve: &'a dyn Curve,
    config: SolverConfig,
}

impl std::fmt::Debug for DiscountMarginCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscountMarginCalculator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> DiscountMarginCalculator<'a> {
    /// Single curve for projection and discounting.
    #[must_use]
    pub fn new(curve: &'a dyn Curve) -> Self {
        Self::with_curves(curve, curve)
    }

    /// Separate projection and discount curves.
    #[must_use]
    pub fn with_curves(forward_curve: &'a dyn Curve, discount_curve: &'a dyn Curve) -> Self {
        Self {
            forward_curve,
            discount_curve,
            config: SolverConfig::default(),
        }
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    fn flows(&self, frn: &FloatingRateNote, settlement: Date) -> AnalyticsResult<DiscountedFlows> {
        let projected = frn.projected_cash_flows(self.forward_curve, settlement)?;
        DiscountedFlows::new(&projected, frn.face_value(), self.discount_curve, settlement)
    }

    /// Dirty price per 100 at discount margin `dm`.
    pub fn price_with_dm(
        &self,
        frn: &FloatingRateNote,
        dm: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        Ok(self.flows(frn, settlement)?.price(dm))
    }

    /// Discount margin (decimal) that reprices `dirty_price` per 100.
    pub fn calculate(
        &self,
        frn: &FloatingRateNote,
        dirty_price: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        if !(dirty_price.is_finite() && dirty_price > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "dirty price must be positive, got {dirty_price}"
            )));
        }
        let flows = self.flows(frn, settlement)?;
        let dm = solve_spread(|dm| flows.price(dm) - dirty_price, &self.config)?;
        debug!("{}: discount margin {:.4}bp", frn.identifier(), dm * 1e4);
        Ok(dm)
    }

    /// Spread duration: `(P(dm−h) − P(dm+h)) / (2 P h)` with a 1bp `h`.
    pub fn spread_duration(
        &self,
        frn: &FloatingRateNote,
        dm: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        let flows = self.flows(frn, settlement)?;
        let h = 1e-4;
        let base = flows.price(dm);
        Ok((flows.price(dm - h) - flows.price(dm + h)) / (2.0 * base * h))
    }
}

/// Discount margin (decimal) over a single curve.
pub fn discount_margin(
    frn: &FloatingRateNote,
    curve: &dyn Curve,
    dirty_price: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    DiscountMarginCalculator::new(curve).calculate(frn, dirty_price, settlement)
}

/// Simple margin: a flat-index approximation of the discount margin.
///
/// ```text
/// SM = (index + margin) × 100 / P + (100 − P) / (P × years) − index
/// ```
pub fn simple_margin(
    frn: &FloatingRateNote,
    dirty_price: f64,
    index_rate: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    frn.check_settlement(settlement)?;
    if !(dirty_price.is_finite() && dirty_price > 0.0) {
        return Err(AnalyticsError::invalid_input(format!(
            "dirty price must be positive, got {dirty_price}"
        )));
    }
    let years = settlement.days_between(&frn.maturity()) as f64 / 365.0;
    let current_yield = (index_rate + frn.margin()) * 100.0 / dirty_price;
    let redemption = (100.0 - dirty_price) / (dirty_price * years);
    Ok(current_yield + redemption - index_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_core::Frequency;
    use coupon_curves::{DiscountCurve, DiscountCurveBuilder};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn curve() -> DiscountCurve {
        DiscountCurveBuilder::new(date(2025, 1, 2))
            .add_zero_rate(0.25, 0.043)
            .add_zero_rate(2.0, 0.040)
            .add_zero_rate(6.0, 0.041)
            .build()
            .unwrap()
    }

    fn frn() -> FloatingRateNote {
        FloatingRateNote::builder()
            .issue_date(date(2025, 1, 2))
            .maturity(date(2030, 1, 2))
            .frequency(Frequency::Quarterly)
            .margin_bps(80.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_dm_round_trip() {
        let curve = curve();
        let calc = DiscountMarginCalculator::new(&curve);
        let settle = date(2025, 1, 2);
        for dm in [0.0, 0.008, 0.025] {
            let price = calc.price_with_dm(&frn(), dm, settle).unwrap();
            assert_relative_eq!(calc.calculate(&frn(), price, settle).unwrap(), dm, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_dm_at_margin_prices_near_par() {
        // discounting at the quoted margin over the projection curve gives
        // par up to the ACT/360 vs ACT/365 basis
        let curve = curve();
        let price = DiscountMarginCalculator::new(&curve)
            .price_with_dm(&frn(), 0.008, date(2025, 1, 2))
            .unwrap();
        assert!((price - 100.0).abs() < 0.5, "{price}");
    }

    #[test]
    fn test_spread_duration_near_life() {
        let curve = curve();
        let calc = DiscountMarginCalculator::new(&curve);
        let d = calc.spread_duration(&frn(), 0.008, date(2025, 1, 2)).unwrap();
        assert!(d > 4.0 && d < 5.0, "{d}");
    }

    #[test]
    fn test_simple_margin() {
        let settle = date(2025, 1, 2);
        let sm = simple_margin(&frn(), 100.0, 0.043, settle).unwrap();
        assert_relative_eq!(sm, 0.008, epsilon = 1e-12);
        // below par adds pull to par
        assert!(simple_margin(&frn(), 98.0, 0.043, settle).unwrap() > 0.008);
        assert!(simple_margin(&frn(), 100.0, 0.043, date(2030, 1, 2)).is_err());
    }
}
