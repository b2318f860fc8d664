//! Price and yield conversion.
//!
//! Street convention discounts each flow at `(1 + y/f)^(−t·f)`, where `t` is
//! the bond's yield time: coupon periods under the bond's day count
//! (fractional for the current period) divided by the frequency. Simple and
//! continuous yields use the same times.
//!
//! All prices are per 100 face.

use log::{debug, trace};

use coupon_bonds::Bond;
use coupon_core::{Compounding, Date, Frequency};
use coupon_math::solvers::{hybrid, SolverConfig, YIELD_BRACKET};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Compounding that matches a coupon frequency.
///
/// Zero frequency falls back to annual.
#[must_use]
pub fn compounding_for(frequency: Frequency) -> Compounding {
    match frequency {
        Frequency::SemiAnnual => Compounding::SemiAnnual,
        Frequency::Quarterly => Compounding::Quarterly,
        Frequency::Monthly => Compounding::Monthly,
        Frequency::Annual | Frequency::Zero => Compounding::Annual,
    }
}

/// Street convention compounding of a bond.
#[must_use]
pub fn street_compounding<B: Bond + ?Sized>(bond: &B) -> Compounding {
    compounding_for(bond.yield_frequency())
}

/// Discount factor and its derivative in the yield.
fn discount(compounding: Compounding, y: f64, t: f64) -> (f64, f64) {
    match compounding {
        Compounding::Continuous => {
            let df = (-y * t).exp();
            (df, -t * df)
        }
        Compounding::Simple => {
            let base = 1.0 + y * t;
            (1.0 / base, -t / (base * base))
        }
        periodic => {
            let n = f64::from(periodic.periods_per_year_opt().unwrap_or(1));
            let base = 1.0 + y / n;
            let df = base.powf(-n * t);
            (df, -t * df / base)
        }
    }
}

/// Yield-discounted flows of a bond at one settlement date.
///
/// Amounts are scaled to 100 face so that every price is quoted per 100.
#[derive(Debug, Clone)]
pub struct YieldFlows {
    flows: Vec<(f64, f64)>,
    compounding: Compounding,
}

impl YieldFlows {
    /// Collects the flows of `bond` after `settlement`.
    pub fn new<B: Bond + ?Sized>(
        bond: &B,
        settlement: Date,
        compounding: Compounding,
    ) -> AnalyticsResult<Self> {
        let scale = 100.0 / bond.face_value();
        let flows: Vec<(f64, f64)> = bond
            .timed_cash_flows(settlement)?
            .into_iter()
            .map(|(cf, t)| (cf.amount * scale, t))
            .collect();
        if flows.is_empty() {
            return Err(AnalyticsError::invalid_input(format!(
                "{} has no cash flows after {settlement}",
                bond.identifier()
            )));
        }
        Ok(Self { flows, compounding })
    }

    /// `(amount per 100, yield time)` pairs.
    #[must_use]
    pub fn flows(&self) -> &[(f64, f64)] {
        &self.flows
    }

    /// Compounding used to discount.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Dirty price at yield `y`.
    #[must_use]
    pub fn price(&self, y: f64) -> f64 {
        self.flows
            .iter()
            .map(|&(amount, t)| amount * discount(self.compounding, y, t).0)
            .sum()
    }

    /// Dirty price and `dP/dy` at yield `y`.
    #[must_use]
    pub fn price_and_slope(&self, y: f64) -> (f64, f64) {
        self.flows.iter().fold((0.0, 0.0), |(p, dp), &(amount, t)| {
            let (df, ddf) = discount(self.compounding, y, t);
            (p + amount * df, dp + amount * ddf)
        })
    }

    /// Yield that reprices `dirty`.
    ///
    /// Newton from `guess` with the analytic slope, Brent on the yield
    /// bracket if Newton diverges.
    pub fn solve(&self, dirty: f64, guess: f64, config: &SolverConfig) -> AnalyticsResult<f64> {
        if !(dirty.is_finite() && dirty > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "price must be positive, got {dirty}"
            )));
        }
        let bounds = self.bracket();
        let result = hybrid(
            |y| self.price(y) - dirty,
            |y| self.price_and_slope(y).1,
            guess,
            Some(bounds),
            config,
        )?;
        trace!(
            "yield {:.10} after {} iterations (residual {:.3e})",
            result.root,
            result.iterations,
            result.residual
        );
        Ok(result.root)
    }

    fn bracket(&self) -> (f64, f64) {
        let (lo, hi) = YIELD_BRACKET;
        match self.compounding.periods_per_year_opt() {
            // keep 1 + y/n positive
            Some(n) => (lo.max(-0.99 * f64::from(n)), hi),
            None if self.compounding == Compounding::Simple => {
                let longest = self.flows.iter().map(|&(_, t)| t).fold(0.0, f64::max);
                (lo.max(-0.99 / longest.max(1e-9)), hi)
            }
            None => (lo, hi),
        }
    }
}

/// Dirty price per 100 at yield `yield_rate`.
pub fn price_from_yield<B: Bond + ?Sized>(
    bond: &B,
    yield_rate: f64,
    settlement: Date,
    compounding: Compounding,
) -> AnalyticsResult<f64> {
    Ok(YieldFlows::new(bond, settlement, compounding)?.price(yield_rate))
}

/// Clean price per 100 at yield `yield_rate`.
pub fn clean_price_from_yield<B: Bond + ?Sized>(
    bond: &B,
    yield_rate: f64,
    settlement: Date,
    compounding: Compounding,
) -> AnalyticsResult<f64> {
    let dirty = price_from_yield(bond, yield_rate, settlement, compounding)?;
    Ok(dirty - accrued_per_100(bond, settlement)?)
}

/// Yield from a clean price per 100.
pub fn yield_from_price<B: Bond + ?Sized>(
    bond: &B,
    clean_price: f64,
    settlement: Date,
    compounding: Compounding,
    config: &SolverConfig,
) -> AnalyticsResult<f64> {
    let dirty = clean_price + accrued_per_100(bond, settlement)?;
    yield_from_dirty_price(bond, dirty, settlement, compounding, config)
}

/// Yield from a dirty price per 100.
pub fn yield_from_dirty_price<B: Bond + ?Sized>(
    bond: &B,
    dirty_price: f64,
    settlement: Date,
    compounding: Compounding,
    config: &SolverConfig,
) -> AnalyticsResult<f64> {
    let flows = YieldFlows::new(bond, settlement, compounding)?;
    let guess = if bond.coupon_rate() > 0.0 {
        bond.coupon_rate()
    } else {
        0.05
    };
    let y = flows.solve(dirty_price, guess, config)?;
    debug!("{}: yield {y:.8} at dirty {dirty_price:.6}", bond.identifier());
    Ok(y)
}

/// Accrued interest per 100 face.
pub fn accrued_per_100<B: Bond + ?Sized>(bond: &B, settlement: Date) -> AnalyticsResult<f64> {
    Ok(bond.accrued_interest(settlement)? * 100.0 / bond.face_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_bonds::{FixedRateBond, ZeroCouponBond};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn bond() -> FixedRateBond {
        FixedRateBond::builder()
            .coupon_percent(5.0)
            .issue_date(date(2025, 1, 15))
            .maturity(date(2030, 1, 15))
            .build()
            .unwrap()
    }

    #[test]
    fn test_par_on_coupon_date() {
        let b = bond();
        let settle = date(2025, 1, 15);
        let dirty = price_from_yield(&b, 0.05, settle, Compounding::SemiAnnual).unwrap();
        assert_relative_eq!(dirty, 100.0, epsilon = 1e-10);
        let y = yield_from_price(&b, 100.0, settle, Compounding::SemiAnnual, &SolverConfig::default())
            .unwrap();
        assert_relative_eq!(y, 0.05, epsilon = 1e-10);
    }

    #[test]
    fn test_coupon_paid_before_settlement() {
        use coupon_core::calendars::BusinessDayConvention;
        use coupon_curves::DiscountCurveBuilder;

        use crate::pricing::price_from_curve;

        // the 2025-11-30 coupon rolls back to Friday 2025-11-28
        let b = FixedRateBond::builder()
            .coupon_percent(5.0)
            .issue_date(date(2025, 5, 31))
            .maturity(date(2030, 5, 31))
            .business_day_convention(BusinessDayConvention::Preceding)
            .build()
            .unwrap();
        let settle = date(2025, 11, 29);

        let dirty = price_from_yield(&b, 0.05, settle, Compounding::SemiAnnual).unwrap();
        assert!(dirty < 100.0, "dirty {dirty}");
        let clean = clean_price_from_yield(&b, 0.05, settle, Compounding::SemiAnnual).unwrap();
        assert_relative_eq!(clean, 100.0, epsilon = 1e-3);

        // curve pricing sees the same flows: nine coupons and the redemption
        let undiscounted = DiscountCurveBuilder::new(settle)
            .add_zero_rate(1.0, 0.0)
            .add_zero_rate(10.0, 0.0)
            .build()
            .unwrap();
        assert_relative_eq!(
            price_from_curve(&b, &undiscounted, settle).unwrap(),
            122.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_slope_matches_finite_difference() {
        let flows = YieldFlows::new(&bond(), date(2026, 4, 2), Compounding::SemiAnnual).unwrap();
        let h = 1e-6;
        let numeric = (flows.price(0.04 + h) - flows.price(0.04 - h)) / (2.0 * h);
        assert_relative_eq!(flows.price_and_slope(0.04).1, numeric, max_relative = 1e-6);

        for compounding in [Compounding::Continuous, Compounding::Simple, Compounding::Annual] {
            let flows = YieldFlows::new(&bond(), date(2026, 4, 2), compounding).unwrap();
            let numeric = (flows.price(0.04 + h) - flows.price(0.04 - h)) / (2.0 * h);
            assert_relative_eq!(flows.price_and_slope(0.04).1, numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_zero_coupon_price() {
        let zero = ZeroCouponBond::new("Z", date(2024, 1, 2), date(2029, 1, 2)).unwrap();
        let settle = date(2025, 1, 2);
        let t = 1461.0 / 365.0;
        let dirty = price_from_yield(&zero, 0.04, settle, Compounding::SemiAnnual).unwrap();
        assert_relative_eq!(dirty, 100.0 * 1.02_f64.powf(-2.0 * t), epsilon = 1e-10);
        let y = yield_from_price(&zero, dirty, settle, Compounding::SemiAnnual, &SolverConfig::default())
            .unwrap();
        assert_relative_eq!(y, 0.04, epsilon = 1e-10);
    }

    #[test]
    fn test_negative_yield_solves() {
        let b = bond();
        let settle = date(2025, 1, 15);
        let dirty = price_from_yield(&b, -0.005, settle, Compounding::SemiAnnual).unwrap();
        let y = yield_from_dirty_price(&b, dirty, settle, Compounding::SemiAnnual, &SolverConfig::default())
            .unwrap();
        assert_relative_eq!(y, -0.005, epsilon = 1e-9);
    }

    #[test]
    fn test_bad_inputs() {
        let b = bond();
        let config = SolverConfig::default();
        assert!(matches!(
            yield_from_dirty_price(&b, -1.0, date(2025, 6, 2), Compounding::SemiAnnual, &config),
            Err(AnalyticsError::InvalidInput { .. })
        ));
        assert!(matches!(
            price_from_yield(&b, 0.05, date(2030, 1, 15), Compounding::SemiAnnual),
            Err(AnalyticsError::InvalidSettlement { .. })
        ));
    }
}
