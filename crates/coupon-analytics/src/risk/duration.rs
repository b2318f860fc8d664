//! Yield-based duration and convexity.
//!
//! ```text
//! D_mac = Σ t·CF·DF(y, t) / P
//! D_mod = −(dP/dy) / P = D_mac / (1 + y/f)      (periodic compounding)
//! C     = (d²P/dy²) / P
//! ```
//!
//! Times are the bond's street yield times, so the measures agree with the
//! price the yield solver reproduces.

use coupon_bonds::Bond;
use coupon_core::{Compounding, Date};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::YieldFlows;

/// Second derivative of the discount factor in the yield.
fn discount_curvature(compounding: Compounding, y: f64, t: f64) -> f64 {
    match compounding {
        Compounding::Continuous => t * t * (-y * t).exp(),
        Compounding::Simple => 2.0 * t * t / (1.0 + y * t).powi(3),
        periodic => {
            let n = f64::from(periodic.periods_per_year_opt().unwrap_or(1));
            let base = 1.0 + y / n;
            t * (t + 1.0 / n) * base.powf(-n * t) / (base * base)
        }
    }
}

fn positive_price(price: f64) -> AnalyticsResult<f64> {
    if price > 0.0 && price.is_finite() {
        Ok(price)
    } else {
        Err(AnalyticsError::invalid_input(format!(
            "price at the given yield is {price}"
        )))
    }
}

/// Macaulay duration in years.
pub fn macaulay_duration<B: Bond + ?Sized>(
    bond: &B,
    yield_rate: f64,
    settlement: Date,
    compounding: Compounding,
) -> AnalyticsResult<f64> {
    let flows = YieldFlows::new(bond, settlement, compounding)?;
    let price = positive_price(flows.price(yield_rate))?;
    let weighted: f64 = flows
        .flows()
        .iter()
        .map(|&(amount, t)| t * amount * compounding.discount_factor(yield_rate, t))
        .sum();
    Ok(weighted / price)
}

/// Modified duration: relative price sensitivity to the yield.
pub fn modified_duration<B: Bond + ?Sized>(
    bond: &B,
    yield_rate: f64,
    settlement: Date,
    compounding: Compounding,
) -> AnalyticsResult<f64> {
    let flows = YieldFlows::new(bond, settlement, compounding)?;
    let (price, slope) = flows.price_and_slope(yield_rate);
    Ok(-slope / positive_price(price)?)
}

/// Converts Macaulay to modified duration.
#[must_use]
pub fn modified_from_macaulay(macaulay: f64, yield_rate: f64, compounding: Compounding) -> f64 {
    match compounding.periods_per_year_opt() {
        Some(n) => macaulay / (1.0 + yield_rate / f64::from(n)),
        None => macaulay,
    }
}

/// Analytic convexity.
pub fn convexity<B: Bond + ?Sized>(
    bond: &B,
    yield_rate: f64,
    settlement: Date,
    compounding: Compounding,
) -> AnalyticsResult<f64> {
    let flows = YieldFlows::new(bond, settlement, compounding)?;
    let price = positive_price(flows.price(yield_rate))?;
    let curvature: f64 = flows
        .flows()
        .iter()
        .map(|&(amount, t)| amount * discount_curvature(compounding, yield_rate, t))
        .sum();
    Ok(curvature / price)
}

/// First-order price change for a yield move.
#[must_use]
pub fn price_change_from_duration(modified: f64, price: f64, yield_change: f64) -> f64 {
    -modified * price * yield_change
}

/// Second-order price change for a yield move.
#[must_use]
pub fn price_change_with_convexity(
    modified: f64,
    convexity: f64,
    price: f64,
    yield_change: f64,
) -> f64 {
    price_change_from_duration(modified, price, yield_change)
        + 0.5 * convexity * price * yield_change * yield_change
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_bonds::{FixedRateBond, ZeroCouponBond};

    use crate::pricing::price_from_yield;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn bond() -> FixedRateBond {
        FixedRateBond::builder()
            .coupon_percent(5.0)
            .issue_date(date(2025, 1, 15))
            .maturity(date(2027, 1, 15))
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_year_par_bond() {
        let settle = date(2025, 1, 15);
        let mac = macaulay_duration(&bond(), 0.05, settle, Compounding::SemiAnnual).unwrap();
        // 2.5/1.025 ×0.5 + ... + 102.5/1.025^4 ×2, all over 100
        let expected: f64 = [0.5, 1.0, 1.5, 2.0]
            .iter()
            .map(|&t| {
                let cf = if t == 2.0 { 102.5 } else { 2.5 };
                t * cf * 1.025_f64.powf(-2.0 * t)
            })
            .sum::<f64>()
            / 100.0;
        assert_relative_eq!(mac, expected, epsilon = 1e-10);

        let md = modified_duration(&bond(), 0.05, settle, Compounding::SemiAnnual).unwrap();
        assert_relative_eq!(md, mac / 1.025, epsilon = 1e-12);
        assert_relative_eq!(
            modified_from_macaulay(mac, 0.05, Compounding::SemiAnnual),
            md,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_coupon_duration_is_life() {
        let zero = ZeroCouponBond::new("Z30", date(2025, 1, 2), date(2030, 1, 2)).unwrap();
        let settle = date(2025, 1, 2);
        let mac = macaulay_duration(&zero, 0.04, settle, Compounding::Continuous).unwrap();
        let life = zero.yield_times(settle).unwrap()[0];
        assert_relative_eq!(mac, life, epsilon = 1e-12);
        let conv = convexity(&zero, 0.04, settle, Compounding::Continuous).unwrap();
        assert_relative_eq!(conv, life * life, epsilon = 1e-10);
    }

    #[test]
    fn test_convexity_matches_numeric() {
        let settle = date(2025, 6, 3);
        let c = Compounding::SemiAnnual;
        let y = 0.043;
        let h = 1e-4;
        let p = |y| price_from_yield(&bond(), y, settle, c).unwrap();
        let numeric = (p(y + h) + p(y - h) - 2.0 * p(y)) / (p(y) * h * h);
        assert_relative_eq!(convexity(&bond(), y, settle, c).unwrap(), numeric, max_relative = 1e-5);

        // second order estimate beats first order
        let dy = 0.01;
        let md = modified_duration(&bond(), y, settle, c).unwrap();
        let cv = convexity(&bond(), y, settle, c).unwrap();
        let actual = p(y + dy) - p(y);
        let first = price_change_from_duration(md, p(y), dy);
        let second = price_change_with_convexity(md, cv, p(y), dy);
        assert!((second - actual).abs() < (first - actual).abs());
    }

    #[test]
    fn test_rejects_settlement_at_maturity() {
        assert!(matches!(
            modified_duration(&bond(), 0.05, date(2027, 1, 15), Compounding::SemiAnnual),
            Err(AnalyticsError::InvalidSettlement { .. })
        ));
    }
}
