//! Money market yields for discount instruments.
//!
//! Closed forms on exact decimal arithmetic. Yields are decimals
//! (`0.06` for 6%); prices and face values share the same unit.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{AnalyticsError, AnalyticsResult};

/// Days in a bond-equivalent year.
pub const BEY_DAYS: u32 = 365;

/// Days in a money market year.
pub const MONEY_MARKET_DAYS: u32 = 360;

/// Longest maturity priced with the simple bond-equivalent formula.
pub const BEY_SIMPLE_LIMIT_DAYS: u32 = 182;

fn check(price: Decimal, face_value: Decimal, days_to_maturity: u32) -> AnalyticsResult<()> {
    if days_to_maturity == 0 {
        return Err(AnalyticsError::invalid_input(
            "days to maturity must be positive",
        ));
    }
    if face_value <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input("face value must be positive"));
    }
    if price <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input("price must be positive"));
    }
    Ok(())
}

/// Bank discount yield.
///
/// ```text
/// DY = (F − P) / F × 360 / d
/// ```
///
/// ```rust
/// use coupon_analytics::pricing::money_market::discount_yield;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(discount_yield(dec!(98.5), dec!(100), 90).unwrap(), dec!(0.06));
/// ```
pub fn discount_yield(
    price: Decimal,
    face_value: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    check(price, face_value, days_to_maturity)?;
    let days = Decimal::from(days_to_maturity);
    Ok((face_value - price) / face_value * Decimal::from(MONEY_MARKET_DAYS) / days)
}

/// Price from a bank discount yield.
///
/// ```text
/// P = F × (1 − DY × d / 360)
/// ```
pub fn price_from_discount_yield(
    discount_yield: Decimal,
    face_value: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    check(face_value, face_value, days_to_maturity)?;
    let days = Decimal::from(days_to_maturity);
    let price = face_value * (Decimal::ONE - discount_yield * days / Decimal::from(MONEY_MARKET_DAYS));
    if price <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input(format!(
            "discount yield {discount_yield} over {days_to_maturity} days gives a non-positive price"
        )));
    }
    Ok(price)
}

/// Bond-equivalent yield on a 365-day year.
///
/// Up to 182 days this is the simple yield `(F − P)/P × 365/d`. Longer
/// bills solve the semi-annual compounding quadratic
///
/// ```text
/// BEY = (−2t + 2·√(t² − (2t − 1)(1 − F/P))) / (2t − 1),   t = d/365
/// ```
///
/// which reduces to `2(√(F/P) − 1)` for a one-year bill.
pub fn bond_equivalent_yield(
    price: Decimal,
    face_value: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    check(price, face_value, days_to_maturity)?;
    let days = Decimal::from(days_to_maturity);
    let year = Decimal::from(BEY_DAYS);

    if days_to_maturity <= BEY_SIMPLE_LIMIT_DAYS {
        return Ok((face_value - price) / price * year / days);
    }

    let t = days / year;
    let a = dec!(2) * t - Decimal::ONE;
    let discriminant = t * t - a * (Decimal::ONE - face_value / price);
    let root = discriminant.sqrt().ok_or_else(|| {
        AnalyticsError::invalid_input(format!(
            "no bond-equivalent yield for price {price} over {days_to_maturity} days"
        ))
    })?;
    Ok((dec!(-2) * t + dec!(2) * root) / a)
}

/// Money market (CD-equivalent) yield on a 360-day year.
///
/// ```text
/// MMY = (F / P − 1) × 360 / d
/// ```
pub fn money_market_yield(
    price: Decimal,
    face_value: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    check(price, face_value, days_to_maturity)?;
    let days = Decimal::from(days_to_maturity);
    Ok((face_value / price - Decimal::ONE) * Decimal::from(MONEY_MARKET_DAYS) / days)
}

/// Price from a money market yield.
pub fn price_from_money_market_yield(
    yield_rate: Decimal,
    face_value: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    check(face_value, face_value, days_to_maturity)?;
    let days = Decimal::from(days_to_maturity);
    let growth = Decimal::ONE + yield_rate * days / Decimal::from(MONEY_MARKET_DAYS);
    if growth <= Decimal::ZERO {
        return Err(AnalyticsError::invalid_input(format!(
            "money market yield {yield_rate} gives a non-positive price"
        )));
    }
    Ok(face_value / growth)
}

/// Bond-equivalent yield implied by a discount yield.
pub fn discount_to_bond_equivalent(
    discount_yield: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    let price = price_from_discount_yield(discount_yield, dec!(100), days_to_maturity)?;
    bond_equivalent_yield(price, dec!(100), days_to_maturity)
}

/// Money market yield implied by a discount yield.
///
/// ```text
/// MMY = DY / (1 − DY × d / 360)
/// ```
pub fn discount_to_money_market(
    discount_yield: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    let price = price_from_discount_yield(discount_yield, dec!(100), days_to_maturity)?;
    money_market_yield(price, dec!(100), days_to_maturity)
}

/// Discount yield implied by a money market yield.
pub fn money_market_to_discount(
    money_market_yield: Decimal,
    days_to_maturity: u32,
) -> AnalyticsResult<Decimal> {
    let price = price_from_money_market_yield(money_market_yield, dec!(100), days_to_maturity)?;
    discount_yield(price, dec!(100), days_to_maturity)
}
