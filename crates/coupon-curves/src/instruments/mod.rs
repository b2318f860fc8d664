//! Market instruments used to bootstrap curves.
//!
//! Every instrument implements [`CurveInstrument`]: a present value against a
//! curve and a closed-form discount factor at its pillar given the curve at
//! earlier dates. The bootstrapper only sees the trait.
//!
//! ## Money Market
//! - [`Deposit`]: cash deposits (O/N to 12M)
//! - [`Fra`]: forward rate agreements
//! - [`RateFuture`]: short-rate futures with convexity adjustment
//!
//! ## Swaps
//! - [`Swap`]: fixed-for-floating swaps
//! - [`Ois`]: overnight index swaps
//!
//! ## Bonds
//! - [`BondInstrument`]: zero or coupon bond quoted at a clean price

mod bond;
mod deposit;
mod fra;
mod future;
mod leg;
mod ois;
pub mod quotes;
mod swap;

pub use bond::BondInstrument;
pub use deposit::Deposit;
pub use fra::Fra;
pub use future::{hull_white_convexity, imm_date, RateFuture};
pub use ois::Ois;
pub use quotes::{build_instruments, CurveQuote, QuoteKind};
pub use swap::Swap;

use std::fmt;

use coupon_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Instrument category, ordered from the short end outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentType {
    /// Cash deposit
    Deposit,
    /// Forward rate agreement
    Fra,
    /// Short-rate future
    Future,
    /// Overnight index swap
    Ois,
    /// Fixed-for-floating swap
    Swap,
    /// Bond quoted at a price
    Bond,
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deposit => "Deposit",
            Self::Fra => "FRA",
            Self::Future => "Future",
            Self::Ois => "OIS",
            Self::Swap => "Swap",
            Self::Bond => "Bond",
        };
        f.write_str(name)
    }
}

/// An instrument that constrains one curve pillar.
///
/// `pv` is in currency units of [`notional`](Self::notional) and is zero on a
/// curve that reprices the instrument. `implied_df` returns the discount
/// factor at [`pillar_date`](Self::pillar_date) that zeroes the PV, reading
/// every earlier date from `curve`; when intermediate flows fall beyond the
/// curve's last pillar the result is only a starting guess.
pub trait CurveInstrument: Send + Sync + fmt::Debug {
    /// Date of the final cash flow.
    fn maturity(&self) -> Date;

    /// Date whose discount factor this instrument determines.
    fn pillar_date(&self) -> Date {
        self.maturity()
    }

    /// Present value against `curve`.
    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Closed-form discount factor at the pillar.
    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Notional the PV is expressed in.
    fn notional(&self) -> f64 {
        1.0
    }

    /// Category.
    fn instrument_type(&self) -> InstrumentType;

    /// Short label for logs and errors.
    fn description(&self) -> String {
        format!("{} {}", self.instrument_type(), self.maturity())
    }
}

/// Adds a market tenor to a date.
///
/// Accepts `ON`, `TN`, `SN` and `<n>D`, `<n>W`, `<n>M`, `<n>Y`
/// (case-insensitive, `O/N` style also accepted).
pub fn add_tenor(start: Date, tenor: &str) -> CurveResult<Date> {
    let tenor = tenor.trim().to_uppercase();
    match tenor.as_str() {
        "ON" | "O/N" => return Ok(start.add_days(1)),
        "TN" | "T/N" => return Ok(start.add_days(2)),
        "SN" | "S/N" => return Ok(start.add_days(3)),
        _ => {}
    }

    let split = tenor.len().saturating_sub(1);
    let (count, unit) = tenor.split_at(split);
    let n: i32 = count
        .parse()
        .map_err(|_| CurveError::invalid_input(format!("invalid tenor '{tenor}'")))?;
    let date = match unit {
        "D" => start.add_days(i64::from(n)),
        "W" => start.add_days(7 * i64::from(n)),
        "M" => start.add_months(n)?,
        "Y" => start.add_years(n)?,
        _ => return Err(CurveError::invalid_input(format!("invalid tenor '{tenor}'"))),
    };
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_ordering() {
        assert!(InstrumentType::Deposit < InstrumentType::Fra);
        assert!(InstrumentType::Future < InstrumentType::Swap);
        assert_eq!(InstrumentType::Ois.to_string(), "OIS");
    }

    #[test]
    fn test_add_tenor() {
        let spot = Date::from_ymd(2025, 1, 31).unwrap();
        assert_eq!(add_tenor(spot, "ON").unwrap(), spot.add_days(1));
        assert_eq!(add_tenor(spot, "2w").unwrap(), spot.add_days(14));
        assert_eq!(
            add_tenor(spot, "1M").unwrap(),
            Date::from_ymd(2025, 2, 28).unwrap()
        );
        assert_eq!(
            add_tenor(spot, "10Y").unwrap(),
            Date::from_ymd(2035, 1, 31).unwrap()
        );
        assert!(add_tenor(spot, "3Q").is_err());
        assert!(add_tenor(spot, "M").is_err());
        assert!(add_tenor(spot, "").is_err());
    }
}
