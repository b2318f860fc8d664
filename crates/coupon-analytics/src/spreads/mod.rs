//! Spread measures.
//!
//! | Spread | Question |
//! |--------|----------|
//! | G-spread | How far is the yield over the government curve at maturity? |
//! | I-spread | How far is the yield over the swap curve at maturity? |
//! | Z-spread | What constant spread over the zero curve reprices the bond? |
//! | ASW | What spread over floating does an asset swap package pay? |
//! | DM | What margin over the index reprices a floating rate note? |
//! | OAS | What Z-spread is left after valuing the embedded options? |
//!
//! Spreads are returned as decimals (`0.0125` for 125bp).

mod asw;
mod discount_margin;
mod gspread;
mod oas;
mod zspread;

pub use asw::{AssetSwap, AswType};
pub use discount_margin::{discount_margin, simple_margin, DiscountMarginCalculator};
pub use gspread::{g_spread, i_spread, Benchmark, GSpreadCalculator};
pub use oas::{OasCalculator, OasResult};
pub use zspread::{z_spread, z_spread_from_clean, ZSpreadCalculator};

use log::debug;

use coupon_math::MathError;
use coupon_math::solvers::{brent, SolverConfig, SPREAD_BRACKET, WIDE_SPREAD_BRACKET};

use crate::error::AnalyticsResult;

/// Solves `f(s) = 0` for a spread with Brent.
///
/// Tries the normal spread bracket first and widens it once when there is
/// no sign change; the wide bracket's failure is returned as is.
pub(crate) fn solve_spread<F>(f: F, config: &SolverConfig) -> AnalyticsResult<f64>
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = SPREAD_BRACKET;
    match brent(&f, lo, hi, config) {
        Ok(result) => Ok(result.root),
        Err(MathError::InvalidBracket { .. }) => {
            debug!("no spread in [{lo}, {hi}], widening to {WIDE_SPREAD_BRACKET:?}");
            let (lo, hi) = WIDE_SPREAD_BRACKET;
            Ok(brent(&f, lo, hi, config)?.root)
        }
        Err(err) => Err(err.into()),
    }
}
