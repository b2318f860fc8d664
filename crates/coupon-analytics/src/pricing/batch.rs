//! Pricing many bonds against one curve.
//!
//! With the `parallel` feature the bonds are spread over the rayon pool;
//! the curve is shared by reference and nothing is locked. Results come
//! back in input order, one per bond.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use coupon_bonds::Bond;
use coupon_core::Date;
use coupon_curves::Curve;

use super::curve::price_from_curve;
use super::result::PricingResult;
use crate::config::PricingConfig;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Dirty prices per 100 of `bonds` off `curve`.
#[cfg(feature = "parallel")]
pub fn price_batch<B, C>(bonds: &[B], curve: &C, settlement: Date) -> Vec<AnalyticsResult<f64>>
where
    B: Bond,
    C: Curve + ?Sized,
{
    bonds
        .par_iter()
        .map(|bond| price_from_curve(bond, curve, settlement))
        .collect()
}

/// Dirty prices per 100 of `bonds` off `curve`.
#[cfg(not(feature = "parallel"))]
pub fn price_batch<B, C>(bonds: &[B], curve: &C, settlement: Date) -> Vec<AnalyticsResult<f64>>
where
    B: Bond,
    C: Curve + ?Sized,
{
    bonds
        .iter()
        .map(|bond| price_from_curve(bond, curve, settlement))
        .collect()
}

/// Yields of `bonds` from clean prices, paired by position.
pub fn yield_batch<B: Bond>(
    bonds: &[B],
    clean_prices: &[f64],
    settlement: Date,
    config: &PricingConfig,
) -> AnalyticsResult<Vec<AnalyticsResult<PricingResult>>> {
    if bonds.len() != clean_prices.len() {
        return Err(AnalyticsError::invalid_input(format!(
            "{} bonds but {} prices",
            bonds.len(),
            clean_prices.len()
        )));
    }

    let price = |(bond, clean): (&B, &f64)| {
        PricingResult::from_clean_price(bond, *clean, settlement, config)
    };

    #[cfg(feature = "parallel")]
    let results = bonds.par_iter().zip(clean_prices.par_iter()).map(price).collect();
    #[cfg(not(feature = "parallel"))]
    let results = bonds.iter().zip(clean_prices.iter()).map(price).collect();

    Ok(results)
}
