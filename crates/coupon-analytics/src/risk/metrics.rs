//! Yield risk of a bond in one value.

use serde::{Deserialize, Serialize};

use coupon_bonds::Bond;
use coupon_core::{Compounding, Date};

use super::duration::{convexity, macaulay_duration, modified_duration, price_change_with_convexity};
use super::dv01::{dv01_from_duration, dv01_notional};
use crate::config::PricingConfig;
use crate::error::AnalyticsResult;
use crate::pricing::{price_from_yield, street_compounding, yield_from_price};

/// Duration, convexity and DV01 at one yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Yield the measures are taken at.
    pub yield_rate: f64,
    /// Dirty price per 100 at that yield.
    pub dirty_price: f64,
    /// Macaulay duration in years.
    pub macaulay_duration: f64,
    /// Modified duration.
    pub modified_duration: f64,
    /// Analytic convexity.
    pub convexity: f64,
    /// DV01 per 100 face.
    pub dv01: f64,
}

impl RiskMetrics {
    /// Measures at `yield_rate`.
    pub fn from_yield<B: Bond + ?Sized>(
        bond: &B,
        yield_rate: f64,
        settlement: Date,
        compounding: Compounding,
    ) -> AnalyticsResult<Self> {
        let dirty_price = price_from_yield(bond, yield_rate, settlement, compounding)?;
        let modified = modified_duration(bond, yield_rate, settlement, compounding)?;
        Ok(Self {
            yield_rate,
            dirty_price,
            macaulay_duration: macaulay_duration(bond, yield_rate, settlement, compounding)?,
            modified_duration: modified,
            convexity: convexity(bond, yield_rate, settlement, compounding)?,
            dv01: dv01_from_duration(modified, dirty_price),
        })
    }

    /// Measures at the yield implied by `clean_price`.
    pub fn from_clean_price<B: Bond + ?Sized>(
        bond: &B,
        clean_price: f64,
        settlement: Date,
        config: &PricingConfig,
    ) -> AnalyticsResult<Self> {
        let compounding = config
            .compounding
            .unwrap_or_else(|| street_compounding(bond));
        let y = yield_from_price(bond, clean_price, settlement, compounding, &config.solver())?;
        Self::from_yield(bond, y, settlement, compounding)
    }

    /// DV01 of `face` notional.
    #[must_use]
    pub fn dv01_for(&self, face: f64) -> f64 {
        dv01_notional(self.dv01, face)
    }

    /// Estimated dirty price change per 100 for a yield move.
    #[must_use]
    pub fn price_change(&self, yield_change: f64) -> f64 {
        price_change_with_convexity(
            self.modified_duration,
            self.convexity,
            self.dirty_price,
            yield_change,
        )
    }
}
