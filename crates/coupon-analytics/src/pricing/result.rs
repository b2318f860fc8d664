//! Price and yield of one bond at one settlement date.

use serde::{Deserialize, Serialize};

use coupon_bonds::Bond;
use coupon_core::{Compounding, Date};

use super::yields::{accrued_per_100, street_compounding, YieldFlows};
use crate::config::PricingConfig;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Clean and dirty price, accrued interest and yield, all per 100 face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Settlement date.
    pub settlement: Date,
    /// Clean price.
    pub clean_price: f64,
    /// Dirty price.
    pub dirty_price: f64,
    /// Accrued interest.
    pub accrued: f64,
    /// Yield to maturity.
    pub yield_to_maturity: f64,
    /// Compounding of the yield.
    pub compounding: Compounding,
}

impl PricingResult {
    /// Prices from a clean price quote.
    pub fn from_clean_price<B: Bond + ?Sized>(
        bond: &B,
        clean_price: f64,
        settlement: Date,
        config: &PricingConfig,
    ) -> AnalyticsResult<Self> {
        if !(clean_price.is_finite() && clean_price > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "clean price must be positive, got {clean_price}"
            )));
        }
        let compounding = config.compounding.unwrap_or_else(|| street_compounding(bond));
        let accrued = accrued_per_100(bond, settlement)?;
        let dirty_price = clean_price + accrued;
        let flows = YieldFlows::new(bond, settlement, compounding)?;
        let guess = if bond.coupon_rate() > 0.0 {
            bond.coupon_rate()
        } else {
            0.05
        };
        let yield_to_maturity = flows.solve(dirty_price, guess, &config.solver())?;
        Ok(Self {
            settlement,
            clean_price,
            dirty_price,
            accrued,
            yield_to_maturity,
            compounding,
        })
    }

    /// Prices from a yield.
    pub fn from_yield<B: Bond + ?Sized>(
        bond: &B,
        yield_rate: f64,
        settlement: Date,
        config: &PricingConfig,
    ) -> AnalyticsResult<Self> {
        let compounding = config.compounding.unwrap_or_else(|| street_compounding(bond));
        let accrued = accrued_per_100(bond, settlement)?;
        let dirty_price = YieldFlows::new(bond, settlement, compounding)?.price(yield_rate);
        Ok(Self {
            settlement,
            clean_price: dirty_price - accrued,
            dirty_price,
            accrued,
            yield_to_maturity: yield_rate,
            compounding,
        })
    }

    /// Yield in percent.
    #[must_use]
    pub fn yield_percent(&self) -> f64 {
        self.yield_to_maturity * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_bonds::FixedRateBond;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn bond() -> FixedRateBond {
        FixedRateBond::builder()
            .coupon_percent(4.0)
            .issue_date(date(2023, 3, 1))
            .maturity(date(2033, 3, 1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_clean_and_yield_agree() {
        let b = bond();
        let settle = date(2025, 5, 20);
        let config = PricingConfig::default();
        let quoted = PricingResult::from_clean_price(&b, 97.25, settle, &config).unwrap();
        let back = PricingResult::from_yield(&b, quoted.yield_to_maturity, settle, &config).unwrap();

        assert_relative_eq!(back.clean_price, 97.25, epsilon = 1e-8);
        assert_relative_eq!(quoted.dirty_price - quoted.clean_price, quoted.accrued, epsilon = 1e-12);
        // 30/360: 2025-03-01 to 2025-05-20 is 79 days of a 180-day period
        assert_relative_eq!(quoted.accrued, 2.0 * 79.0 / 180.0, epsilon = 1e-12);
        assert_eq!(quoted.compounding, Compounding::SemiAnnual);
        assert!(quoted.yield_to_maturity > 0.04);
    }

    #[test]
    fn test_serializes() {
        let result =
            PricingResult::from_yield(&bond(), 0.045, date(2025, 5, 20), &PricingConfig::default())
                .unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"settlement\":\"2025-05-20\""));
        let back: PricingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.settlement, result.settlement);
        assert_eq!(back.compounding, result.compounding);
        assert_relative_eq!(back.dirty_price, result.dirty_price, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_price() {
        let config = PricingConfig::default();
        assert!(PricingResult::from_clean_price(&bond(), 0.0, date(2025, 5, 20), &config).is_err());
        assert!(
            PricingResult::from_clean_price(&bond(), f64::NAN, date(2025, 5, 20), &config).is_err()
        );
    }
}
