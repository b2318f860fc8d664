//! Key-rate DV01s and durations.
//!
//! Each key tenor's zero rate is bumped with a triangular profile that
//! falls to zero at the neighbouring tenors. The profiles of a full set
//! sum to one at every maturity, so the key-rate DV01s add up to the
//! parallel DV01 up to second-order terms.

use log::debug;
use serde::{Deserialize, Serialize};

use coupon_bonds::Bond;
use coupon_core::Date;
use coupon_curves::bumping::{key_rate_profile, STANDARD_KEY_TENORS};
use coupon_curves::{Curve, DiscountCurve};

use super::dv01::{dv01_from_prices, ONE_BP};
use super::effective::{CurvePricer, SpreadPricer};
use crate::config::RiskConfig;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Sensitivity to one key tenor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyRateDv01 {
    /// Key tenor in years.
    pub tenor: f64,
    /// Price change per 100 for a 1bp move at the tenor.
    pub dv01: f64,
    /// `dv01 / (price × 0.0001)`.
    pub duration: f64,
}

/// Key-rate sensitivities of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRateProfile {
    /// Unbumped price per 100.
    pub base_price: f64,
    /// One entry per key tenor, ascending.
    pub entries: Vec<KeyRateDv01>,
}

impl KeyRateProfile {
    /// Sum of the key-rate DV01s.
    #[must_use]
    pub fn total_dv01(&self) -> f64 {
        self.entries.iter().map(|e| e.dv01).sum()
    }

    /// Sum of the key-rate durations.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// Entry at `tenor`.
    #[must_use]
    pub fn at_tenor(&self, tenor: f64) -> Option<&KeyRateDv01> {
        self.entries.iter().find(|e| (e.tenor - tenor).abs() < 1e-6)
    }
}

fn check_tenors(tenors: &[f64]) -> AnalyticsResult<()> {
    if tenors.is_empty() {
        return Err(AnalyticsError::invalid_input("no key tenors"));
    }
    if tenors.iter().any(|t| !(t.is_finite() && *t > 0.0)) {
        return Err(AnalyticsError::invalid_input(format!(
            "key tenors must be positive, got {tenors:?}"
        )));
    }
    if tenors.windows(2).any(|w| w[1] <= w[0]) {
        return Err(AnalyticsError::invalid_input(format!(
            "key tenors must be strictly ascending, got {tenors:?}"
        )));
    }
    Ok(())
}

/// Key-rate DV01s of any repricer under `±bump_bps` at each tenor.
pub fn key_rate_profile_for<P: CurvePricer + ?Sized>(
    pricer: &P,
    curve: &dyn Curve,
    tenors: &[f64],
    bump_bps: f64,
) -> AnalyticsResult<KeyRateProfile> {
    check_tenors(tenors)?;
    if !(bump_bps.is_finite() && bump_bps > 0.0) {
        return Err(AnalyticsError::invalid_input(format!(
            "bump must be positive, got {bump_bps}bp"
        )));
    }
    let base_price = pricer.price_on(curve)?;
    let ups = key_rate_profile(tenors, bump_bps);
    let downs = key_rate_profile(tenors, -bump_bps);
    let per_bp = 1.0 / bump_bps;

    let entries = ups
        .into_iter()
        .zip(downs)
        .map(|(up, down)| -> AnalyticsResult<KeyRateDv01> {
            let tenor = up.key_tenor();
            let price_up = pricer.price_on(&up.apply(curve))?;
            let price_down = pricer.price_on(&down.apply(curve))?;
            let dv01 = dv01_from_prices(price_up, price_down) * per_bp;
            Ok(KeyRateDv01 {
                tenor,
                dv01,
                duration: dv01 / (base_price * ONE_BP),
            })
        })
        .collect::<AnalyticsResult<Vec<_>>>()?;

    debug!(
        "key-rate DV01s over {} tenors, total {:.6}",
        entries.len(),
        entries.iter().map(|e| e.dv01).sum::<f64>()
    );
    Ok(KeyRateProfile {
        base_price,
        entries,
    })
}

/// Key-rate DV01s of a bond priced off `curve`.
///
/// With no `tenors` the curve's own pillars are the keys.
pub fn key_rate_dv01s<B: Bond + ?Sized>(
    bond: &B,
    curve: &DiscountCurve,
    settlement: Date,
    tenors: Option<&[f64]>,
) -> AnalyticsResult<KeyRateProfile> {
    let pillars: Vec<f64>;
    let tenors = match tenors {
        Some(tenors) => tenors,
        None => {
            pillars = curve.times().iter().copied().filter(|t| *t > 0.0).collect();
            &pillars
        }
    };
    key_rate_profile_for(&SpreadPricer::new(bond, settlement), curve, tenors, 1.0)
}

/// Key-rate DV01s with the tenors and bump of `config`.
pub fn key_rate_dv01s_with_config<P: CurvePricer + ?Sized>(
    pricer: &P,
    curve: &dyn Curve,
    config: &RiskConfig,
) -> AnalyticsResult<KeyRateProfile> {
    key_rate_profile_for(pricer, curve, &config.key_tenors, config.key_rate_bump_bps)
}

/// Key-rate DV01s on the standard tenors.
pub fn standard_key_rate_dv01s<P: CurvePricer + ?Sized>(
    pricer: &P,
    curve: &dyn Curve,
) -> AnalyticsResult<KeyRateProfile> {
    key_rate_profile_for(pricer, curve, STANDARD_KEY_TENORS, 1.0)
}
