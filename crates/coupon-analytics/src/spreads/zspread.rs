//! Z-spread: the constant continuously compounded spread over the curve.
//!
//! ```text
//! Dirty = Σ CF_i × DF(t_i)/DF(t_s) × exp(−z × (t_i − t_s))
//! ```

use log::debug;

use coupon_bonds::Bond;
use coupon_core::Date;
use coupon_curves::Curve;
use coupon_math::solvers::SolverConfig;

use super::solve_spread;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::DiscountedFlows;

/// Z-spread calculator over one curve.
pub struct ZSpreadCalculator<'a> {
    curve: &'a dyn Curve,
    config: SolverConfig,
}

impl std::fmt::Debug for ZSpreadCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZSpreadCalculator")
            .field("reference_date", &self.curve.reference_date())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> ZSpreadCalculator<'a> {
    /// Creates a calculator with the default solver settings.
    #[must_use]
    pub fn new(curve: &'a dyn Curve) -> Self {
        Self {
            curve,
            config: SolverConfig::default(),
        }
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    /// Sets the solver iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config = self.config.with_max_iterations(max_iterations);
        self
    }

    /// Z-spread (decimal) that reprices `dirty_price` per 100.
    ///
    /// Exactly zero when the dirty price equals the curve price within the
    /// solver tolerance.
    pub fn calculate<B: Bond + ?Sized>(
        &self,
        bond: &B,
        dirty_price: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        if !(dirty_price.is_finite() && dirty_price > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "dirty price must be positive, got {dirty_price}"
            )));
        }
        let flows = DiscountedFlows::for_bond(bond, self.curve, settlement)?;
        if (flows.price(0.0) - dirty_price).abs() <= self.config.tolerance {
            return Ok(0.0);
        }
        let z = solve_spread(|z| flows.price(z) - dirty_price, &self.config)?;
        debug!("{}: z-spread {:.4}bp", bond.identifier(), z * 1e4);
        Ok(z)
    }

    /// Dirty price per 100 at Z-spread `z`.
    pub fn price_with_spread<B: Bond + ?Sized>(
        &self,
        bond: &B,
        z: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        Ok(DiscountedFlows::for_bond(bond, self.curve, settlement)?.price(z))
    }

    /// Price change per 100 for a 1bp rise in the Z-spread (positive).
    pub fn spread_dv01<B: Bond + ?Sized>(
        &self,
        bond: &B,
        z: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        let flows = DiscountedFlows::for_bond(bond, self.curve, settlement)?;
        Ok((flows.price(z - 0.5e-4) - flows.price(z + 0.5e-4)).abs())
    }
}

/// Z-spread (decimal) of `bond` at `dirty_price` per 100 over `curve`.
pub fn z_spread<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    dirty_price: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    ZSpreadCalculator::new(curve).calculate(bond, dirty_price, settlement)
}

/// Z-spread from a clean price.
pub fn z_spread_from_clean<B: Bond + ?Sized>(
    bond: &B,
    curve: &dyn Curve,
    clean_price: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    let dirty = clean_price + crate::pricing::accrued_per_100(bond, settlement)?;
    z_spread(bond, curve, dirty, settlement)
}
