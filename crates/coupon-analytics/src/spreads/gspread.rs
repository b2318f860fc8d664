//! G-spread and I-spread.
//!
//! Both are the bond's yield to maturity less a benchmark yield at the
//! bond's maturity. The benchmark comes from a government curve (G) or a
//! swap curve (I), read as a zero rate compounded at the bond's frequency.

use coupon_bonds::Bond;
use coupon_core::{Compounding, Date};
use coupon_curves::Curve;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::compounding_for;

/// Where the benchmark yield comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Benchmark {
    /// The curve's zero rate at the bond's maturity.
    Interpolated,
    /// A quoted benchmark yield.
    ExplicitYield(f64),
}

/// Spread of a bond yield over a benchmark curve.
pub struct GSpreadCalculator<'a> {
    curve: &'a dyn Curve,
    benchmark: Benchmark,
}

impl std::fmt::Debug for GSpreadCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GSpreadCalculator")
            .field("reference_date", &self.curve.reference_date())
            .field("benchmark", &self.benchmark)
            .finish_non_exhaustive()
    }
}

impl<'a> GSpreadCalculator<'a> {
    /// Creates a calculator reading the curve at the bond's maturity.
    #[must_use]
    pub fn new(curve: &'a dyn Curve) -> Self {
        Self {
            curve,
            benchmark: Benchmark::Interpolated,
        }
    }

    /// Sets the benchmark.
    #[must_use]
    pub fn with_benchmark(mut self, benchmark: Benchmark) -> Self {
        self.benchmark = benchmark;
        self
    }

    /// Benchmark yield for `bond`, compounded at the bond's frequency.
    pub fn benchmark_yield<B: Bond + ?Sized>(
        &self,
        bond: &B,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        let maturity = bond.maturity();
        if settlement >= maturity {
            return Err(AnalyticsError::invalid_settlement(settlement, maturity));
        }
        match self.benchmark {
            Benchmark::ExplicitYield(y) => Ok(y),
            Benchmark::Interpolated => {
                let compounding: Compounding = compounding_for(bond.yield_frequency());
                Ok(self.curve.zero_rate_at(maturity, compounding)?)
            }
        }
    }

    /// Bond yield less the benchmark yield.
    pub fn calculate<B: Bond + ?Sized>(
        &self,
        bond: &B,
        bond_yield: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        Ok(bond_yield - self.benchmark_yield(bond, settlement)?)
    }
}

/// G-spread (decimal) of `bond_yield` over `government_curve`.
pub fn g_spread<B: Bond + ?Sized>(
    bond: &B,
    government_curve: &dyn Curve,
    bond_yield: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    GSpreadCalculator::new(government_curve).calculate(bond, bond_yield, settlement)
}

/// I-spread (decimal) of `bond_yield` over `swap_curve`.
pub fn i_spread<B: Bond + ?Sized>(
    bond: &B,
    swap_curve: &dyn Curve,
    bond_yield: f64,
    settlement: Date,
) -> AnalyticsResult<f64> {
    GSpreadCalculator::new(swap_curve).calculate(bond, bond_yield, settlement)
}
