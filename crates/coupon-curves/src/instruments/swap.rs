//! Fixed-for-floating interest rate swap.

use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};

use super::leg::FixedLeg;
use super::{add_tenor, CurveInstrument, InstrumentType};
use crate::error::CurveResult;
use crate::traits::Curve;

/// A par swap quoted on its fixed rate.
///
/// Single-curve pricing: the floating leg telescopes to
/// `DF(start) − DF(end)`, so
///
/// ```text
/// PV = N × [c Σ τᵢ DF(Tᵢ) − (DF(T₀) − DF(Tₙ))]
/// DF(Tₙ) = (DF(T₀) − c Σᵢ<ₙ τᵢ DF(Tᵢ)) / (1 + c τₙ)
/// ```
///
/// The defaults are an annual ACT/360 fixed leg.
#[derive(Debug, Clone)]
pub struct Swap {
    leg: FixedLeg,
    notional: f64,
}

impl Swap {
    /// Creates a swap with an annual ACT/360 fixed leg.
    pub fn new(effective_date: Date, termination_date: Date, fixed_rate: f64) -> CurveResult<Self> {
        Self::with_conventions(
            effective_date,
            termination_date,
            fixed_rate,
            Frequency::Annual,
            DayCountConvention::Act360,
        )
    }

    /// Creates a swap with explicit fixed leg conventions.
    pub fn with_conventions(
        effective_date: Date,
        termination_date: Date,
        fixed_rate: f64,
        frequency: Frequency,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        Ok(Self {
            leg: FixedLeg::new(
                effective_date,
                termination_date,
                fixed_rate,
                frequency,
                day_count,
            )?,
            notional: 1.0,
        })
    }

    /// Creates a swap from spot and a tenor such as `"5Y"`.
    pub fn from_tenor(spot_date: Date, tenor: &str, fixed_rate: f64) -> CurveResult<Self> {
        Self::new(spot_date, add_tenor(spot_date, tenor)?, fixed_rate)
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Effective date.
    #[must_use]
    pub fn effective_date(&self) -> Date {
        self.leg.start
    }

    /// Fixed rate.
    #[must_use]
    pub fn fixed_rate(&self) -> f64 {
        self.leg.rate
    }

    /// Fixed leg frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.leg.frequency
    }

    /// Fixed leg day count.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.leg.day_count
    }

    /// Fixed leg payment dates.
    #[must_use]
    pub fn payment_dates(&self) -> Vec<Date> {
        self.leg.payment_dates().collect()
    }

    /// Fixed leg annuity `Σ τᵢ DF(Tᵢ)` per unit notional.
    pub fn annuity(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.leg.annuity(curve)
    }

    /// Fixed rate that prices the swap at par on `curve`.
    pub fn par_rate(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let floating =
            curve.discount_factor_at(self.leg.start)? - curve.discount_factor_at(self.leg.end)?;
        Ok(floating / self.leg.annuity(curve)?)
    }
}

impl CurveInstrument for Swap {
    fn maturity(&self) -> Date {
        self.leg.end
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        Ok(self.notional * self.leg.swap_pv(curve)?)
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.leg.implied_end_df(curve)
    }

    fn notional(&self) -> f64 {
        self.notional
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Swap
    }

    fn description(&self) -> String {
        format!("Swap {:.4}% to {}", self.leg.rate * 100.0, self.leg.end)
    }
}
