//! Sequential (pillar by pillar) bootstrap.

use coupon_core::Date;
use coupon_math::extrapolation::ExtrapolationMethod;
use coupon_math::solvers::brent;
use log::debug;

use super::{sorted_pillars, BootstrapConfig};
use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{build_instruments, CurveInstrument, CurveQuote};
use crate::interpolation::InterpolationMethod;
use crate::validation::{validate_curve, ValidationConfig, ValidationReport};

/// Discount factor search interval.
const DF_FLOOR: f64 = 1e-8;
const DF_CEILING: f64 = 1.5;

/// A candidate is accepted without a search when it reprices this much
/// tighter than the validation tolerance.
const ACCEPT_FRACTION: f64 = 1e-3;

/// Pillar movement below which a sweep has converged.
const SWEEP_TOLERANCE: f64 = 1e-14;

/// Builds a [`DiscountCurve`] one pillar at a time.
///
/// 1. Sort instruments by pillar date; each pillar must be unique.
/// 2. For each instrument, take its closed-form discount factor on the
///    curve so far as a candidate. Keep it if the curve with the new pillar
///    reprices the instrument; otherwise solve the pillar with Brent on
///    `(0, 1.5]`.
/// 3. With non-local interpolation, later pillars reshape earlier segments,
///    so the solve is repeated over all pillars until nothing moves.
/// 4. Build the final curve and validate it.
pub struct SequentialBootstrapper {
    reference_date: Date,
    instruments: Vec<Box<dyn CurveInstrument>>,
    config: BootstrapConfig,
}

impl SequentialBootstrapper {
    /// Creates an empty bootstrapper.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            instruments: Vec::new(),
            config: BootstrapConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the interpolation of the resulting curve.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.config.interpolation = method;
        self
    }

    /// Sets the extrapolation of the resulting curve.
    #[must_use]
    pub fn with_extrapolation(mut self, method: ExtrapolationMethod) -> Self {
        self.config.extrapolation = method;
        self
    }

    /// Sets the validation checks.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.config.validation = validation;
        self
    }

    /// Adds an instrument.
    #[must_use]
    pub fn add<I: CurveInstrument + 'static>(mut self, instrument: I) -> Self {
        self.instruments.push(Box::new(instrument));
        self
    }

    /// Adds boxed instruments.
    #[must_use]
    pub fn add_all(mut self, instruments: impl IntoIterator<Item = Box<dyn CurveInstrument>>) -> Self {
        self.instruments.extend(instruments);
        self
    }

    /// Adds instruments built from market quotes.
    pub fn add_quotes(self, spot: Date, quotes: &[CurveQuote]) -> CurveResult<Self> {
        Ok(self.add_all(build_instruments(spot, quotes)?))
    }

    /// Bootstraps and validates the curve.
    pub fn bootstrap(self) -> CurveResult<DiscountCurve> {
        self.bootstrap_with_report().map(|(curve, _)| curve)
    }

    /// Bootstraps and validates the curve, returning the validation report.
    pub fn bootstrap_with_report(mut self) -> CurveResult<(DiscountCurve, ValidationReport)> {
        let times = sorted_pillars(self.reference_date, &mut self.instruments)?;
        let mut dfs: Vec<f64> = Vec::with_capacity(times.len());

        for (i, instrument) in self.instruments.iter().enumerate() {
            let guess = self.closed_form(&times[..i], &dfs, instrument.as_ref());
            dfs.push(guess);
            let df = self.solve_pillar(&times[..=i], &dfs, i, instrument.as_ref())?;
            dfs[i] = df;
            debug!(
                "bootstrap pillar {i}: t={:.6} df={df:.12} ({})",
                times[i],
                instrument.description()
            );
        }

        if !self.config.interpolation.is_local() {
            self.sweep(&times, &mut dfs)?;
        }

        let curve = DiscountCurve::new(
            self.reference_date,
            times,
            dfs,
            self.config.interpolation,
            self.config.extrapolation,
        )?;
        let report =
            validate_curve(&curve, &self.instruments, &self.config.validation)?.into_result()?;
        Ok((curve, report))
    }

    /// Gauss-Seidel passes over all pillars until they stop moving.
    fn sweep(&self, times: &[f64], dfs: &mut [f64]) -> CurveResult<()> {
        for pass in 1..=self.config.max_sweeps {
            let mut max_change: f64 = 0.0;
            for (i, instrument) in self.instruments.iter().enumerate() {
                let df = self.solve_pillar(times, dfs, i, instrument.as_ref())?;
                max_change = max_change.max((df - dfs[i]).abs());
                dfs[i] = df;
            }
            debug!("bootstrap sweep {pass}: max pillar change {max_change:.3e}");
            if max_change < SWEEP_TOLERANCE {
                return Ok(());
            }
        }
        debug!(
            "bootstrap sweeps stopped after {} passes; validation decides",
            self.config.max_sweeps
        );
        Ok(())
    }

    /// Closed-form candidate on the curve built so far; NaN when unavailable.
    fn closed_form(&self, times: &[f64], dfs: &[f64], instrument: &dyn CurveInstrument) -> f64 {
        let partial = if times.is_empty() {
            DiscountCurve::from_zero_rates(
                self.reference_date,
                vec![1.0],
                &[0.0],
                InterpolationMethod::Linear,
                ExtrapolationMethod::Flat,
            )
        } else {
            self.trial_curve(times, dfs)
        };
        partial
            .and_then(|curve| instrument.implied_df(&curve))
            .unwrap_or(f64::NAN)
    }

    fn trial_curve(&self, times: &[f64], dfs: &[f64]) -> CurveResult<DiscountCurve> {
        DiscountCurve::new(
            self.reference_date,
            times.to_vec(),
            dfs.to_vec(),
            self.config.interpolation,
            ExtrapolationMethod::Flat,
        )
    }

    /// Solves `dfs[i]` so that `instrument` reprices, starting from the
    /// current value.
    fn solve_pillar(
        &self,
        times: &[f64],
        dfs: &[f64],
        i: usize,
        instrument: &dyn CurveInstrument,
    ) -> CurveResult<f64> {
        let notional = instrument.notional();
        let objective = |df: f64| -> f64 {
            let mut trial = dfs.to_vec();
            trial[i] = df;
            self.trial_curve(times, &trial)
                .and_then(|curve| instrument.pv(&curve))
                .map_or(f64::NAN, |pv| pv / notional)
        };

        let accept = self.config.validation.repricing_tolerance * ACCEPT_FRACTION;
        let current = dfs[i];
        if current > 0.0 && objective(current).abs() <= accept {
            return Ok(current);
        }

        brent(&objective, DF_FLOOR, DF_CEILING, &self.config.solver)
            .map(|result| result.root)
            .map_err(|e| {
                CurveError::bootstrap_failed(instrument.description(), e.to_string())
            })
    }
}
