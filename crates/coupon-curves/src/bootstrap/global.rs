//! Global least-squares curve fitting.

use coupon_core::Date;
use coupon_math::extrapolation::ExtrapolationMethod;
use coupon_math::interpolation::{NelsonSiegel, Svensson};
use coupon_math::optimization::{levenberg_marquardt, LmConfig, LmResult};
use coupon_math::MathError;
use log::debug;
use serde::{Deserialize, Serialize};

use super::sorted_pillars;
use crate::curves::{DiscountCurve, NelsonSiegelCurve, SvenssonCurve};
use crate::error::{CurveError, CurveResult};
use crate::instruments::CurveInstrument;
use crate::interpolation::InterpolationMethod;
use crate::traits::Curve;
use crate::validation::{validate_curve, ValidationConfig, ValidationReport};

/// Starting zero rate for piecewise fits.
const INITIAL_ZERO: f64 = 0.03;

/// Starting `(τ₁, τ₂)` pairs for Svensson fits. The two hump terms are
/// nearly collinear when the decays meet, so a single start can stall there.
const SVENSSON_SEEDS: [(f64, f64); 5] =
    [(1.5, 5.0), (0.5, 2.0), (1.0, 8.0), (3.0, 10.0), (0.5, 5.0)];

/// Maps optimizer coordinates to Svensson parameters. The decays are
/// searched as `τ₁ = e^{u₁}` and `τ₂ = τ₁ + e^{u₂}`, which keeps them
/// positive and ordered.
fn svensson_params(coordinates: &[f64]) -> Vec<f64> {
    let mut params = coordinates.to_vec();
    if let [.., u1, u2] = *coordinates {
        if coordinates.len() == Svensson::PARAMETERS {
            let tau1 = u1.exp();
            params[4] = tau1;
            params[5] = tau1 + u2.exp();
        }
    }
    params
}

/// Curve family fitted by [`GlobalBootstrapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GlobalModel {
    /// One zero rate per instrument pillar, interpolated.
    #[default]
    PiecewiseZero,
    /// Four-parameter Nelson-Siegel.
    NelsonSiegel,
    /// Six-parameter Svensson.
    Svensson,
}

/// Settings for [`GlobalBootstrapper`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitterConfig {
    /// Optimizer settings.
    pub lm: LmConfig,
    /// Interpolation for [`GlobalModel::PiecewiseZero`].
    pub interpolation: InterpolationMethod,
    /// Extrapolation for [`GlobalModel::PiecewiseZero`].
    pub extrapolation: ExtrapolationMethod,
    /// Post-build checks.
    pub validation: ValidationConfig,
    /// Repricing tolerance for parametric models, which generally cannot
    /// match every input exactly.
    pub parametric_tolerance: f64,
}

impl Default for FitterConfig {
    fn default() -> Self {
        Self {
            lm: LmConfig::default(),
            interpolation: InterpolationMethod::default(),
            extrapolation: ExtrapolationMethod::default(),
            validation: ValidationConfig::default(),
            parametric_tolerance: 5e-4,
        }
    }
}

/// A curve produced by [`GlobalBootstrapper`].
#[derive(Debug, Clone)]
pub enum FittedCurve {
    /// Piecewise interpolated curve.
    Discount(DiscountCurve),
    /// Nelson-Siegel curve.
    NelsonSiegel(NelsonSiegelCurve),
    /// Svensson curve.
    Svensson(SvenssonCurve),
}

impl FittedCurve {
    /// The piecewise curve, if this is one.
    #[must_use]
    pub fn as_discount(&self) -> Option<&DiscountCurve> {
        match self {
            Self::Discount(curve) => Some(curve),
            _ => None,
        }
    }

    /// Fitted model parameters; zero rates at the pillars for piecewise
    /// curves.
    #[must_use]
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Self::Discount(curve) => curve.zero_rates().to_vec(),
            Self::NelsonSiegel(curve) => curve.model().params().to_vec(),
            Self::Svensson(curve) => curve.model().params().to_vec(),
        }
    }

    fn inner(&self) -> &dyn Curve {
        match self {
            Self::Discount(curve) => curve,
            Self::NelsonSiegel(curve) => curve,
            Self::Svensson(curve) => curve,
        }
    }
}

impl Curve for FittedCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.inner().discount_factor(t)
    }

    fn reference_date(&self) -> Date {
        self.inner().reference_date()
    }

    fn max_time(&self) -> f64 {
        self.inner().max_time()
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        self.inner().instantaneous_forward(t)
    }
}

/// Result of a global fit.
#[derive(Debug, Clone)]
pub struct GlobalFit {
    /// The validated curve.
    pub curve: FittedCurve,
    /// Validation outcome.
    pub report: ValidationReport,
    /// Root-mean-square of `PV / notional` over the inputs.
    pub rms: f64,
    /// Optimizer iterations.
    pub iterations: u32,
    /// Whether the optimizer met its tolerance.
    pub converged: bool,
}

/// Fits a curve to all instruments at once with Levenberg-Marquardt.
///
/// Residuals are `PV / notional` per instrument. The piecewise model has
/// one continuous zero rate per pillar and therefore reprices exactly; the
/// parametric models are checked against
/// [`FitterConfig::parametric_tolerance`] instead.
///
/// ```rust
/// use coupon_core::Date;
/// use coupon_curves::prelude::*;
///
/// let spot = Date::from_ymd(2025, 1, 2).unwrap();
/// let fit = GlobalBootstrapper::new(spot)
///     .add(Deposit::from_tenor(spot, "6M", 0.045).unwrap())
///     .add(Swap::from_tenor(spot, "2Y", 0.042).unwrap())
///     .add(Swap::from_tenor(spot, "5Y", 0.040).unwrap())
///     .fit()
///     .unwrap();
/// assert!(fit.rms < 1e-10);
/// ```
pub struct GlobalBootstrapper {
    reference_date: Date,
    instruments: Vec<Box<dyn CurveInstrument>>,
    model: GlobalModel,
    config: FitterConfig,
}

impl GlobalBootstrapper {
    /// Creates an empty piecewise fitter.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            instruments: Vec::new(),
            model: GlobalModel::default(),
            config: FitterConfig::default(),
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: GlobalModel) -> Self {
        self.model = model;
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FitterConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the interpolation for piecewise fits.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.config.interpolation = method;
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

    /// Fits and validates the curve.
    pub fn fit(mut self) -> CurveResult<GlobalFit> {
        let times = sorted_pillars(self.reference_date, &mut self.instruments)?;
        let max_time = times[times.len() - 1];

        let initial = match self.model {
            GlobalModel::PiecewiseZero => vec![INITIAL_ZERO; times.len()],
            GlobalModel::NelsonSiegel => vec![0.04, -0.01, 0.0, 1.5],
            GlobalModel::Svensson => vec![0.04, -0.01, 0.0, 0.0, 1.5, 5.0],
        };
        let parameters = initial.len();
        if self.model != GlobalModel::PiecewiseZero && self.instruments.len() < parameters {
            return Err(CurveError::InsufficientPoints {
                required: parameters,
                got: self.instruments.len(),
            });
        }

        let residuals = |params: &[f64]| -> Result<Vec<f64>, MathError> {
            let curve = self
                .build(params, &times, max_time)
                .map_err(|e| MathError::invalid_input(e.to_string()))?;
            self.instruments
                .iter()
                .map(|instrument| {
                    instrument
                        .pv(&curve)
                        .map(|pv| pv / instrument.notional())
                        .map_err(|e| MathError::invalid_input(e.to_string()))
                })
                .collect()
        };

        let fit_error = |e: MathError| {
            CurveError::bootstrap_failed(format!("{:?} fit", self.model), e.to_string())
        };
        let result = match self.model {
            GlobalModel::Svensson => {
                let mut best: Option<LmResult> = None;
                for (tau1, tau2) in SVENSSON_SEEDS {
                    let seed = [0.04, -0.01, 0.0, 0.0, tau1.ln(), (tau2 - tau1).ln()];
                    let mut candidate = levenberg_marquardt(
                        |u: &[f64]| residuals(svensson_params(u).as_slice()),
                        &seed,
                        &self.config.lm,
                    )
                    .map_err(fit_error)?;
                    candidate.parameters = svensson_params(&candidate.parameters);
                    debug!(
                        "Svensson start ({tau1}, {tau2}): rms={:.3e} converged={}",
                        candidate.rms, candidate.converged
                    );
                    if !matches!(&best, Some(current) if current.rms <= candidate.rms) {
                        best = Some(candidate);
                    }
                }
                best.ok_or_else(|| fit_error(MathError::insufficient_data(1, 0)))?
            }
            _ => levenberg_marquardt(&residuals, &initial, &self.config.lm).map_err(fit_error)?,
        };
        debug!(
            "{:?} fit: rms={:.3e} iterations={} converged={}",
            self.model, result.rms, result.iterations, result.converged
        );

        let curve = self.build(&result.parameters, &times, max_time)?;
        let validation = match self.model {
            GlobalModel::PiecewiseZero => self.config.validation,
            _ => self
                .config
                .validation
                .with_repricing_tolerance(self.config.parametric_tolerance),
        };
        let report = validate_curve(&curve, &self.instruments, &validation)?.into_result()?;

        Ok(GlobalFit {
            curve,
            report,
            rms: result.rms,
            iterations: result.iterations,
            converged: result.converged,
        })
    }

    fn build(&self, params: &[f64], times: &[f64], max_time: f64) -> CurveResult<FittedCurve> {
        Ok(match self.model {
            GlobalModel::PiecewiseZero => FittedCurve::Discount(DiscountCurve::from_zero_rates(
                self.reference_date,
                times.to_vec(),
                params,
                self.config.interpolation,
                self.config.extrapolation,
            )?),
            GlobalModel::NelsonSiegel => FittedCurve::NelsonSiegel(NelsonSiegelCurve::new(
                self.reference_date,
                NelsonSiegel::from_params(params)?,
                max_time,
            )),
            GlobalModel::Svensson => FittedCurve::Svensson(SvenssonCurve::new(
                self.reference_date,
                Svensson::from_params(params)?,
                max_time,
            )),
        })
    }
}
