//! Curve bootstrapping.
//!
//! - **Sequential**: one pillar per instrument, solved in maturity order
//!   from a closed form where one exists and Brent on the discount factor
//!   otherwise. Non-local interpolation is handled by repeating the sweep
//!   until the pillars stop moving.
//! - **Global**: Levenberg-Marquardt on all repricing errors at once, with
//!   piecewise zero rates or a Nelson-Siegel / Svensson parameter vector.
//!
//! Both run [`validate_curve`](crate::validation::validate_curve) on the
//! result and refuse to return a curve that fails it.
//!
//! ```rust
//! use coupon_core::Date;
//! use coupon_curves::prelude::*;
//!
//! let spot = Date::from_ymd(2025, 1, 2).unwrap();
//! let curve = SequentialBootstrapper::new(spot)
//!     .add(Deposit::from_tenor(spot, "1Y", 0.053).unwrap())
//!     .add(Swap::from_tenor(spot, "2Y", 0.048).unwrap())
//!     .bootstrap()
//!     .unwrap();
//! assert!(curve.discount_factor(1.5).unwrap() < 1.0);
//! ```

mod global;
mod sequential;

pub use global::{FittedCurve, FitterConfig, GlobalBootstrapper, GlobalFit, GlobalModel};
pub use sequential::SequentialBootstrapper;

use coupon_core::Date;
use coupon_math::extrapolation::ExtrapolationMethod;
use coupon_math::solvers::SolverConfig;

use crate::error::{CurveError, CurveResult};
use crate::instruments::CurveInstrument;
use crate::interpolation::InterpolationMethod;
use crate::traits::DAYS_PER_YEAR;
use crate::validation::ValidationConfig;

/// Settings for [`SequentialBootstrapper`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    /// Interpolation of the resulting curve.
    pub interpolation: InterpolationMethod,
    /// Extrapolation of the resulting curve.
    pub extrapolation: ExtrapolationMethod,
    /// Post-build checks.
    pub validation: ValidationConfig,
    /// Root finder settings for the per-pillar solve.
    pub solver: SolverConfig,
    /// Sweeps allowed for non-local interpolation.
    pub max_sweeps: u32,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMethod::default(),
            extrapolation: ExtrapolationMethod::default(),
            validation: ValidationConfig::default(),
            solver: SolverConfig::new(1e-15, 200),
            max_sweeps: 20,
        }
    }
}

/// Sorts instruments by pillar and returns their pillar times.
///
/// Pillars on or before the reference date and duplicated pillar dates are
/// rejected.
pub(crate) fn sorted_pillars(
    reference_date: Date,
    instruments: &mut [Box<dyn CurveInstrument>],
) -> CurveResult<Vec<f64>> {
    if instruments.is_empty() {
        return Err(CurveError::InsufficientPoints {
            required: 1,
            got: 0,
        });
    }
    instruments.sort_by_key(|i| i.pillar_date());

    let mut times = Vec::with_capacity(instruments.len());
    for (i, instrument) in instruments.iter().enumerate() {
        let date = instrument.pillar_date();
        if date <= reference_date {
            return Err(CurveError::bootstrap_failed(
                instrument.description(),
                format!("pillar {date} is not after the reference date {reference_date}"),
            ));
        }
        if i > 0 && instruments[i - 1].pillar_date() == date {
            return Err(CurveError::bootstrap_failed(
                instrument.description(),
                format!(
                    "pillar {date} is already set by {}",
                    instruments[i - 1].description()
                ),
            ));
        }
        times.push(reference_date.days_between(&date) as f64 / DAYS_PER_YEAR);
    }
    Ok(times)
}
