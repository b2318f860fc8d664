//! Post-build curve validation.
//!
//! Every bootstrapped curve is checked before it is handed out:
//!
//! - each input instrument reprices within tolerance (always on)
//! - discount factors decrease strictly across the pillars
//! - the instantaneous forward is non-negative on a fine grid
//! - midpoint forwards do not zigzag across consecutive segments
//!
//! All four checks run by default. The shape checks can be switched off in
//! [`ValidationConfig`], which is a deliberate relaxation for markets with
//! negative rates; repricing cannot be disabled.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::instruments::CurveInstrument;
use crate::traits::Curve;

/// Forward values below this count as negative.
const FORWARD_FLOOR: f64 = -1e-12;

/// Settings for [`validate_curve`].
///
/// The default enables every check. Each `check_*` switch is an explicit
/// opt-out: in a negative-rate market discount factors above one and
/// negative forwards are legitimate, so
/// [`allow_negative_rates`](Self::allow_negative_rates) drops exactly those
/// two checks and keeps the smoothness check. A missing field deserializes
/// to its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum `|PV| / notional` for an input instrument.
    #[serde(default = "default_repricing_tolerance")]
    pub repricing_tolerance: f64,
    /// Require strictly decreasing discount factors at the pillars.
    #[serde(default = "enabled")]
    pub check_monotonic: bool,
    /// Require non-negative instantaneous forwards.
    #[serde(default = "enabled")]
    pub check_forwards: bool,
    /// Grid step for the forward check, in years.
    #[serde(default = "default_forward_grid_step")]
    pub forward_grid_step: f64,
    /// Reject zigzagging forwards.
    #[serde(default = "enabled")]
    pub check_smoothness: bool,
    /// Smallest midpoint forward jump that counts toward a zigzag.
    #[serde(default = "default_smoothness_threshold")]
    pub smoothness_threshold: f64,
}

fn default_repricing_tolerance() -> f64 {
    1e-8
}

fn enabled() -> bool {
    true
}

fn default_forward_grid_step() -> f64 {
    1.0 / 52.0
}

fn default_smoothness_threshold() -> f64 {
    0.0025
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            repricing_tolerance: default_repricing_tolerance(),
            check_monotonic: true,
            check_forwards: true,
            forward_grid_step: default_forward_grid_step(),
            check_smoothness: true,
            smoothness_threshold: default_smoothness_threshold(),
        }
    }
}

impl ValidationConfig {
    /// Repricing only; no shape checks.
    #[must_use]
    pub fn repricing_only() -> Self {
        Self {
            check_monotonic: false,
            check_forwards: false,
            check_smoothness: false,
            ..Self::default()
        }
    }

    /// Sets the repricing tolerance.
    #[must_use]
    pub fn with_repricing_tolerance(mut self, tolerance: f64) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }

    /// Allows negative forwards and non-monotonic discount factors.
    ///
    /// Repricing and the smoothness check still apply.
    #[must_use]
    pub fn allow_negative_rates(mut self) -> Self {
        self.check_forwards = false;
        self.check_monotonic = false;
        self
    }
}

/// One violated check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    /// An input does not reprice.
    Repricing {
        /// Instrument description.
        instrument: String,
        /// `|PV| / notional`.
        error: f64,
    },
    /// Discount factor fails to decrease.
    NonDecreasingDiscount {
        /// Pillar time.
        tenor: f64,
        /// Discount factor at the previous pillar.
        previous: f64,
        /// Discount factor here.
        current: f64,
    },
    /// Negative instantaneous forward.
    NegativeForward {
        /// First grid time with a negative forward.
        tenor: f64,
        /// The forward there.
        forward: f64,
    },
    /// Forwards alternate direction across consecutive segments.
    Oscillation {
        /// Midpoint of the segment at the centre of the zigzag.
        tenor: f64,
        /// Smallest jump in the zigzag.
        amplitude: f64,
    },
}

impl ValidationFailure {
    /// The offending instrument or tenor.
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::Repricing { instrument, .. } => instrument.clone(),
            Self::NonDecreasingDiscount { tenor, .. }
            | Self::NegativeForward { tenor, .. }
            | Self::Oscillation { tenor, .. } => format!("t={tenor:.4}y"),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repricing { instrument, error } => {
                write!(f, "{instrument} reprices with error {error:.3e}")
            }
            Self::NonDecreasingDiscount {
                tenor,
                previous,
                current,
            } => write!(
                f,
                "discount factor {current:.10} at t={tenor:.4} is not below {previous:.10}"
            ),
            Self::NegativeForward { tenor, forward } => {
                write!(f, "negative forward {forward:.6} at t={tenor:.4}")
            }
            Self::Oscillation { tenor, amplitude } => {
                write!(f, "forward oscillation of {amplitude:.6} around t={tenor:.4}")
            }
        }
    }
}

/// Outcome of [`validate_curve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    failures: Vec<ValidationFailure>,
    max_repricing_error: f64,
}

impl ValidationReport {
    /// True when no check failed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failures, in check order.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Largest `|PV| / notional` across the inputs.
    #[must_use]
    pub fn max_repricing_error(&self) -> f64 {
        self.max_repricing_error
    }

    /// Converts a failing report into [`CurveError::ValidationFailed`].
    pub fn into_result(self) -> CurveResult<Self> {
        let Some(first) = self.failures.first() else {
            return Ok(self);
        };
        for failure in &self.failures {
            warn!("curve validation: {failure}");
        }
        Err(CurveError::ValidationFailed {
            subject: first.subject(),
            reason: first.to_string(),
            failures: self.failures.len(),
        })
    }
}

/// Runs every enabled check on `curve` against the instruments it was
/// built from.
pub fn validate_curve(
    curve: &dyn Curve,
    instruments: &[Box<dyn CurveInstrument>],
    config: &ValidationConfig,
) -> CurveResult<ValidationReport> {
    let mut report = ValidationReport::default();

    for instrument in instruments {
        let error = instrument.pv(curve)?.abs() / instrument.notional().abs().max(f64::MIN_POSITIVE);
        report.max_repricing_error = report.max_repricing_error.max(error);
        if !(error <= config.repricing_tolerance) {
            report.failures.push(ValidationFailure::Repricing {
                instrument: instrument.description(),
                error,
            });
        }
    }

    let mut pillars: Vec<f64> = instruments
        .iter()
        .map(|i| curve.year_fraction(i.pillar_date()))
        .filter(|t| *t > 0.0)
        .collect();
    pillars.sort_by(f64::total_cmp);
    pillars.dedup();

    if config.check_monotonic {
        check_monotonic(curve, &pillars, &mut report.failures)?;
    }
    if config.check_forwards {
        if let Some(&last) = pillars.last() {
            check_forwards(curve, last, config.forward_grid_step, &mut report.failures)?;
        }
    }
    if config.check_smoothness {
        check_smoothness(curve, &pillars, config.smoothness_threshold, &mut report.failures)?;
    }

    Ok(report)
}

fn check_monotonic(
    curve: &dyn Curve,
    pillars: &[f64],
    failures: &mut Vec<ValidationFailure>,
) -> CurveResult<()> {
    let mut previous = 1.0;
    for &t in pillars {
        let current = curve.discount_factor(t)?;
        if current >= previous {
            failures.push(ValidationFailure::NonDecreasingDiscount {
                tenor: t,
                previous,
                current,
            });
        }
        previous = current;
    }
    Ok(())
}

fn check_forwards(
    curve: &dyn Curve,
    last: f64,
    step: f64,
    failures: &mut Vec<ValidationFailure>,
) -> CurveResult<()> {
    if !(step > 0.0) {
        return Err(CurveError::invalid_input(format!(
            "forward grid step must be positive, got {step}"
        )));
    }
    let steps = (last / step).ceil() as usize;
    for k in 0..=steps {
        let t = (k as f64 * step).min(last);
        let forward = curve.instantaneous_forward(t)?;
        if forward < FORWARD_FLOOR {
            failures.push(ValidationFailure::NegativeForward { tenor: t, forward });
            break;
        }
    }
    Ok(())
}

fn check_smoothness(
    curve: &dyn Curve,
    pillars: &[f64],
    threshold: f64,
    failures: &mut Vec<ValidationFailure>,
) -> CurveResult<()> {
    let mut midpoints = Vec::with_capacity(pillars.len());
    let mut forwards = Vec::with_capacity(pillars.len());
    let mut start = 0.0;
    for &end in pillars {
        let mid = 0.5 * (start + end);
        midpoints.push(mid);
        forwards.push(curve.instantaneous_forward(mid)?);
        start = end;
    }

    let jumps: Vec<f64> = forwards.windows(2).map(|w| w[1] - w[0]).collect();
    for (i, w) in jumps.windows(3).enumerate() {
        let alternating = w[0] * w[1] < 0.0 && w[1] * w[2] < 0.0;
        let amplitude = w.iter().fold(f64::INFINITY, |m, d| m.min(d.abs()));
        if alternating && amplitude > threshold {
            failures.push(ValidationFailure::Oscillation {
                tenor: midpoints[i + 1],
                amplitude,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use crate::instruments::Deposit;
    use crate::interpolation::InterpolationMethod;
    use coupon_core::Date;

    fn today() -> Date {
        Date::from_ymd(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_clean_curve_passes() {
        let curve = DiscountCurveBuilder::new(today())
            .add_zero_rate(1.0, 0.04)
            .add_zero_rate(5.0, 0.042)
            .build()
            .unwrap();
        let report = validate_curve(&curve, &[], &ValidationConfig::default()).unwrap();
        assert!(report.is_valid());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_shape_checks_on_unless_relaxed() {
        let strict = ValidationConfig::default();
        assert!(strict.check_monotonic && strict.check_forwards && strict.check_smoothness);

        let relaxed = ValidationConfig::default().allow_negative_rates();
        assert!(!relaxed.check_monotonic && !relaxed.check_forwards);
        assert!(relaxed.check_smoothness);
        assert_eq!(relaxed.repricing_tolerance, strict.repricing_tolerance);

        let parsed: ValidationConfig = serde_json::from_str(r#"{"check_forwards": false}"#).unwrap();
        assert!(!parsed.check_forwards);
        assert!(parsed.check_monotonic && parsed.check_smoothness);
    }

    #[test]
    fn test_repricing_failure_names_instrument() {
        let curve = DiscountCurveBuilder::new(today())
            .add_zero_rate(2.0, 0.04)
            .build()
            .unwrap();
        let deposit: Box<dyn CurveInstrument> =
            Box::new(Deposit::from_tenor(today(), "1Y", 0.06).unwrap());
        let report = validate_curve(&curve, &[deposit], &ValidationConfig::default()).unwrap();
        assert!(!report.is_valid());
        assert!(report.max_repricing_error() > 1e-3);

        let err = report.into_result().unwrap_err();
        match err {
            CurveError::ValidationFailed { subject, failures, .. } => {
                assert!(subject.starts_with("Deposit"));
                assert_eq!(failures, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_negative_forward_detected() {
        let curve = DiscountCurveBuilder::new(today())
            .add_pillar(1.0, 0.96)
            .add_pillar(2.0, 0.965)
            .add_pillar(3.0, 0.93)
            .with_interpolation(InterpolationMethod::LogLinear)
            .build()
            .unwrap();
        let deposits: Vec<Box<dyn CurveInstrument>> = ["1Y", "2Y", "3Y"]
            .iter()
            .map(|tenor| {
                Box::new(Deposit::from_tenor(today(), tenor, 0.0).unwrap())
                    as Box<dyn CurveInstrument>
            })
            .collect();
        let config = ValidationConfig::default().with_repricing_tolerance(1.0);
        let report = validate_curve(&curve, &deposits, &config).unwrap();
        assert!(report
            .failures()
            .iter()
            .any(|f| matches!(f, ValidationFailure::NonDecreasingDiscount { .. })));
        assert!(report
            .failures()
            .iter()
            .any(|f| matches!(f, ValidationFailure::NegativeForward { .. })));

        let relaxed = config.allow_negative_rates();
        assert!(validate_curve(&curve, &deposits, &relaxed).unwrap().is_valid());
    }

    #[test]
    fn test_zigzag_detected() {
        let curve = DiscountCurveBuilder::new(today())
            .add_zero_rate(1.0, 0.03)
            .add_zero_rate(2.0, 0.05)
            .add_zero_rate(3.0, 0.03)
            .add_zero_rate(4.0, 0.05)
            .add_zero_rate(5.0, 0.035)
            .with_interpolation(InterpolationMethod::LogLinear)
            .build()
            .unwrap();
        let mut failures = Vec::new();
        check_smoothness(&curve, &[1.0, 2.0, 3.0, 4.0, 5.0], 0.0025, &mut failures).unwrap();
        assert!(!failures.is_empty());
        assert!(matches!(failures[0], ValidationFailure::Oscillation { .. }));
    }
}
