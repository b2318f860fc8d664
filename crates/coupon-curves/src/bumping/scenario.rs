//! Scenarios made of several simultaneous bumps.

use serde::{Deserialize, Serialize};

use super::{CurveShift, KeyRateBump, ShiftedCurve, BP};
use crate::traits::Curve;

/// One component of a [`Scenario`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScenarioBump {
    /// Constant shift.
    Parallel {
        /// Shift in basis points.
        shift_bps: f64,
    },
    /// `short_bps` up to `short_tenor`, `long_bps` from `long_tenor`,
    /// linear in between.
    Twist {
        /// Shift at the short end in basis points.
        short_bps: f64,
        /// Shift at the long end in basis points.
        long_bps: f64,
        /// End of the short segment in years.
        short_tenor: f64,
        /// Start of the long segment in years.
        long_tenor: f64,
    },
    /// Triangular shift around a standard key tenor.
    KeyRate {
        /// Key tenor in years.
        tenor: f64,
        /// Shift in basis points.
        shift_bps: f64,
    },
}

impl ScenarioBump {
    /// Constant shift.
    #[must_use]
    pub fn parallel(shift_bps: f64) -> Self {
        Self::Parallel { shift_bps }
    }

    /// Short end down by `amount_bps / 2` and long end up by the same,
    /// pivoting between 2Y and 10Y.
    #[must_use]
    pub fn steepener(amount_bps: f64) -> Self {
        Self::Twist {
            short_bps: -amount_bps / 2.0,
            long_bps: amount_bps / 2.0,
            short_tenor: 2.0,
            long_tenor: 10.0,
        }
    }

    /// The reverse of [`steepener`](Self::steepener).
    #[must_use]
    pub fn flattener(amount_bps: f64) -> Self {
        Self::steepener(-amount_bps)
    }

    /// Triangular shift at a key tenor.
    #[must_use]
    pub fn key_rate(tenor: f64, shift_bps: f64) -> Self {
        Self::KeyRate { tenor, shift_bps }
    }

    /// Shift at `t` in basis points.
    #[must_use]
    pub fn shift_bps_at(&self, t: f64) -> f64 {
        match *self {
            Self::Parallel { shift_bps } => shift_bps,
            Self::Twist {
                short_bps,
                long_bps,
                short_tenor,
                long_tenor,
            } => {
                if t <= short_tenor {
                    short_bps
                } else if t >= long_tenor {
                    long_bps
                } else {
                    let w = (t - short_tenor) / (long_tenor - short_tenor);
                    short_bps + w * (long_bps - short_bps)
                }
            }
            Self::KeyRate { tenor, shift_bps } => {
                KeyRateBump::new(tenor, shift_bps).weight_at(t) * shift_bps
            }
        }
    }

    fn slope_bps_at(&self, t: f64) -> f64 {
        match *self {
            Self::Parallel { .. } => 0.0,
            Self::Twist {
                short_bps,
                long_bps,
                short_tenor,
                long_tenor,
            } => {
                if t > short_tenor && t < long_tenor {
                    (long_bps - short_bps) / (long_tenor - short_tenor)
                } else {
                    0.0
                }
            }
            Self::KeyRate { tenor, shift_bps } => {
                KeyRateBump::new(tenor, shift_bps).slope_at(t) * BP
            }
        }
    }
}

/// A named set of bumps applied together.
///
/// ```rust
/// use coupon_curves::bumping::{Scenario, ScenarioBump};
///
/// let scenario = Scenario::new("bear steepener")
///     .with_bump(ScenarioBump::parallel(50.0))
///     .with_bump(ScenarioBump::steepener(40.0));
/// assert_eq!(scenario.total_shift_bps_at(1.0), 30.0);
/// assert_eq!(scenario.total_shift_bps_at(30.0), 70.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    bumps: Vec<ScenarioBump>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bumps: Vec::new(),
        }
    }

    /// Adds a bump.
    #[must_use]
    pub fn with_bump(mut self, bump: ScenarioBump) -> Self {
        self.bumps.push(bump);
        self
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components.
    #[must_use]
    pub fn bumps(&self) -> &[ScenarioBump] {
        &self.bumps
    }

    /// Combined shift at `t` in basis points.
    #[must_use]
    pub fn total_shift_bps_at(&self, t: f64) -> f64 {
        self.bumps.iter().map(|b| b.shift_bps_at(t)).sum()
    }

    /// Lays the scenario over `curve`. Pass `&curve` to borrow.
    #[must_use]
    pub fn apply<C: Curve>(self, curve: C) -> ShiftedCurve<C, Self> {
        ShiftedCurve::new(curve, self)
    }
}

impl CurveShift for Scenario {
    fn shift_at(&self, t: f64) -> f64 {
        self.total_shift_bps_at(t) / BP
    }

    fn slope_at(&self, t: f64) -> f64 {
        self.bumps.iter().map(|b| b.slope_bps_at(t)).sum::<f64>() / BP
    }
}

/// Common stress scenarios.
pub mod presets {
    use super::{Scenario, ScenarioBump};

    /// Rates +100bp.
    #[must_use]
    pub fn parallel_up_100bp() -> Scenario {
        Scenario::new("Parallel +100bp").with_bump(ScenarioBump::parallel(100.0))
    }

    /// Rates −100bp.
    #[must_use]
    pub fn parallel_down_100bp() -> Scenario {
        Scenario::new("Parallel -100bp").with_bump(ScenarioBump::parallel(-100.0))
    }

    /// 2s10s steeper by 50bp.
    #[must_use]
    pub fn steepener_50bp() -> Scenario {
        Scenario::new("Steepener 50bp").with_bump(ScenarioBump::steepener(50.0))
    }

    /// 2s10s flatter by 50bp.
    #[must_use]
    pub fn flattener_50bp() -> Scenario {
        Scenario::new("Flattener 50bp").with_bump(ScenarioBump::flattener(50.0))
    }

    /// All of the above.
    #[must_use]
    pub fn standard() -> Vec<Scenario> {
        vec![
            parallel_up_100bp(),
            parallel_down_100bp(),
            steepener_50bp(),
            flattener_50bp(),
        ]
    }
}
