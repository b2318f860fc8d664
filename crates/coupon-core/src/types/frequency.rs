//! Payment frequency and rate compounding conventions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Coupon payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Once per year.
    Annual,
    /// Twice per year.
    #[default]
    SemiAnnual,
    /// Four times per year.
    Quarterly,
    /// Twelve times per year.
    Monthly,
    /// No periodic coupons.
    Zero,
}

impl Frequency {
    /// Number of coupon periods per year (0 for zero-coupon).
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Zero => 0,
        }
    }

    /// Number of months between coupon dates (0 for zero-coupon).
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        match self {
            Frequency::Annual => 12,
            Frequency::SemiAnnual => 6,
            Frequency::Quarterly => 3,
            Frequency::Monthly => 1,
            Frequency::Zero => 0,
        }
    }

    /// Returns true for zero-coupon frequency.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Frequency::Zero)
    }

    /// Builds a frequency from a periods-per-year count.
    pub fn from_periods(periods: u32) -> Result<Self, CoreError> {
        match periods {
            0 => Ok(Frequency::Zero),
            1 => Ok(Frequency::Annual),
            2 => Ok(Frequency::SemiAnnual),
            4 => Ok(Frequency::Quarterly),
            12 => Ok(Frequency::Monthly),
            other => Err(CoreError::invalid_input(format!(
                "unsupported coupon frequency: {other} per year"
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Zero => "Zero Coupon",
        };
        write!(f, "{name}")
    }
}

/// Interest rate compounding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest: DF = 1 / (1 + r t).
    Simple,
    /// Annual compounding.
    Annual,
    /// Semi-annual compounding.
    #[default]
    SemiAnnual,
    /// Quarterly compounding.
    Quarterly,
    /// Monthly compounding.
    Monthly,
    /// Continuous compounding: DF = exp(-r t).
    Continuous,
}

impl Compounding {
    /// Periods per year for periodic conventions, `None` for simple and continuous.
    #[must_use]
    pub fn periods_per_year_opt(&self) -> Option<u32> {
        match self {
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
            Compounding::Simple | Compounding::Continuous => None,
        }
    }

    /// Discount factor for a rate over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        if t == 0.0 {
            return 1.0;
        }
        match self {
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            Compounding::Continuous => (-rate * t).exp(),
            periodic => {
                let n = f64::from(periodic.periods_per_year_opt().unwrap_or(1));
                (1.0 + rate / n).powf(-n * t)
            }
        }
    }

    /// Rate implied by a discount factor over `t` years.
    ///
    /// Returns 0 for `t == 0`; callers that need the short rate at zero
    /// should take a limit instead.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        match self {
            Compounding::Simple => (1.0 / df - 1.0) / t,
            Compounding::Continuous => -df.ln() / t,
            periodic => {
                let n = f64::from(periodic.periods_per_year_opt().unwrap_or(1));
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
        }
    }

    /// Converts a rate to another compounding convention over horizon `t`.
    #[must_use]
    pub fn convert_to(&self, rate: f64, target: Compounding, t: f64) -> f64 {
        if *self == target {
            return rate;
        }
        let horizon = if t > 0.0 { t } else { 1.0 };
        target.zero_rate(self.discount_factor(rate, horizon), horizon)
    }
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Annual => "Annual",
            Compounding::SemiAnnual => "Semi-Annual",
            Compounding::Quarterly => "Quarterly",
            Compounding::Monthly => "Monthly",
            Compounding::Continuous => "Continuous",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Compounding {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', '_', ' '], "").as_str() {
            "SIMPLE" => Ok(Compounding::Simple),
            "ANNUAL" => Ok(Compounding::Annual),
            "SEMIANNUAL" => Ok(Compounding::SemiAnnual),
            "QUARTERLY" => Ok(Compounding::Quarterly),
            "MONTHLY" => Ok(Compounding::Monthly),
            "CONTINUOUS" => Ok(Compounding::Continuous),
            _ => Err(CoreError::unknown_convention(s)),
        }
    }
}

impl From<Frequency> for Compounding {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Annual => Compounding::Annual,
            Frequency::SemiAnnual => Compounding::SemiAnnual,
            Frequency::Quarterly => Compounding::Quarterly,
            Frequency::Monthly => Compounding::Monthly,
            Frequency::Zero => Compounding::Annual,
        }
    }
}
