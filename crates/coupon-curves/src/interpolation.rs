//! Interpolation choice for pillar curves.

use serde::{Deserialize, Serialize};

/// How a [`DiscountCurve`](crate::DiscountCurve) fills in between pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Linear on continuously compounded zero rates.
    Linear,

    /// Linear on log discount factors (piecewise flat forwards).
    LogLinear,

    /// Natural cubic spline on zero rates.
    CubicSpline,

    /// Hagan-West monotone convex on zero rates.
    #[default]
    MonotoneConvex,
}

impl InterpolationMethod {
    /// True if moving one pillar changes the curve only on adjacent segments.
    ///
    /// Sequential bootstrap needs extra passes for non-local schemes.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Linear | Self::LogLinear)
    }

    /// True for schemes with a continuous forward curve.
    #[must_use]
    pub fn is_smooth(&self) -> bool {
        matches!(self, Self::CubicSpline | Self::MonotoneConvex)
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "Log-Linear",
            Self::CubicSpline => "Cubic Spline",
            Self::MonotoneConvex => "Monotone Convex",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_locality() {
        assert_eq!(InterpolationMethod::default(), InterpolationMethod::MonotoneConvex);
        assert!(InterpolationMethod::LogLinear.is_local());
        assert!(!InterpolationMethod::CubicSpline.is_local());
        assert_eq!(InterpolationMethod::LogLinear.to_string(), "Log-Linear");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&InterpolationMethod::CubicSpline).unwrap();
        let back: InterpolationMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InterpolationMethod::CubicSpline);
    }
}
