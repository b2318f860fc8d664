//! Curves backed by Nelson-Siegel and Svensson models.

use coupon_core::Date;
use coupon_math::interpolation::{NelsonSiegel, Svensson};

use crate::error::CurveResult;
use crate::traits::{check_time, Curve};

/// A Nelson-Siegel zero curve anchored at a reference date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelsonSiegelCurve {
    reference_date: Date,
    model: NelsonSiegel,
    max_time: f64,
}

impl NelsonSiegelCurve {
    /// Wraps a fitted model. `max_time` is the longest fitted maturity.
    #[must_use]
    pub fn new(reference_date: Date, model: NelsonSiegel, max_time: f64) -> Self {
        Self {
            reference_date,
            model,
            max_time,
        }
    }

    /// The underlying model.
    #[must_use]
    pub fn model(&self) -> &NelsonSiegel {
        &self.model
    }
}

impl Curve for NelsonSiegelCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok(self.model.discount_factor(t))
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_time(&self) -> f64 {
        self.max_time
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok(self.model.forward_rate(t))
    }
}

/// A Svensson zero curve anchored at a reference date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvenssonCurve {
    reference_date: Date,
    model: Svensson,
    max_time: f64,
}

impl SvenssonCurve {
    /// Wraps a fitted model.
    #[must_use]
    pub fn new(reference_date: Date, model: Svensson, max_time: f64) -> Self {
        Self {
            reference_date,
            model,
            max_time,
        }
    }

    /// The underlying model.
    #[must_use]
    pub fn model(&self) -> &Svensson {
        &self.model
    }
}

impl Curve for SvenssonCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok(self.model.discount_factor(t))
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_time(&self) -> f64 {
        self.max_time
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        Ok(self.model.forward_rate(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_core::Compounding;

    #[test]
    fn test_nelson_siegel_curve() {
        let model = NelsonSiegel::new(0.05, -0.02, 0.01, 2.0).unwrap();
        let curve = NelsonSiegelCurve::new(Date::from_ymd(2025, 1, 2).unwrap(), model, 30.0);
        assert_relative_eq!(
            curve.zero_rate(5.0, Compounding::Continuous).unwrap(),
            model.zero_rate(5.0),
            epsilon = 1e-14
        );
        assert_relative_eq!(curve.instantaneous_forward(0.0).unwrap(), 0.03);
        assert!(curve.discount_factor(-1.0).is_err());
    }

    #[test]
    fn test_svensson_curve() {
        let model = Svensson::new(0.05, -0.02, 0.01, 0.005, 2.0, 8.0).unwrap();
        let curve = SvenssonCurve::new(Date::from_ymd(2025, 1, 2).unwrap(), model, 30.0);
        assert_relative_eq!(
            curve.discount_factor(10.0).unwrap(),
            model.discount_factor(10.0),
            epsilon = 1e-15
        );
        assert_eq!(curve.max_time(), 30.0);
    }
}
