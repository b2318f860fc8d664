//! Fluent construction of [`DiscountCurve`]s.

use coupon_core::Date;
use coupon_math::extrapolation::ExtrapolationMethod;

use super::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;
use crate::traits::DAYS_PER_YEAR;

#[derive(Debug, Clone, Copy)]
enum PillarValue {
    DiscountFactor(f64),
    ZeroRate(f64),
}

/// Builder for [`DiscountCurve`].
///
/// Pillars may be added in any order and mixed between discount factors and
/// continuous zero rates; they are sorted on [`build`](Self::build). A pillar
/// at `t = 0` is accepted only with a discount factor of one and is dropped.
///
/// ```rust
/// use coupon_core::Date;
/// use coupon_curves::prelude::*;
///
/// let curve = DiscountCurveBuilder::new(Date::from_ymd(2025, 1, 2).unwrap())
///     .add_pillar(1.0, 0.96)
///     .add_zero_rate(2.0, 0.04)
///     .with_interpolation(InterpolationMethod::LogLinear)
///     .build()
///     .unwrap();
/// assert!((curve.discount_factor(1.0).unwrap() - 0.96).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct DiscountCurveBuilder {
    reference_date: Date,
    points: Vec<(f64, PillarValue)>,
    interpolation: InterpolationMethod,
    extrapolation: ExtrapolationMethod,
}

impl DiscountCurveBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            points: Vec::new(),
            interpolation: InterpolationMethod::default(),
            extrapolation: ExtrapolationMethod::default(),
        }
    }

    /// Adds a discount factor pillar at `t` years.
    #[must_use]
    pub fn add_pillar(mut self, t: f64, df: f64) -> Self {
        self.points.push((t, PillarValue::DiscountFactor(df)));
        self
    }

    /// Adds a discount factor pillar at a date (ACT/365F from the reference).
    #[must_use]
    pub fn add_pillar_at(self, date: Date, df: f64) -> Self {
        let t = self.reference_date.days_between(&date) as f64 / DAYS_PER_YEAR;
        self.add_pillar(t, df)
    }

    /// Adds a continuously compounded zero rate pillar.
    #[must_use]
    pub fn add_zero_rate(mut self, t: f64, rate: f64) -> Self {
        self.points.push((t, PillarValue::ZeroRate(rate)));
        self
    }

    /// Sets the interpolation scheme.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.interpolation = method;
        self
    }

    /// Sets the extrapolation scheme.
    #[must_use]
    pub fn with_extrapolation(mut self, method: ExtrapolationMethod) -> Self {
        self.extrapolation = method;
        self
    }

    /// Builds the curve.
    pub fn build(self) -> CurveResult<DiscountCurve> {
        let mut pillars = Vec::with_capacity(self.points.len());
        for (t, value) in self.points {
            let df = match value {
                PillarValue::DiscountFactor(df) => df,
                PillarValue::ZeroRate(z) => (-z * t).exp(),
            };
            if t == 0.0 {
                if (df - 1.0).abs() > 1e-12 {
                    return Err(CurveError::invalid_input(format!(
                        "discount factor at t=0 must be 1, got {df}"
                    )));
                }
                continue;
            }
            pillars.push((t, df));
        }
        pillars.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (times, dfs) = pillars.into_iter().unzip();

        DiscountCurve::new(
            self.reference_date,
            times,
            dfs,
            self.interpolation,
            self.extrapolation,
        )
    }
}
