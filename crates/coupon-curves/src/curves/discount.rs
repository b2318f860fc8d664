//! Pillar-based discount curve.

use coupon_core::Date;
use coupon_math::extrapolation::{
    ExtrapolationMethod, Extrapolator, FlatExtrapolator, LinearExtrapolator, SmithWilson,
};
use coupon_math::interpolation::{
    CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator, MonotoneConvex,
};

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;
use crate::traits::{check_time, Curve};

/// Slack when comparing a query time to the last pillar.
const TIME_EPSILON: f64 = 1e-12;

/// An immutable discount curve defined by pillars.
///
/// Pillars are `(t, DF)` pairs with `t > 0`; the curve always has
/// `DF(0) = 1`. Between pillars the configured [`InterpolationMethod`]
/// applies, beyond the last pillar the [`ExtrapolationMethod`]. Interpolation
/// coefficients are computed once at construction.
///
/// Use [`DiscountCurveBuilder`](super::DiscountCurveBuilder) to assemble one.
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    reference_date: Date,
    times: Vec<f64>,
    dfs: Vec<f64>,
    zeros: Vec<f64>,
    interpolation: InterpolationMethod,
    extrapolation: ExtrapolationMethod,
    interpolant: Interpolant,
    tail: Tail,
}

#[derive(Debug, Clone)]
enum Interpolant {
    /// Single pillar under a zero-rate scheme.
    Flat(f64),
    Linear(LinearInterpolator),
    LogLinear(LogLinearInterpolator),
    Spline(CubicSpline),
    MonotoneConvex(MonotoneConvex),
}

#[derive(Debug, Clone)]
enum Tail {
    None,
    Flat,
    Linear,
    SmithWilson(SmithWilson),
}

impl DiscountCurve {
    /// Creates a curve from pillar times and discount factors.
    ///
    /// # Errors
    ///
    /// - [`CurveError::InsufficientPoints`] with no pillars
    /// - [`CurveError::NonMonotonicTenors`] if times are not strictly increasing
    /// - [`CurveError::InvalidInput`] for non-positive times or discount factors
    pub fn new(
        reference_date: Date,
        times: Vec<f64>,
        dfs: Vec<f64>,
        interpolation: InterpolationMethod,
        extrapolation: ExtrapolationMethod,
    ) -> CurveResult<Self> {
        validate_pillars(&times, &dfs)?;

        let zeros: Vec<f64> = times.iter().zip(&dfs).map(|(t, df)| -df.ln() / t).collect();
        let interpolant = Interpolant::build(interpolation, &times, &dfs, &zeros)?;
        let tail = Tail::build(extrapolation, &times, &dfs)?;

        Ok(Self {
            reference_date,
            times,
            dfs,
            zeros,
            interpolation,
            extrapolation,
            interpolant,
            tail,
        })
    }

    /// Creates a curve from continuously compounded zero rates.
    pub fn from_zero_rates(
        reference_date: Date,
        times: Vec<f64>,
        zero_rates: &[f64],
        interpolation: InterpolationMethod,
        extrapolation: ExtrapolationMethod,
    ) -> CurveResult<Self> {
        if times.len() != zero_rates.len() {
            return Err(CurveError::invalid_input(format!(
                "{} times but {} zero rates",
                times.len(),
                zero_rates.len()
            )));
        }
        let dfs = times
            .iter()
            .zip(zero_rates)
            .map(|(t, z)| (-z * t).exp())
            .collect();
        Self::new(reference_date, times, dfs, interpolation, extrapolation)
    }

    /// Pillar times in years.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Pillar discount factors.
    #[must_use]
    pub fn discount_factors(&self) -> &[f64] {
        &self.dfs
    }

    /// Pillar zero rates (continuous).
    #[must_use]
    pub fn zero_rates(&self) -> &[f64] {
        &self.zeros
    }

    /// `(t, DF)` pillar pairs.
    pub fn pillars(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.dfs.iter().copied())
    }

    /// Number of pillars (excluding the implicit `t = 0`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a curve has at least one pillar.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Interpolation scheme.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Extrapolation scheme.
    #[must_use]
    pub fn extrapolation(&self) -> ExtrapolationMethod {
        self.extrapolation
    }

    /// New curve with every pillar zero rate moved by `shift(t)`.
    ///
    /// Interpolation and extrapolation are rebuilt on the shifted pillars.
    pub fn with_shifted_zeros(&self, shift: impl Fn(f64) -> f64) -> CurveResult<Self> {
        let zeros: Vec<f64> = self
            .times
            .iter()
            .zip(&self.zeros)
            .map(|(&t, &z)| z + shift(t))
            .collect();
        Self::from_zero_rates(
            self.reference_date,
            self.times.clone(),
            &zeros,
            self.interpolation,
            self.extrapolation,
        )
    }

    /// New curve with all pillar zero rates moved by `bps` basis points.
    pub fn parallel_shift(&self, bps: f64) -> CurveResult<Self> {
        self.with_shifted_zeros(|_| bps / 10_000.0)
    }

    fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    fn last_zero(&self) -> f64 {
        self.zeros[self.zeros.len() - 1]
    }

    /// Zero rate (continuous) inside the pillar range.
    fn interior_zero(&self, t: f64) -> CurveResult<f64> {
        let first_zero = self.zeros[0];
        let z = match &self.interpolant {
            Interpolant::Flat(z) => *z,
            Interpolant::Linear(interp) if t >= self.times[0] => interp.interpolate(t)?,
            Interpolant::Spline(interp) if t >= self.times[0] => interp.interpolate(t)?,
            Interpolant::Linear(_) | Interpolant::Spline(_) => first_zero,
            Interpolant::LogLinear(interp) => {
                if t <= 0.0 {
                    -interp.log_slope(0.0)?
                } else {
                    -interp.interpolate(t)?.ln() / t
                }
            }
            Interpolant::MonotoneConvex(interp) => interp.interpolate(t)?,
        };
        Ok(z)
    }

    /// Slope of the zero rate at the last pillar.
    fn terminal_zero_slope(&self) -> CurveResult<f64> {
        let t = self.last_time();
        let slope = match &self.interpolant {
            Interpolant::Flat(_) => 0.0,
            Interpolant::Linear(interp) => interp.derivative(t)?,
            Interpolant::Spline(interp) => interp.derivative(t)?,
            Interpolant::LogLinear(interp) => {
                let forward = -interp.log_slope(t)?;
                (forward - self.last_zero()) / t
            }
            Interpolant::MonotoneConvex(interp) => interp.derivative(t)?,
        };
        Ok(slope)
    }

    fn extrapolated_zero(&self, t: f64) -> CurveResult<f64> {
        let last_t = self.last_time();
        let last_z = self.last_zero();
        let z = match &self.tail {
            Tail::None => return Err(CurveError::out_of_range(t, 0.0, last_t)),
            Tail::Flat => FlatExtrapolator.extrapolate(t, last_t, last_z, 0.0),
            Tail::Linear => {
                LinearExtrapolator.extrapolate(t, last_t, last_z, self.terminal_zero_slope()?)
            }
            Tail::SmithWilson(sw) => sw.extrapolate(t, last_t, last_z, 0.0),
        };
        Ok(z)
    }

    fn analytic_forward(&self, t: f64) -> CurveResult<f64> {
        let f = match &self.interpolant {
            Interpolant::Flat(z) => *z,
            Interpolant::Linear(_) | Interpolant::Spline(_) if t < self.times[0] => self.zeros[0],
            Interpolant::Linear(interp) => interp.interpolate(t)? + t * interp.derivative(t)?,
            Interpolant::Spline(interp) => interp.interpolate(t)? + t * interp.derivative(t)?,
            Interpolant::LogLinear(interp) => -interp.log_slope(t)?,
            Interpolant::MonotoneConvex(interp) => interp.forward_rate(t)?,
        };
        Ok(f)
    }
}

impl Curve for DiscountCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        if t == 0.0 {
            return Ok(1.0);
        }
        let z = if t <= self.last_time() + TIME_EPSILON {
            self.interior_zero(t.min(self.last_time()))?
        } else {
            self.extrapolated_zero(t)?
        };
        Ok((-z * t).exp())
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_time(&self) -> f64 {
        self.last_time()
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        if t < self.last_time() {
            return self.analytic_forward(t);
        }
        let h = 1e-4;
        let lo = t - h;
        let hi = t + h;
        let df_lo = self.discount_factor(lo)?;
        let df_hi = self.discount_factor(hi)?;
        Ok(-(df_hi.ln() - df_lo.ln()) / (hi - lo))
    }
}

impl Interpolant {
    fn build(
        method: InterpolationMethod,
        times: &[f64],
        dfs: &[f64],
        zeros: &[f64],
    ) -> CurveResult<Self> {
        let single = times.len() == 1;
        let interpolant = match method {
            InterpolationMethod::Linear | InterpolationMethod::CubicSpline if single => {
                Self::Flat(zeros[0])
            }
            InterpolationMethod::Linear => {
                Self::Linear(LinearInterpolator::new(times.to_vec(), zeros.to_vec())?)
            }
            InterpolationMethod::CubicSpline => {
                Self::Spline(CubicSpline::new(times.to_vec(), zeros.to_vec())?)
            }
            InterpolationMethod::LogLinear => {
                let mut xs = Vec::with_capacity(times.len() + 1);
                xs.push(0.0);
                xs.extend_from_slice(times);
                let mut ys = Vec::with_capacity(dfs.len() + 1);
                ys.push(1.0);
                ys.extend_from_slice(dfs);
                Self::LogLinear(LogLinearInterpolator::new(xs, ys)?)
            }
            InterpolationMethod::MonotoneConvex => {
                Self::MonotoneConvex(MonotoneConvex::new(times.to_vec(), zeros.to_vec())?)
            }
        };
        Ok(interpolant)
    }
}

impl Tail {
    fn build(method: ExtrapolationMethod, times: &[f64], dfs: &[f64]) -> CurveResult<Self> {
        let tail = match method {
            ExtrapolationMethod::None => Self::None,
            ExtrapolationMethod::Flat => Self::Flat,
            ExtrapolationMethod::Linear => Self::Linear,
            ExtrapolationMethod::SmithWilson { ufr, alpha, llp } => {
                let liquid = times.partition_point(|&t| t <= llp + TIME_EPSILON).max(1);
                Self::SmithWilson(SmithWilson::fit(
                    ufr,
                    alpha,
                    &times[..liquid],
                    &dfs[..liquid],
                )?)
            }
        };
        Ok(tail)
    }
}

fn validate_pillars(times: &[f64], dfs: &[f64]) -> CurveResult<()> {
    if times.is_empty() {
        return Err(CurveError::InsufficientPoints {
            required: 1,
            got: 0,
        });
    }
    if times.len() != dfs.len() {
        return Err(CurveError::invalid_input(format!(
            "{} times but {} discount factors",
            times.len(),
            dfs.len()
        )));
    }
    for (i, (&t, &df)) in times.iter().zip(dfs).enumerate() {
        if !(t.is_finite() && t > 0.0) {
            return Err(CurveError::invalid_input(format!(
                "pillar time must be positive and finite, got {t}"
            )));
        }
        if !(df.is_finite() && df > 0.0) {
            return Err(CurveError::invalid_input(format!(
                "discount factor at t={t} must be positive, got {df}"
            )));
        }
        if i > 0 && t <= times[i - 1] {
            return Err(CurveError::NonMonotonicTenors {
                index: i,
                prev: times[i - 1],
                current: t,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_core::Compounding;

    fn reference() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    fn sample(method: InterpolationMethod) -> DiscountCurve {
        DiscountCurve::from_zero_rates(
            reference(),
            vec![0.25, 1.0, 2.0, 5.0, 10.0],
            &[0.040, 0.042, 0.044, 0.046, 0.047],
            method,
            ExtrapolationMethod::Flat,
        )
        .unwrap()
    }

    const METHODS: [InterpolationMethod; 4] = [
        InterpolationMethod::Linear,
        InterpolationMethod::LogLinear,
        InterpolationMethod::CubicSpline,
        InterpolationMethod::MonotoneConvex,
    ];

    #[test]
    fn test_hits_pillars_for_every_scheme() {
        for method in METHODS {
            let curve = sample(method);
            assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
            for (t, df) in curve.pillars() {
                assert_relative_eq!(curve.discount_factor(t).unwrap(), df, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_discount_factors_decrease() {
        for method in METHODS {
            let curve = sample(method);
            let mut prev = 1.0;
            for k in 1..=240 {
                let df = curve.discount_factor(f64::from(k) * 0.05).unwrap();
                assert!(df < prev, "{method} not decreasing at step {k}");
                prev = df;
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        let curve = sample(InterpolationMethod::MonotoneConvex);
        assert!(matches!(
            curve.discount_factor(-0.01),
            Err(CurveError::OutOfRange { .. })
        ));
        assert!(curve.discount_factor(f64::INFINITY).is_err());

        let no_tail = DiscountCurve::from_zero_rates(
            reference(),
            vec![1.0, 2.0],
            &[0.03, 0.035],
            InterpolationMethod::Linear,
            ExtrapolationMethod::None,
        )
        .unwrap();
        assert!(no_tail.discount_factor(2.0).is_ok());
        assert!(matches!(
            no_tail.discount_factor(2.5),
            Err(CurveError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_flat_extrapolation_holds_zero() {
        let curve = sample(InterpolationMethod::LogLinear);
        let z = curve.zero_rate(30.0, Compounding::Continuous).unwrap();
        assert_relative_eq!(z, 0.047, epsilon = 1e-12);
    }

    #[test]
    fn test_smith_wilson_tail() {
        let curve = DiscountCurve::from_zero_rates(
            reference(),
            vec![1.0, 5.0, 10.0, 20.0],
            &[0.030, 0.033, 0.035, 0.036],
            InterpolationMethod::MonotoneConvex,
            ExtrapolationMethod::SmithWilson {
                ufr: 0.042,
                alpha: 0.1,
                llp: 20.0,
            },
        )
        .unwrap();
        let at_llp = curve.zero_rate(20.0, Compounding::Continuous).unwrap();
        assert_relative_eq!(at_llp, 0.036, epsilon = 1e-12);
        let long = curve.instantaneous_forward(150.0).unwrap();
        assert_relative_eq!(long, 0.042_f64.ln_1p(), epsilon = 1e-4);
    }

    #[test]
    fn test_log_linear_forwards_are_flat_between_pillars() {
        let curve = sample(InterpolationMethod::LogLinear);
        let f1 = curve.instantaneous_forward(2.5).unwrap();
        let f2 = curve.instantaneous_forward(4.5).unwrap();
        assert_relative_eq!(f1, f2, epsilon = 1e-12);
        assert_relative_eq!(f1, (0.046 * 5.0 - 0.044 * 2.0) / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_analytic_forward_matches_numeric() {
        for method in METHODS {
            let curve = sample(method);
            for t in [0.1, 0.7, 3.3, 7.5] {
                let h = 1e-5;
                let numeric = -(curve.discount_factor(t + h).unwrap().ln()
                    - curve.discount_factor(t - h).unwrap().ln())
                    / (2.0 * h);
                assert_relative_eq!(
                    curve.instantaneous_forward(t).unwrap(),
                    numeric,
                    epsilon = 1e-7
                );
            }
        }
    }

    #[test]
    fn test_parallel_shift() {
        let curve = sample(InterpolationMethod::MonotoneConvex);
        let shifted = curve.parallel_shift(10.0).unwrap();
        for t in [0.5, 3.0, 7.0] {
            let base = curve.zero_rate(t, Compounding::Continuous).unwrap();
            let bumped = shifted.zero_rate(t, Compounding::Continuous).unwrap();
            assert_relative_eq!(bumped - base, 0.001, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_bad_pillars() {
        let err = DiscountCurve::new(
            reference(),
            vec![1.0, 1.0],
            vec![0.97, 0.96],
            InterpolationMethod::Linear,
            ExtrapolationMethod::Flat,
        )
        .unwrap_err();
        assert!(matches!(err, CurveError::NonMonotonicTenors { index: 1, .. }));

        assert!(DiscountCurve::new(
            reference(),
            vec![1.0],
            vec![-0.5],
            InterpolationMethod::Linear,
            ExtrapolationMethod::Flat,
        )
        .is_err());
        assert!(DiscountCurve::new(
            reference(),
            vec![],
            vec![],
            InterpolationMethod::Linear,
            ExtrapolationMethod::Flat,
        )
        .is_err());
    }

    #[test]
    fn test_single_pillar() {
        for method in METHODS {
            let curve = DiscountCurve::from_zero_rates(
                reference(),
                vec![1.0],
                &[0.05],
                method,
                ExtrapolationMethod::Flat,
            )
            .unwrap();
            assert_relative_eq!(
                curve.discount_factor(0.5).unwrap(),
                (-0.025_f64).exp(),
                epsilon = 1e-14
            );
        }
    }
}
