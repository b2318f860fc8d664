//! The [`Curve`] trait shared by every discounting term structure.

use coupon_core::{Compounding, Date};

use crate::error::{CurveError, CurveResult};

/// Step for numerical instantaneous forwards, in years.
const FORWARD_STEP: f64 = 1e-4;

/// Days per year for date to time conversion (ACT/365F).
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A discounting term structure.
///
/// Implementors provide discount factors by time from the reference date;
/// rates and date-based queries are derived. Times are measured ACT/365F.
///
/// Every query rejects negative or non-finite times with
/// [`CurveError::OutOfRange`].
pub trait Curve: Send + Sync {
    /// Discount factor for `t` years from the reference date.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Valuation date.
    fn reference_date(&self) -> Date;

    /// Last time backed by market data.
    fn max_time(&self) -> f64;

    /// Zero rate at `t` with the given compounding.
    ///
    /// At `t = 0` the limit (the short rate) is returned.
    fn zero_rate(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        check_time(t)?;
        if t < FORWARD_STEP {
            let short = self.instantaneous_forward(0.0)?;
            return Ok(Compounding::Continuous.convert_to(short, compounding, FORWARD_STEP));
        }
        let df = self.discount_factor(t)?;
        Ok(compounding.zero_rate(df, t))
    }

    /// Simply compounded forward rate `(DF(t1)/DF(t2) - 1) / (t2 - t1)`.
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Err(CurveError::invalid_input(format!(
                "forward period must be positive, got [{t1}, {t2}]"
            )));
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }

    /// Instantaneous forward `-d ln DF / dt`.
    ///
    /// The default uses a central difference, one-sided near zero.
    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        check_time(t)?;
        let lo = (t - FORWARD_STEP).max(0.0);
        let hi = t + FORWARD_STEP;
        let df_lo = self.discount_factor(lo)?;
        let df_hi = self.discount_factor(hi)?;
        Ok(-(df_hi.ln() - df_lo.ln()) / (hi - lo))
    }

    /// Years from the reference date to `date` (ACT/365F).
    fn year_fraction(&self, date: Date) -> f64 {
        self.reference_date().days_between(&date) as f64 / DAYS_PER_YEAR
    }

    /// Discount factor for a date.
    fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor(self.year_fraction(date))
    }

    /// Zero rate for a date.
    fn zero_rate_at(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        self.zero_rate(self.year_fraction(date), compounding)
    }

    /// Simple forward rate between two dates.
    fn forward_rate_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.forward_rate(self.year_fraction(start), self.year_fraction(end))
    }
}

/// Rejects negative and non-finite times.
pub(crate) fn check_time(t: f64) -> CurveResult<()> {
    if t.is_finite() && t >= 0.0 {
        Ok(())
    } else {
        Err(CurveError::out_of_range(t, 0.0, f64::INFINITY))
    }
}

impl<C: Curve + ?Sized> Curve for &C {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        (**self).discount_factor(t)
    }

    fn reference_date(&self) -> Date {
        (**self).reference_date()
    }

    fn max_time(&self) -> f64 {
        (**self).max_time()
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        (**self).instantaneous_forward(t)
    }
}

impl<C: Curve + ?Sized> Curve for Box<C> {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        (**self).discount_factor(t)
    }

    fn reference_date(&self) -> Date {
        (**self).reference_date()
    }

    fn max_time(&self) -> f64 {
        (**self).max_time()
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        (**self).instantaneous_forward(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Flat {
        rate: f64,
    }

    impl Curve for Flat {
        fn discount_factor(&self, t: f64) -> CurveResult<f64> {
            check_time(t)?;
            Ok((-self.rate * t).exp())
        }

        fn reference_date(&self) -> Date {
            Date::from_ymd(2025, 1, 2).unwrap()
        }

        fn max_time(&self) -> f64 {
            f64::INFINITY
        }
    }

    #[test]
    fn test_derived_rates() {
        let curve = Flat { rate: 0.05 };
        assert_relative_eq!(
            curve.zero_rate(2.0, Compounding::Continuous).unwrap(),
            0.05,
            epsilon = 1e-14
        );
        assert_relative_eq!(
            curve.zero_rate(2.0, Compounding::Annual).unwrap(),
            0.05_f64.exp_m1(),
            epsilon = 1e-12
        );
        assert_relative_eq!(curve.instantaneous_forward(3.0).unwrap(), 0.05, epsilon = 1e-9);
        assert_relative_eq!(
            curve.zero_rate(0.0, Compounding::Continuous).unwrap(),
            0.05,
            epsilon = 1e-9
        );
        let fwd = curve.forward_rate(1.0, 2.0).unwrap();
        assert_relative_eq!(fwd, 0.05_f64.exp_m1(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_queries() {
        let curve = Flat { rate: 0.05 };
        assert!(matches!(
            curve.discount_factor(-0.5),
            Err(CurveError::OutOfRange { .. })
        ));
        assert!(curve.discount_factor(f64::NAN).is_err());
        assert!(curve.forward_rate(2.0, 1.0).is_err());
    }

    #[test]
    fn test_date_queries() {
        let curve = Flat { rate: 0.05 };
        let one_year = Date::from_ymd(2026, 1, 2).unwrap();
        assert_relative_eq!(curve.year_fraction(one_year), 1.0);
        assert_relative_eq!(
            curve.discount_factor_at(one_year).unwrap(),
            (-0.05_f64).exp(),
            epsilon = 1e-15
        );
    }
}
