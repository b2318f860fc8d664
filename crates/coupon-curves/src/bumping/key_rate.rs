//! Key-rate bumping.
//!
//! Each key tenor carries a triangular weight: one at the tenor, falling
//! linearly to zero at its neighbours. The first and last weights stay at
//! one beyond the end tenors, so the weights of a full set sum to one at
//! every maturity.

use super::{CurveShift, ShiftedCurve, BP};
use crate::traits::Curve;

/// Standard key-rate tenors in years.
pub const STANDARD_KEY_TENORS: &[f64] = &[
    0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 25.0, 30.0,
];

/// A triangular shift centred on one key tenor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyRateBump {
    key_tenor: f64,
    shift_bps: f64,
    left_tenor: Option<f64>,
    right_tenor: Option<f64>,
}

impl KeyRateBump {
    /// Bump at `key_tenor` with neighbours taken from
    /// [`STANDARD_KEY_TENORS`].
    #[must_use]
    pub fn new(key_tenor: f64, shift_bps: f64) -> Self {
        let left = STANDARD_KEY_TENORS
            .iter()
            .rev()
            .find(|&&k| k < key_tenor)
            .copied();
        let right = STANDARD_KEY_TENORS.iter().find(|&&k| k > key_tenor).copied();
        Self::with_neighbors(key_tenor, shift_bps, left, right)
    }

    /// Bump with explicit neighbours; `None` keeps the weight at one on
    /// that side.
    #[must_use]
    pub fn with_neighbors(
        key_tenor: f64,
        shift_bps: f64,
        left_tenor: Option<f64>,
        right_tenor: Option<f64>,
    ) -> Self {
        Self {
            key_tenor,
            shift_bps,
            left_tenor,
            right_tenor,
        }
    }

    /// Key tenor in years.
    #[must_use]
    pub fn key_tenor(&self) -> f64 {
        self.key_tenor
    }

    /// Shift in basis points at the key tenor.
    #[must_use]
    pub fn shift_bps(&self) -> f64 {
        self.shift_bps
    }

    /// Weight of the bump at `t`, in `[0, 1]`.
    #[must_use]
    pub fn weight_at(&self, t: f64) -> f64 {
        if t <= self.key_tenor {
            match self.left_tenor {
                None => 1.0,
                Some(left) if t <= left => 0.0,
                Some(left) => (t - left) / (self.key_tenor - left),
            }
        } else {
            match self.right_tenor {
                None => 1.0,
                Some(right) if t >= right => 0.0,
                Some(right) => (right - t) / (right - self.key_tenor),
            }
        }
    }

    /// Lays the bump over `curve`. Pass `&curve` to borrow.
    #[must_use]
    pub fn apply<C: Curve>(self, curve: C) -> ShiftedCurve<C, Self> {
        ShiftedCurve::new(curve, self)
    }
}

impl CurveShift for KeyRateBump {
    fn shift_at(&self, t: f64) -> f64 {
        self.weight_at(t) * self.shift_bps / BP
    }

    fn slope_at(&self, t: f64) -> f64 {
        let slope = if t < self.key_tenor {
            match self.left_tenor {
                Some(left) if t > left => 1.0 / (self.key_tenor - left),
                _ => 0.0,
            }
        } else {
            match self.right_tenor {
                Some(right) if t < right => -1.0 / (right - self.key_tenor),
                _ => 0.0,
            }
        };
        slope * self.shift_bps / BP
    }
}

/// One bump per tenor, each bounded by its neighbours in `tenors`.
///
/// `tenors` must be sorted ascending.
///
/// ```rust
/// use coupon_curves::bumping::{key_rate_profile, STANDARD_KEY_TENORS};
///
/// let bumps = key_rate_profile(STANDARD_KEY_TENORS, 1.0);
/// let total: f64 = bumps.iter().map(|b| b.weight_at(4.2)).sum();
/// assert!((total - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn key_rate_profile(tenors: &[f64], shift_bps: f64) -> Vec<KeyRateBump> {
    tenors
        .iter()
        .enumerate()
        .map(|(i, &tenor)| {
            let left = i.checked_sub(1).map(|j| tenors[j]);
            let right = tenors.get(i + 1).copied();
            KeyRateBump::with_neighbors(tenor, shift_bps, left, right)
        })
        .collect()
}
