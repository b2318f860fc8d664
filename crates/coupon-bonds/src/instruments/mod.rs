//! Bond instruments.
//!
//! - [`FixedRateBond`]: fixed coupons with optional stubs and ex-coupon rules
//! - [`ZeroCouponBond`]: a single redemption
//! - [`CallableBond`]: a fixed rate bond with call and put schedules
//! - [`FloatingRateNote`]: index plus margin with cap and floor

mod callable;
mod fixed_rate;
mod floating_rate;
mod zero_coupon;

pub use callable::{CallableBond, Workout, WorkoutKind};
pub use fixed_rate::{FixedRateBond, FixedRateBondBuilder};
pub use floating_rate::{FloatingRateNote, FloatingRateNoteBuilder};
pub use zero_coupon::ZeroCouponBond;
