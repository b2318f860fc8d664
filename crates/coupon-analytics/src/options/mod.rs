//! Short rate models and lattices for bonds with embedded options.
//!
//! - [`HullWhite`]: one-factor mean reverting model
//! - [`RateLattice`]: recombining binomial lattice fitted to a discount curve
//!
//! ```rust
//! use coupon_analytics::options::{time_grid, HullWhite, RateLattice};
//!
//! let model = HullWhite::new(0.03, 0.01).unwrap();
//! let times = time_grid(&[2.0], 40);
//! let dfs: Vec<f64> = times.iter().map(|t| (-0.05 * t).exp()).collect();
//! let lattice = RateLattice::calibrate(&model, &times, &dfs).unwrap();
//!
//! // a zero bond paying 100 at the end of the grid
//! let pv = lattice.backward_induction(0.0, |step, values| {
//!     if step == lattice.steps() {
//!         values.iter_mut().for_each(|v| *v += 100.0);
//!     }
//! });
//! assert!((pv - 100.0 * (-0.1_f64).exp()).abs() < 1e-9);
//! ```

mod hull_white;
mod tree;

pub use hull_white::HullWhite;
pub use tree::{time_grid, RateLattice};

/// A one-factor short rate model a lattice can be built from.
pub trait ShortRateModel: Send + Sync {
    /// Variance of the short rate's deviation from its drift at time `t`.
    fn variance(&self, t: f64) -> f64;

    /// Mean reversion speed.
    fn mean_reversion(&self) -> f64;

    /// Short rate volatility.
    fn volatility(&self) -> f64;

    /// Model name.
    fn name(&self) -> &'static str;
}
