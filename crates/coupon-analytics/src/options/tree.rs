//! Recombining binomial short rate lattice.
//!
//! Step `i` covers `[t_i, t_{i+1}]` and has `i + 1` nodes. The rate at node
//! `j` is
//!
//! ```text
//! r_{i,j} = α_i + (2j − i) δ_i,     δ_i = √(V(t_i) / i)
//! ```
//!
//! so the binomial deviation at step `i` has the model variance `V(t_i)`.
//! Up and down moves have probability ½. The drift `α_i` is solved by
//! forward induction on Arrow-Debreu prices `Q`:
//!
//! ```text
//! α_i = (ln Σ_j Q_{i,j} e^{−(2j−i) δ_i dt_i} − ln P(t_{i+1})) / dt_i
//! ```
//!
//! which makes the lattice reprice every zero bond `P(t_{i+1})` exactly.
//! Time steps need not be uniform.

use log::trace;

use super::ShortRateModel;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Merges event times closer than this.
const TIME_EPSILON: f64 = 1e-9;

/// Grid from 0 to the last event time that contains every event time and
/// has no step longer than `horizon / min_steps`.
#[must_use]
pub fn time_grid(event_times: &[f64], min_steps: usize) -> Vec<f64> {
    let mut events: Vec<f64> = event_times
        .iter()
        .copied()
        .filter(|t| t.is_finite() && *t > TIME_EPSILON)
        .collect();
    events.sort_by(f64::total_cmp);
    events.dedup_by(|a, b| (*a - *b).abs() < TIME_EPSILON);

    let Some(&horizon) = events.last() else {
        return vec![0.0];
    };
    let max_step = horizon / min_steps.max(1) as f64;

    let mut grid = Vec::with_capacity(min_steps + events.len() + 1);
    grid.push(0.0);
    let mut prev = 0.0;
    for t in events {
        let pieces = ((t - prev) / max_step - TIME_EPSILON).ceil().max(1.0) as usize;
        let dt = (t - prev) / pieces as f64;
        for k in 1..pieces {
            grid.push(prev + dt * k as f64);
        }
        grid.push(t);
        prev = t;
    }
    grid
}

/// A calibrated short rate lattice.
#[derive(Debug, Clone)]
pub struct RateLattice {
    times: Vec<f64>,
    alphas: Vec<f64>,
    spacing: Vec<f64>,
}

impl RateLattice {
    /// Fits the lattice to discount factors `P(t_k)` on the grid `times`.
    ///
    /// `times[0]` must be 0 and `discount_factors[0]` must be 1.
    ///
    /// # Errors
    ///
    /// `LatticeCalibration` for a malformed grid or a step whose drift
    /// cannot be solved.
    pub fn calibrate<M: ShortRateModel + ?Sized>(
        model: &M,
        times: &[f64],
        discount_factors: &[f64],
    ) -> AnalyticsResult<Self> {
        if times.len() < 2 || times.len() != discount_factors.len() {
            return Err(AnalyticsError::LatticeCalibration {
                step: 0,
                reason: format!(
                    "need matching grids of at least two points, got {} times and {} discount factors",
                    times.len(),
                    discount_factors.len()
                ),
            });
        }
        if times[0] != 0.0 {
            return Err(AnalyticsError::LatticeCalibration {
                step: 0,
                reason: format!("grid must start at 0, got {}", times[0]),
            });
        }

        let steps = times.len() - 1;
        let mut alphas = Vec::with_capacity(steps);
        let mut spacing = Vec::with_capacity(steps);
        let mut q = vec![1.0];

        for i in 0..steps {
            let dt = times[i + 1] - times[i];
            let target = discount_factors[i + 1];
            if !(dt > 0.0 && dt.is_finite()) {
                return Err(AnalyticsError::LatticeCalibration {
                    step: i,
                    reason: format!("non-increasing time {} after {}", times[i + 1], times[i]),
                });
            }
            if !(target > 0.0 && target.is_finite()) {
                return Err(AnalyticsError::LatticeCalibration {
                    step: i,
                    reason: format!("discount factor {target} is not positive"),
                });
            }

            let delta = if i == 0 {
                0.0
            } else {
                (model.variance(times[i]) / i as f64).sqrt()
            };
            let offset = |j: usize| (2.0 * j as f64 - i as f64) * delta;

            let sum: f64 = q
                .iter()
                .enumerate()
                .map(|(j, qj)| qj * (-offset(j) * dt).exp())
                .sum();
            if !(sum > 0.0 && sum.is_finite()) {
                return Err(AnalyticsError::LatticeCalibration {
                    step: i,
                    reason: format!("state prices sum to {sum}"),
                });
            }
            let alpha = (sum.ln() - target.ln()) / dt;

            let mut next = vec![0.0; i + 2];
            for (j, qj) in q.iter().enumerate() {
                let flow = 0.5 * qj * (-(alpha + offset(j)) * dt).exp();
                next[j] += flow;
                next[j + 1] += flow;
            }
            trace!("lattice step {i}: dt {dt:.6}, alpha {alpha:.6}, delta {delta:.6}");

            alphas.push(alpha);
            spacing.push(delta);
            q = next;
        }

        Ok(Self {
            times: times.to_vec(),
            alphas,
            spacing,
        })
    }

    /// Number of time steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.alphas.len()
    }

    /// Grid times, `steps() + 1` of them.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Short rate at node `j` of step `i`.
    #[must_use]
    pub fn rate(&self, i: usize, j: usize) -> f64 {
        self.alphas[i] + (2.0 * j as f64 - i as f64) * self.spacing[i]
    }

    /// Backward induction with every node rate shifted by `spread`.
    ///
    /// `at_time(k, values)` is called at every grid time from the last to
    /// the first, with the node values at that time (`k + 1` nodes, or
    /// `steps() + 1` at the final time). It adds cash flows and applies
    /// exercise decisions in place. Returns the root value.
    pub fn backward_induction<F>(&self, spread: f64, mut at_time: F) -> f64
    where
        F: FnMut(usize, &mut [f64]),
    {
        let n = self.steps();
        let mut values = vec![0.0; n + 1];
        at_time(n, &mut values);

        for i in (0..n).rev() {
            let dt = self.times[i + 1] - self.times[i];
            for j in 0..=i {
                let discount = (-(self.rate(i, j) + spread) * dt).exp();
                values[j] = 0.5 * (values[j] + values[j + 1]) * discount;
            }
            values.truncate(i + 1);
            at_time(i, &mut values);
        }
        values[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::HullWhite;
    use approx::assert_relative_eq;

    fn curve_dfs(times: &[f64]) -> Vec<f64> {
        // upward sloping continuous zero curve
        times
            .iter()
            .map(|&t| (-(0.03 + 0.004 * t) * t).exp())
            .collect()
    }

    #[test]
    fn test_grid() {
        let grid = time_grid(&[0.3, 1.0, 1.0, 2.5], 10);
        assert_eq!(grid[0], 0.0);
        assert!(grid.windows(2).all(|w| w[1] > w[0] && w[1] - w[0] <= 0.25 + 1e-12));
        for t in [0.3, 1.0, 2.5] {
            assert!(grid.iter().any(|g| (g - t).abs() < 1e-12));
        }
        assert_eq!(*grid.last().unwrap(), 2.5);
        assert_eq!(time_grid(&[], 10), vec![0.0]);
    }

    #[test]
    fn test_reprices_zero_bonds() {
        let model = HullWhite::new(0.05, 0.015).unwrap();
        let times = time_grid(&[0.37, 1.2, 4.0, 7.5], 60);
        let dfs = curve_dfs(&times);
        let lattice = RateLattice::calibrate(&model, &times, &dfs).unwrap();

        for k in [1, times.len() / 3, times.len() - 1] {
            let price = lattice.backward_induction(0.0, |step, values| {
                if step == k {
                    values.iter_mut().for_each(|v| *v += 1.0);
                }
            });
            assert_relative_eq!(price, dfs[k], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_zero_vol_is_deterministic() {
        let model = HullWhite::new(0.03, 0.0).unwrap();
        let times = time_grid(&[5.0], 20);
        let dfs = curve_dfs(&times);
        let lattice = RateLattice::calibrate(&model, &times, &dfs).unwrap();
        // all nodes of a step share the forward rate
        assert_eq!(lattice.rate(10, 0), lattice.rate(10, 10));
        let spread = 0.01;
        let price = lattice.backward_induction(spread, |step, values| {
            if step == lattice.steps() {
                values.iter_mut().for_each(|v| *v += 1.0);
            }
        });
        assert_relative_eq!(price, dfs[20] * (-spread * 5.0_f64).exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_spread_of_rates_grows() {
        let model = HullWhite::new(0.03, 0.01).unwrap();
        let times = time_grid(&[10.0], 40);
        let lattice = RateLattice::calibrate(&model, &times, &curve_dfs(&times)).unwrap();
        let width = |i: usize| lattice.rate(i, i) - lattice.rate(i, 0);
        assert!(width(30) > width(10) && width(10) > 0.0);
        assert_relative_eq!(width(20), 2.0 * (20.0 * model.variance(times[20])).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_bad_grids() {
        let model = HullWhite::default();
        assert!(RateLattice::calibrate(&model, &[0.0], &[1.0]).is_err());
        assert!(RateLattice::calibrate(&model, &[0.0, 1.0, 1.0], &[1.0, 0.9, 0.8]).is_err());
        assert!(matches!(
            RateLattice::calibrate(&model, &[0.0, 1.0], &[1.0, -0.5]),
            Err(AnalyticsError::LatticeCalibration { step: 0, .. })
        ));
    }
}
