//! Nonlinear least squares.
//!
//! [`levenberg_marquardt`] minimises `Σ r_i(p)²` for a residual vector
//! `r(p)`, using a forward-difference Jacobian and Marquardt's diagonal
//! scaling of the damping term.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Levenberg-Marquardt settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmConfig {
    /// Stop when the root-mean-square residual drops below this.
    pub tolerance: f64,
    /// Stop when the relative parameter step drops below this.
    pub step_tolerance: f64,
    /// Iteration cap.
    pub max_iterations: u32,
    /// Initial damping.
    pub initial_lambda: f64,
    /// Damping multiplier on rejected steps (divisor on accepted ones).
    pub lambda_factor: f64,
    /// Relative finite-difference step for the Jacobian.
    pub jacobian_step: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            step_tolerance: 1e-14,
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            jacobian_step: 1e-7,
        }
    }
}

impl LmConfig {
    /// Sets the residual tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Outcome of a least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LmResult {
    /// Fitted parameters.
    pub parameters: Vec<f64>,
    /// Residuals at the fitted parameters.
    pub residuals: Vec<f64>,
    /// Root-mean-square residual.
    pub rms: f64,
    /// Iterations used.
    pub iterations: u32,
    /// True if a tolerance was met before the iteration cap.
    pub converged: bool,
}

fn sum_squares(r: &[f64]) -> f64 {
    r.iter().map(|x| x * x).sum()
}

fn rms(r: &[f64]) -> f64 {
    if r.is_empty() {
        0.0
    } else {
        (sum_squares(r) / r.len() as f64).sqrt()
    }
}

/// Minimises the sum of squared residuals returned by `residuals`.
///
/// `residuals` may fail (for instance when a trial parameter vector does not
/// give a valid curve); a failing trial step is treated as a rejected step.
/// The starting point itself must evaluate.
///
/// Reaching the iteration cap is not an error: the result reports
/// `converged = false` and callers decide whether the fit is good enough.
///
/// # Example
///
/// ```rust
/// use coupon_math::optimization::{levenberg_marquardt, LmConfig};
///
/// // Fit y = a * exp(b * x) to exact data
/// let xs: [f64; 4] = [0.0, 1.0, 2.0, 3.0];
/// let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (0.5 * x).exp()).collect();
/// let result = levenberg_marquardt(
///     |p: &[f64]| Ok(xs.iter().zip(&ys).map(|(x, y)| p[0] * (p[1] * x).exp() - y).collect()),
///     &[1.0, 0.1],
///     &LmConfig::default(),
/// )
/// .unwrap();
/// assert!((result.parameters[0] - 2.0).abs() < 1e-6);
/// ```
pub fn levenberg_marquardt<F>(
    residuals: F,
    initial: &[f64],
    config: &LmConfig,
) -> MathResult<LmResult>
where
    F: Fn(&[f64]) -> MathResult<Vec<f64>>,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }

    let mut params = initial.to_vec();
    let mut r = residuals(&params)?;
    let m = r.len();
    if m == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    let mut cost = sum_squares(&r);
    let mut lambda = config.initial_lambda;

    for iteration in 0..config.max_iterations {
        if rms(&r) < config.tolerance {
            return Ok(LmResult {
                rms: rms(&r),
                parameters: params,
                residuals: r,
                iterations: iteration,
                converged: true,
            });
        }

        let jac = jacobian(&residuals, &params, &r, config.jacobian_step)?;
        let jt = jac.transpose();
        let jtj = &jt * &jac;
        let gradient = &jt * DVector::from_column_slice(&r);

        let mut accepted = false;
        let mut step_norm = 0.0;

        // Inner loop: raise damping until the step reduces the cost.
        for _ in 0..32 {
            let mut lhs = jtj.clone();
            for i in 0..n {
                lhs[(i, i)] += lambda * jtj[(i, i)].max(1e-12);
            }
            let Some(delta) = lhs.lu().solve(&(-&gradient)) else {
                lambda *= config.lambda_factor;
                continue;
            };

            let trial: Vec<f64> = params.iter().zip(delta.iter()).map(|(p, d)| p + d).collect();
            match residuals(&trial) {
                Ok(trial_r) if trial_r.len() == m && sum_squares(&trial_r) < cost => {
                    step_norm = delta.norm() / (1.0 + DVector::from_column_slice(&params).norm());
                    params = trial;
                    cost = sum_squares(&trial_r);
                    r = trial_r;
                    lambda = (lambda / config.lambda_factor).max(1e-15);
                    accepted = true;
                    break;
                }
                _ => lambda *= config.lambda_factor,
            }
        }

        log::debug!(
            "levenberg-marquardt iter {iteration}: rms = {:.3e}, lambda = {lambda:.1e}",
            rms(&r)
        );

        if !accepted || step_norm < config.step_tolerance {
            // No further progress possible from here.
            let final_rms = rms(&r);
            return Ok(LmResult {
                rms: final_rms,
                parameters: params,
                residuals: r,
                iterations: iteration + 1,
                converged: final_rms < config.tolerance || accepted,
            });
        }
    }

    Ok(LmResult {
        rms: rms(&r),
        parameters: params,
        residuals: r,
        iterations: config.max_iterations,
        converged: false,
    })
}

fn jacobian<F>(residuals: &F, params: &[f64], r0: &[f64], rel_step: f64) -> MathResult<DMatrix<f64>>
where
    F: Fn(&[f64]) -> MathResult<Vec<f64>>,
{
    let m = r0.len();
    let n = params.len();
    let mut jac = DMatrix::zeros(m, n);
    let mut bumped = params.to_vec();

    for j in 0..n {
        let h = rel_step * params[j].abs().max(1e-3);
        bumped[j] = params[j] + h;
        let r_up = residuals(&bumped)?;
        bumped[j] = params[j];
        if r_up.len() != m {
            return Err(MathError::DimensionMismatch {
                expected: m,
                actual: r_up.len(),
            });
        }
        for i in 0..m {
            jac[(i, j)] = (r_up[i] - r0[i]) / h;
        }
    }

    Ok(jac)
}
