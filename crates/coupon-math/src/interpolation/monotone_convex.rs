//! Hagan-West monotone convex interpolation.
//!
//! Works on the integrated forward `r(t) * t`. Node forwards are estimated
//! from neighbouring discrete forwards and the instantaneous forward on each
//! segment is the discrete forward plus a correction `g(x)` that integrates
//! to zero over the segment. Zero rates at the input times are therefore
//! reproduced exactly, and if every discrete forward is non-negative so is
//! the interpolated forward curve.
//!
//! Reference: Hagan & West, "Interpolation Methods for Curve Construction",
//! Applied Mathematical Finance (2006).

use super::{check_query, segment, validate_nodes, Interpolator};
use crate::error::{MathError, MathResult};

/// Monotone convex interpolator on continuously compounded zero rates.
#[derive(Debug, Clone)]
pub struct MonotoneConvex {
    /// Knots including the implicit origin `0`.
    knots: Vec<f64>,
    /// `r(t) * t` at each knot.
    integrals: Vec<f64>,
    /// Discrete forward per segment (index `i` covers `knots[i]..knots[i+1]`).
    discrete: Vec<f64>,
    /// Instantaneous forward at each knot.
    node_forwards: Vec<f64>,
    extrapolate: bool,
}

impl MonotoneConvex {
    /// Builds the interpolator from strictly positive times and zero rates.
    pub fn new(times: Vec<f64>, zero_rates: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&times, &zero_rates, 1)?;
        if times[0] <= 0.0 {
            return Err(MathError::invalid_input(
                "monotone convex times must be strictly positive",
            ));
        }

        let mut knots = Vec::with_capacity(times.len() + 1);
        knots.push(0.0);
        knots.extend_from_slice(&times);

        let mut integrals = Vec::with_capacity(knots.len());
        integrals.push(0.0);
        integrals.extend(times.iter().zip(&zero_rates).map(|(t, r)| t * r));

        let discrete: Vec<f64> = (1..knots.len())
            .map(|i| (integrals[i] - integrals[i - 1]) / (knots[i] - knots[i - 1]))
            .collect();

        let node_forwards = node_forwards(&knots, &discrete);

        Ok(Self {
            knots,
            integrals,
            discrete,
            node_forwards,
            extrapolate: false,
        })
    }

    /// Allows queries beyond the last time (flat forward continuation).
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.extrapolate = true;
        self
    }

    fn last(&self) -> usize {
        self.knots.len() - 1
    }

    fn check(&self, t: f64) -> MathResult<()> {
        if t < 0.0 {
            return Err(MathError::invalid_input(format!("negative time {t}")));
        }
        check_query(t, 0.0, self.max_x(), self.extrapolate)
    }

    /// Integrated forward `∫₀ᵗ f(s) ds`, i.e. `r(t) * t`.
    pub fn integral(&self, t: f64) -> MathResult<f64> {
        self.check(t)?;
        Ok(self.integral_unchecked(t))
    }

    /// Instantaneous forward rate at `t`.
    pub fn forward_rate(&self, t: f64) -> MathResult<f64> {
        self.check(t)?;
        Ok(self.forward_unchecked(t))
    }

    fn integral_unchecked(&self, t: f64) -> f64 {
        let n = self.last();
        if t >= self.knots[n] {
            return self.integrals[n] + self.node_forwards[n] * (t - self.knots[n]);
        }
        let i = segment(&self.knots, t);
        let width = self.knots[i + 1] - self.knots[i];
        let x = (t - self.knots[i]) / width;
        if x >= 1.0 {
            return self.integrals[i + 1];
        }
        let (g0, g1) = self.corrections(i);
        self.integrals[i]
            + self.discrete[i] * (t - self.knots[i])
            + width * Shape::classify(g0, g1).integral(x)
    }

    fn forward_unchecked(&self, t: f64) -> f64 {
        let n = self.last();
        if t >= self.knots[n] {
            return self.node_forwards[n];
        }
        let i = segment(&self.knots, t);
        let x = (t - self.knots[i]) / (self.knots[i + 1] - self.knots[i]);
        let (g0, g1) = self.corrections(i);
        self.discrete[i] + Shape::classify(g0, g1).value(x)
    }

    fn corrections(&self, i: usize) -> (f64, f64) {
        (
            self.node_forwards[i] - self.discrete[i],
            self.node_forwards[i + 1] - self.discrete[i],
        )
    }

    fn zero_unchecked(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.node_forwards[0];
        }
        self.integral_unchecked(t) / t
    }
}

/// Instantaneous forwards at the knots, with the positivity collar applied
/// when every discrete forward is non-negative.
fn node_forwards(knots: &[f64], discrete: &[f64]) -> Vec<f64> {
    let n = discrete.len();
    if n == 1 {
        return vec![discrete[0]; 2];
    }

    let mut f = vec![0.0; n + 1];
    for i in 1..n {
        let left = knots[i] - knots[i - 1];
        let right = knots[i + 1] - knots[i];
        f[i] = (left * discrete[i] + right * discrete[i - 1]) / (left + right);
    }
    f[0] = discrete[0] - 0.5 * (f[1] - discrete[0]);
    f[n] = discrete[n - 1] - 0.5 * (f[n - 1] - discrete[n - 1]);

    if discrete.iter().all(|&fd| fd >= 0.0) {
        f[0] = f[0].clamp(0.0, 2.0 * discrete[0]);
        for i in 1..n {
            f[i] = f[i].clamp(0.0, 2.0 * discrete[i - 1].min(discrete[i]));
        }
        f[n] = f[n].clamp(0.0, 2.0 * discrete[n - 1]);
    }
    f
}

/// The four shapes of the forward correction on a unit segment.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Flat,
    Quadratic { g0: f64, g1: f64 },
    FlatThenRising { g0: f64, g1: f64, eta: f64 },
    FallingThenFlat { g0: f64, g1: f64, eta: f64 },
    TwoQuadratics { g0: f64, g1: f64, eta: f64, a: f64 },
}

impl Shape {
    fn classify(g0: f64, g1: f64) -> Self {
        if g0 == 0.0 && g1 == 0.0 {
            return Self::Flat;
        }
        let zone_one = (g0 < 0.0 && -0.5 * g0 <= g1 && g1 <= -2.0 * g0)
            || (g0 > 0.0 && -0.5 * g0 >= g1 && g1 >= -2.0 * g0);
        let zone_two = (g0 < 0.0 && g1 > -2.0 * g0) || (g0 > 0.0 && g1 < -2.0 * g0);
        let zone_three =
            (g0 > 0.0 && g1 < 0.0 && g1 > -0.5 * g0) || (g0 < 0.0 && g1 > 0.0 && g1 < -0.5 * g0);

        if zone_one {
            Self::Quadratic { g0, g1 }
        } else if zone_two {
            Self::FlatThenRising {
                g0,
                g1,
                eta: (g1 + 2.0 * g0) / (g1 - g0),
            }
        } else if zone_three {
            Self::FallingThenFlat {
                g0,
                g1,
                eta: 3.0 * g1 / (g1 - g0),
            }
        } else {
            let sum = g0 + g1;
            Self::TwoQuadratics {
                g0,
                g1,
                eta: g1 / sum,
                a: -g0 * g1 / sum,
            }
        }
    }

    fn value(self, x: f64) -> f64 {
        match self {
            Self::Flat => 0.0,
            Self::Quadratic { g0, g1 } => {
                g0 * (1.0 - 4.0 * x + 3.0 * x * x) + g1 * (3.0 * x * x - 2.0 * x)
            }
            Self::FlatThenRising { g0, g1, eta } => {
                if x <= eta {
                    g0
                } else {
                    g0 + (g1 - g0) * ((x - eta) / (1.0 - eta)).powi(2)
                }
            }
            Self::FallingThenFlat { g0, g1, eta } => {
                if x < eta {
                    g1 + (g0 - g1) * ((eta - x) / eta).powi(2)
                } else {
                    g1
                }
            }
            Self::TwoQuadratics { g0, g1, eta, a } => {
                if x <= eta && eta > 0.0 {
                    a + (g0 - a) * ((eta - x) / eta).powi(2)
                } else if eta < 1.0 {
                    a + (g1 - a) * ((x - eta) / (1.0 - eta)).powi(2)
                } else {
                    a
                }
            }
        }
    }

    /// `∫₀ˣ g(s) ds`; zero at `x = 1` for every shape.
    fn integral(self, x: f64) -> f64 {
        match self {
            Self::Flat => 0.0,
            Self::Quadratic { g0, g1 } => {
                let x2 = x * x;
                let x3 = x2 * x;
                g0 * (x - 2.0 * x2 + x3) + g1 * (x3 - x2)
            }
            Self::FlatThenRising { g0, g1, eta } => {
                if x <= eta {
                    g0 * x
                } else {
                    g0 * x + (g1 - g0) * (x - eta).powi(3) / (3.0 * (1.0 - eta).powi(2))
                }
            }
            Self::FallingThenFlat { g0, g1, eta } => {
                if x < eta {
                    g1 * x - (g0 - g1) / 3.0 * ((eta - x).powi(3) / (eta * eta) - eta)
                } else {
                    g1 * x + (g0 - g1) * eta / 3.0
                }
            }
            Self::TwoQuadratics { g0, g1, eta, a } => {
                if x <= eta && eta > 0.0 {
                    a * x - (g0 - a) / 3.0 * ((eta - x).powi(3) / (eta * eta) - eta)
                } else {
                    let head = a * x + (g0 - a) * eta / 3.0;
                    if eta < 1.0 {
                        head + (g1 - a) * (x - eta).powi(3) / (3.0 * (1.0 - eta).powi(2))
                    } else {
                        head
                    }
                }
            }
        }
    }
}

impl Interpolator for MonotoneConvex {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check(x)?;
        Ok(self.zero_unchecked(x))
    }

    /// `d r / d t = (f(t) - r(t)) / t`.
    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check(x)?;
        if x <= 0.0 {
            return Ok(0.0);
        }
        Ok((self.forward_unchecked(x) - self.zero_unchecked(x)) / x)
    }

    fn min_x(&self) -> f64 {
        0.0
    }

    fn max_x(&self) -> f64 {
        self.knots[self.last()]
    }

    fn allows_extrapolation(&self) -> bool {
        self.extrapolate
    }
}
