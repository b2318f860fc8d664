//! Option-adjusted spread for callable and puttable bonds.
//!
//! The bond is valued on a short rate lattice fitted to the curve. Cash
//! flows land on their own grid times; at exercise times the issuer calls
//! (value capped at the call price plus accrued) and the holder puts (value
//! floored at the put price plus accrued) before that time's coupon is
//! added. The OAS is the constant spread on every node rate that makes the
//! lattice value equal to the market dirty price.
//!
//! Without options the lattice reproduces the Z-spread price exactly, so
//! a call can only lower the spread: OAS ≤ Z.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use coupon_bonds::types::ExerciseSchedule;
use coupon_bonds::{Bond, CallableBond};
use coupon_core::Date;
use coupon_curves::Curve;
use coupon_math::solvers::SolverConfig;

use super::{solve_spread, ZSpreadCalculator};
use crate::config::OasConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::options::{time_grid, HullWhite, RateLattice, ShortRateModel};
use crate::pricing::accrued_per_100;

/// OAS with the measures it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OasResult {
    /// Option-adjusted spread (decimal).
    pub oas: f64,
    /// Z-spread (decimal) of the same price.
    pub z_spread: f64,
    /// Bullet value less the option-adjusted value at the OAS, per 100.
    /// Positive for a net short call, negative for a net long put.
    pub option_value: f64,
}

impl OasResult {
    /// OAS in basis points.
    #[must_use]
    pub fn oas_bps(&self) -> f64 {
        self.oas * 1e4
    }

    /// Option cost in basis points: Z-spread less OAS.
    #[must_use]
    pub fn option_cost_bps(&self) -> f64 {
        (self.z_spread - self.oas) * 1e4
    }
}

/// A callable bond laid out on a calibrated lattice.
#[derive(Debug, Clone)]
struct BondLattice {
    lattice: RateLattice,
    flows: Vec<f64>,
    calls: Vec<Option<f64>>,
    puts: Vec<Option<f64>>,
}

fn grid_index(grid: &[f64], t: f64) -> AnalyticsResult<usize> {
    grid.iter()
        .position(|g| (g - t).abs() < 1e-8)
        .ok_or_else(|| AnalyticsError::LatticeCalibration {
            step: 0,
            reason: format!("event time {t} missing from the grid"),
        })
}

impl BondLattice {
    fn build(
        model: &dyn ShortRateModel,
        min_steps: usize,
        bond: &CallableBond,
        curve: &dyn Curve,
        settlement: Date,
    ) -> AnalyticsResult<Self> {
        let base = bond.base();
        let scale = 100.0 / base.face_value();
        let t_settle = curve.year_fraction(settlement);
        let df_settle = curve.discount_factor(t_settle)?;
        let time_of = |date: Date| curve.year_fraction(date) - t_settle;

        let flows: Vec<(f64, f64)> = base
            .cash_flows(settlement)?
            .iter()
            .map(|cf| (time_of(cf.date), cf.amount * scale))
            .collect();

        // exercise on a coupon date lands on that coupon's payment date
        let exercise_time = |date: Date| {
            base.schedule()
                .periods()
                .iter()
                .find(|p| p.accrual_end == date)
                .map_or_else(|| time_of(date), |p| time_of(p.payment_date))
        };
        let exercises = |schedule: &ExerciseSchedule, price_of: &dyn Fn(Date) -> Option<f64>| {
            bond.exercise_dates(schedule, settlement)
                .into_iter()
                .filter_map(|date| price_of(date).map(|price| (date, price)))
                .map(|(date, price)| -> AnalyticsResult<(f64, f64)> {
                    Ok((exercise_time(date), price + accrued_per_100(base, date)?))
                })
                .collect::<AnalyticsResult<Vec<(f64, f64)>>>()
        };
        let calls = exercises(bond.call_schedule(), &|d| bond.call_price(d))?;
        let puts = match bond.put_schedule() {
            Some(schedule) => exercises(schedule, &|d| bond.put_price(d))?,
            None => Vec::new(),
        };

        let events: Vec<f64> = flows
            .iter()
            .chain(&calls)
            .chain(&puts)
            .map(|&(t, _)| t)
            .collect();
        let grid = time_grid(&events, min_steps);
        let dfs = grid
            .iter()
            .map(|&t| -> AnalyticsResult<f64> {
                Ok(curve.discount_factor(t_settle + t)? / df_settle)
            })
            .collect::<AnalyticsResult<Vec<f64>>>()?;
        let lattice = RateLattice::calibrate(model, &grid, &dfs)?;

        let mut flow_at = vec![0.0; grid.len()];
        for &(t, amount) in &flows {
            flow_at[grid_index(&grid, t)?] += amount;
        }
        let mut call_at = vec![None; grid.len()];
        for &(t, price) in &calls {
            call_at[grid_index(&grid, t)?] = Some(price);
        }
        let mut put_at = vec![None; grid.len()];
        for &(t, price) in &puts {
            put_at[grid_index(&grid, t)?] = Some(price);
        }

        debug!(
            "{}: lattice with {} steps, {} calls, {} puts",
            bond.identifier(),
            lattice.steps(),
            calls.len(),
            puts.len()
        );
        Ok(Self {
            lattice,
            flows: flow_at,
            calls: call_at,
            puts: put_at,
        })
    }

    fn price(&self, spread: f64, with_options: bool) -> f64 {
        self.lattice.backward_induction(spread, |k, values| {
            if with_options {
                if let Some(call) = self.calls[k] {
                    values.iter_mut().for_each(|v| *v = v.min(call));
                }
                if let Some(put) = self.puts[k] {
                    values.iter_mut().for_each(|v| *v = v.max(put));
                }
            }
            let flow = self.flows[k];
            if flow != 0.0 {
                values.iter_mut().for_each(|v| *v += flow);
            }
        })
    }
}

/// OAS calculator on a short rate lattice.
pub struct OasCalculator {
    model: Box<dyn ShortRateModel>,
    config: OasConfig,
    solver: SolverConfig,
}

impl std::fmt::Debug for OasCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OasCalculator")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .field("solver", &self.solver)
            .finish()
    }
}

impl OasCalculator {
    /// Hull-White calculator from lattice settings.
    pub fn new(config: OasConfig) -> AnalyticsResult<Self> {
        Ok(Self::with_model(HullWhite::from_config(&config)?, config))
    }

    /// Calculator on any short rate model.
    #[must_use]
    pub fn with_model<M: ShortRateModel + 'static>(model: M, config: OasConfig) -> Self {
        Self {
            model: Box::new(model),
            config,
            solver: SolverConfig::default(),
        }
    }

    /// Sets the solver settings.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Lattice settings.
    #[must_use]
    pub fn config(&self) -> &OasConfig {
        &self.config
    }

    fn lattice(
        &self,
        bond: &CallableBond,
        curve: &dyn Curve,
        settlement: Date,
    ) -> AnalyticsResult<BondLattice> {
        BondLattice::build(
            self.model.as_ref(),
            self.config.tree_steps,
            bond,
            curve,
            settlement,
        )
    }

    /// Option-adjusted dirty price per 100 at spread `oas`.
    pub fn price(
        &self,
        bond: &CallableBond,
        curve: &dyn Curve,
        oas: f64,
        settlement: Date,
    ) -> AnalyticsResult<f64> {
        Ok(self.lattice(bond, curve, settlement)?.price(oas, true))
    }

    /// OAS of `bond` at `dirty_price` per 100.
    ///
    /// # Errors
    ///
    /// `OasExceedsZSpread` if a bond with calls and no puts comes out with
    /// an OAS above its Z-spread by more than the configured slack; solver
    /// errors are passed through.
    pub fn calculate(
        &self,
        bond: &CallableBond,
        curve: &dyn Curve,
        dirty_price: f64,
        settlement: Date,
    ) -> AnalyticsResult<OasResult> {
        if !(dirty_price.is_finite() && dirty_price > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "dirty price must be positive, got {dirty_price}"
            )));
        }
        let z_spread = ZSpreadCalculator::new(curve)
            .with_tolerance(self.solver.tolerance)
            .calculate(bond.base(), dirty_price, settlement)?;

        let lattice = self.lattice(bond, curve, settlement)?;
        let oas = solve_spread(|s| lattice.price(s, true) - dirty_price, &self.solver)?;

        let slack = self.config.z_tolerance_bps * 1e-4;
        if !bond.has_put() && oas > z_spread + slack {
            warn!(
                "{}: OAS {:.4}bp above Z-spread {:.4}bp",
                bond.identifier(),
                oas * 1e4,
                z_spread * 1e4
            );
            return Err(AnalyticsError::OasExceedsZSpread {
                oas_bps: oas * 1e4,
                z_spread_bps: z_spread * 1e4,
            });
        }

        let option_value = lattice.price(oas, false) - dirty_price;
        debug!(
            "{}: OAS {:.4}bp, Z {:.4}bp, option {:.6}",
            bond.identifier(),
            oas * 1e4,
            z_spread * 1e4,
            option_value
        );
        Ok(OasResult {
            oas,
            z_spread,
            option_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use coupon_bonds::types::{CallSchedule, ExerciseStyle, PutSchedule};
    use coupon_bonds::FixedRateBond;
    use coupon_curves::{DiscountCurve, DiscountCurveBuilder};

    use crate::pricing::price_with_spread;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn curve() -> DiscountCurve {
        DiscountCurveBuilder::new(date(2025, 1, 2))
            .add_zero_rate(0.5, 0.042)
            .add_zero_rate(2.0, 0.040)
            .add_zero_rate(5.0, 0.041)
            .add_zero_rate(10.0, 0.044)
            .build()
            .unwrap()
    }

    fn base(coupon: f64) -> FixedRateBond {
        FixedRateBond::builder()
            .coupon_percent(coupon)
            .issue_date(date(2024, 3, 15))
            .maturity(date(2032, 3, 15))
            .build()
            .unwrap()
    }

    fn callable(coupon: f64, call_price: f64) -> CallableBond {
        let calls = CallSchedule::new(ExerciseStyle::Bermudan).with_entry(date(2027, 3, 15), call_price);
        CallableBond::new(base(coupon), calls).unwrap()
    }

    #[test]
    fn test_oas_below_z() {
        let curve = curve();
        let bond = callable(6.0, 100.0);
        let settle = date(2025, 1, 2);
        let calc = OasCalculator::new(OasConfig::default()).unwrap();
        let dirty = price_with_spread(bond.base(), &curve, settle, 0.012).unwrap() - 2.0;

        let result = calc.calculate(&bond, &curve, dirty, settle).unwrap();
        assert!(result.oas < result.z_spread);
        assert!(result.option_value > 0.0);
        assert!(result.option_cost_bps() > 1.0);
        assert_relative_eq!(calc.price(&bond, &curve, result.oas, settle).unwrap(), dirty, epsilon = 1e-6);
    }

    #[test]
    fn test_oas_tends_to_z_without_volatility() {
        let curve = curve();
        // deep out of the money: a 3% coupon called at 110
        let bond = callable(3.0, 110.0);
        let settle = date(2025, 1, 2);
        let dirty = price_with_spread(bond.base(), &curve, settle, 0.015).unwrap();

        let calm = OasCalculator::new(OasConfig::default().with_volatility(1e-6)).unwrap();
        let result = calm.calculate(&bond, &curve, dirty, settle).unwrap();
        assert_relative_eq!(result.oas, result.z_spread, epsilon = 1e-7);
        assert_relative_eq!(result.oas, 0.015, epsilon = 1e-7);

        let volatile = OasCalculator::new(OasConfig::default().with_volatility(0.02)).unwrap();
        let result = volatile.calculate(&bond, &curve, dirty, settle).unwrap();
        assert!(result.oas <= result.z_spread);
    }

    #[test]
    fn test_put_raises_value() {
        let curve = curve();
        let settle = date(2025, 1, 2);
        let calc = OasCalculator::new(OasConfig::default()).unwrap();
        let plain = callable(4.0, 100.0);
        let with_put = plain
            .clone()
            .with_puts(PutSchedule::new(ExerciseStyle::European).with_entry(date(2028, 3, 15), 100.0))
            .unwrap();

        let p_plain = calc.price(&plain, &curve, 0.01, settle).unwrap();
        let p_put = calc.price(&with_put, &curve, 0.01, settle).unwrap();
        assert!(p_put > p_plain);

        // the put can lift the OAS above the Z-spread without an error
        let result = calc.calculate(&with_put, &curve, p_put, settle).unwrap();
        assert_relative_eq!(result.oas, 0.01, epsilon = 1e-7);
    }

    #[test]
    fn test_invalid_inputs() {
        let curve = curve();
        let calc = OasCalculator::new(OasConfig::default()).unwrap();
        let bond = callable(5.0, 100.0);
        assert!(calc.calculate(&bond, &curve, 0.0, date(2025, 1, 2)).is_err());
        assert!(matches!(
            calc.calculate(&bond, &curve, 100.0, date(2032, 3, 15)),
            Err(AnalyticsError::InvalidSettlement { .. })
        ));
        assert!(OasCalculator::new(OasConfig::default().with_volatility(-0.01)).is_err());
    }
}
