//! Property-based tests for interpolators and solvers.

use coupon_math::extrapolation::SmithWilson;
use coupon_math::interpolation::{CubicSpline, Interpolator, MonotoneConvex};
use coupon_math::solvers::{brent, hybrid, SolverConfig};
use proptest::prelude::*;

/// Times and zero rates built from positive piecewise-flat forwards.
fn arb_curve_with_gap(min_gap: f64) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    // splines need two knots
    prop::collection::vec((min_gap..5.0, 0.001f64..0.10), 2..10).prop_map(|segments| {
        let mut t = 0.0;
        let mut integral = 0.0;
        let mut times = Vec::new();
        let mut rates = Vec::new();
        for (gap, fwd) in segments {
            t += gap;
            integral += gap * fwd;
            times.push(t);
            rates.push(integral / t);
        }
        (times, rates)
    })
}

fn arb_curve() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    arb_curve_with_gap(0.1)
}

proptest! {
    #[test]
    fn monotone_convex_hits_nodes((times, rates) in arb_curve()) {
        let mc = MonotoneConvex::new(times.clone(), rates.clone()).unwrap();
        for (t, r) in times.iter().zip(&rates) {
            prop_assert!((mc.interpolate(*t).unwrap() - r).abs() < 1e-12);
        }
    }

    #[test]
    fn monotone_convex_forwards_non_negative((times, rates) in arb_curve()) {
        let mc = MonotoneConvex::new(times.clone(), rates).unwrap();
        let end = times[times.len() - 1];
        let steps = 400;
        for k in 0..=steps {
            let t = (end * f64::from(k) / f64::from(steps)).min(end);
            prop_assert!(mc.forward_rate(t).unwrap() >= -1e-15);
        }
    }

    #[test]
    fn spline_hits_nodes((times, rates) in arb_curve()) {
        let spline = CubicSpline::new(times.clone(), rates.clone()).unwrap();
        for (t, r) in times.iter().zip(&rates) {
            prop_assert!((spline.interpolate(*t).unwrap() - r).abs() < 1e-12);
        }
    }

    #[test]
    fn smith_wilson_reprices((times, rates) in arb_curve_with_gap(0.5)) {
        let dfs: Vec<f64> = times.iter().zip(&rates).map(|(t, r)| (-r * t).exp()).collect();
        let sw = SmithWilson::fit(0.0345, 0.126, &times, &dfs).unwrap();
        for (t, p) in times.iter().zip(&dfs) {
            prop_assert!((sw.discount_factor(*t) - p).abs() < 1e-9);
        }
    }

    #[test]
    fn brent_and_hybrid_agree(shift in -5.0f64..5.0) {
        let f = |x: f64| x * x * x + x - shift;
        let df = |x: f64| 3.0 * x * x + 1.0;
        let config = SolverConfig::default();
        let a = brent(f, -10.0, 10.0, &config).unwrap();
        let b = hybrid(f, df, 0.0, Some((-10.0, 10.0)), &config).unwrap();
        prop_assert!((a.root - b.root).abs() < 1e-8);
    }
}
