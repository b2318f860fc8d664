//! Property and reference tests for bond analytics.
//!
//! - Yield to price to yield recovers the yield
//! - Price is strictly decreasing in yield
//! - Key-rate DV01s sum to the parallel DV01
//! - The Z-spread of the curve price is zero
//! - OAS never exceeds the Z-spread for a callable bond
//! - A corporate bond reproduces its pinned yield and duration

use approx::assert_relative_eq;
use proptest::prelude::*;

use coupon_analytics::prelude::*;
use coupon_analytics::risk::standard_key_rate_dv01s;
use coupon_bonds::types::{CallSchedule, ExerciseStyle};
use coupon_bonds::{CallableBond, FixedRateBond};
use coupon_core::{Compounding, Date};
use coupon_curves::{DiscountCurve, DiscountCurveBuilder};
use coupon_math::solvers::SolverConfig;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn settle() -> Date {
    date(2025, 3, 3)
}

fn curve() -> DiscountCurve {
    DiscountCurveBuilder::new(settle())
        .add_zero_rate(0.5, 0.043)
        .add_zero_rate(1.0, 0.041)
        .add_zero_rate(2.0, 0.039)
        .add_zero_rate(5.0, 0.040)
        .add_zero_rate(10.0, 0.043)
        .add_zero_rate(20.0, 0.046)
        .add_zero_rate(30.0, 0.045)
        .build()
        .unwrap()
}

fn bond(years: i32, coupon: f64) -> FixedRateBond {
    FixedRateBond::builder()
        .coupon_percent(coupon)
        .issue_date(date(2024, 11, 15))
        .maturity(date(2024 + years, 11, 15))
        .us_treasury()
        .build()
        .unwrap()
}

fn arb_bond() -> impl Strategy<Value = FixedRateBond> {
    (1i32..=30, 0.0f64..10.0).prop_map(|(years, coupon)| bond(years, (coupon * 8.0).round() / 8.0))
}

fn boeing() -> FixedRateBond {
    FixedRateBond::builder()
        .coupon_percent(7.5)
        .issue_date(date(2005, 5, 31))
        .maturity(date(2025, 6, 15))
        .us_corporate()
        .build()
        .unwrap()
}

// =============================================================================
// PRICE AND YIELD
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn yield_round_trips(b in arb_bond(), y in 0.001f64..0.15) {
        let clean = clean_price_from_yield(&b, y, settle(), Compounding::SemiAnnual).unwrap();
        let back = yield_from_price(&b, clean, settle(), Compounding::SemiAnnual, &SolverConfig::default())
            .unwrap();
        prop_assert!((back - y).abs() < 1e-8, "{} vs {}", back, y);
    }

    #[test]
    fn price_decreases_in_yield(b in arb_bond(), y in -0.005f64..0.15, dy in 1e-4f64..0.02) {
        let low = price_from_yield(&b, y, settle(), Compounding::SemiAnnual).unwrap();
        let high = price_from_yield(&b, y + dy, settle(), Compounding::SemiAnnual).unwrap();
        prop_assert!(high < low);
    }

    #[test]
    fn z_spread_of_curve_price_is_zero(b in arb_bond()) {
        let curve = curve();
        let dirty = price_from_curve(&b, &curve, settle()).unwrap();
        let z = z_spread(&b, &curve, dirty, settle()).unwrap();
        prop_assert!(z.abs() < 1e-8, "{}", z);
    }
}

#[test]
fn corporate_reference_bond() {
    let bond = boeing();
    let settle = date(2020, 4, 29);
    let pricing = PricingResult::from_clean_price(&bond, 110.503, settle, &PricingConfig::default())
        .unwrap();
    assert_eq!(pricing.compounding, Compounding::SemiAnnual);
    // 30/360 from 2019-12-15: 134 days of a 180 day period
    assert_relative_eq!(pricing.accrued, 3.75 * 134.0 / 180.0, epsilon = 1e-10);
    assert_relative_eq!(pricing.yield_to_maturity, 0.051_417_687_449_054_17, epsilon = 1e-5);

    let risk = RiskMetrics::from_yield(&bond, pricing.yield_to_maturity, settle, pricing.compounding)
        .unwrap();
    assert_relative_eq!(risk.modified_duration, 4.180_655_6, epsilon = 1e-3);
    assert!(risk.macaulay_duration > risk.modified_duration);
}

// =============================================================================
// RISK
// =============================================================================

#[test]
fn key_rates_reconcile_with_parallel() {
    let curve = curve();
    for (years, coupon) in [(2, 4.0), (7, 4.25), (10, 4.5), (30, 4.75)] {
        let b = bond(years, coupon);
        let profile = key_rate_dv01s(&b, &curve, settle(), None).unwrap();
        let parallel = curve_dv01(&SpreadPricer::new(&b, settle()), &curve).unwrap();
        assert_relative_eq!(profile.total_dv01(), parallel, max_relative = 1e-6);
        assert!(profile.entries.iter().all(|e| e.dv01 >= -1e-12));
    }
}

#[test]
fn standard_tenors_reconcile_with_parallel() {
    let curve = curve();
    let b = bond(10, 4.5);
    let pricer = SpreadPricer::new(&b, settle());
    let profile = standard_key_rate_dv01s(&pricer, &curve).unwrap();
    let parallel = curve_dv01(&pricer, &curve).unwrap();
    assert_relative_eq!(profile.total_dv01(), parallel, max_relative = 1e-6);
}

// =============================================================================
// OPTIONS
// =============================================================================

#[test]
fn oas_never_exceeds_z_spread() {
    let curve = curve();
    let calc = OasCalculator::new(OasConfig::default()).unwrap();
    for (coupon, call_price) in [(3.0, 100.0), (4.5, 100.0), (6.0, 101.0), (8.0, 100.0)] {
        let base = bond(12, coupon);
        let calls = CallSchedule::new(ExerciseStyle::Bermudan).with_entry(date(2028, 11, 15), call_price);
        let callable = CallableBond::new(base.clone(), calls).unwrap();
        for spread in [0.0, 0.01, 0.025] {
            let dirty = price_with_spread(&base, &curve, settle(), spread).unwrap() - 0.5;
            let result = calc.calculate(&callable, &curve, dirty, settle()).unwrap();
            assert!(
                result.oas <= result.z_spread + 1e-6,
                "coupon {coupon}: oas {} > z {}",
                result.oas,
                result.z_spread
            );
        }
    }
}
