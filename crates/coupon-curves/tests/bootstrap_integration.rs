//! Integration test: bootstrap a government curve from bills and coupon
//! bonds priced off a known Nelson-Siegel curve, then check repricing and
//! the shape of the result.

use coupon_core::{Compounding, Date, Frequency};
use coupon_curves::prelude::*;
use coupon_math::interpolation::NelsonSiegel;
use proptest::prelude::*;

fn spot() -> Date {
    Date::from_ymd(2025, 12, 1).unwrap()
}

fn truth() -> NelsonSiegelCurve {
    NelsonSiegelCurve::new(
        spot(),
        NelsonSiegel::new(0.046, -0.008, -0.012, 1.8).unwrap(),
        30.0,
    )
}

/// Bills and bonds priced exactly off `truth()`.
fn government_instruments() -> Vec<Box<dyn CurveInstrument>> {
    let curve = truth();
    let mut instruments: Vec<Box<dyn CurveInstrument>> = Vec::new();

    for months in [1, 3, 6, 12] {
        let maturity = spot().add_months(months).unwrap();
        let price = 100.0 * curve.discount_factor_at(maturity).unwrap();
        instruments.push(Box::new(
            BondInstrument::zero_coupon(spot(), maturity, price).unwrap(),
        ));
    }

    for (years, coupon) in [
        (2, 0.03375),
        (3, 0.035),
        (5, 0.035),
        (7, 0.0375),
        (10, 0.04),
        (20, 0.04625),
        (30, 0.04625),
    ] {
        let maturity = spot().add_years(years).unwrap();
        let at_par =
            BondInstrument::new(spot(), maturity, coupon, Frequency::SemiAnnual, 100.0).unwrap();
        // pv is (model dirty − quoted dirty) / 100 at unit notional
        let clean = 100.0 + 100.0 * at_par.pv(&curve).unwrap();
        instruments.push(Box::new(
            BondInstrument::new(spot(), maturity, coupon, Frequency::SemiAnnual, clean).unwrap(),
        ));
    }
    instruments
}

#[test]
fn test_government_curve_sequential() {
    for method in [
        InterpolationMethod::LogLinear,
        InterpolationMethod::Linear,
        InterpolationMethod::MonotoneConvex,
    ] {
        let (curve, report) = SequentialBootstrapper::new(spot())
            .with_interpolation(method)
            .add_all(government_instruments())
            .bootstrap_with_report()
            .unwrap();

        assert!(report.is_valid());
        assert!(report.max_repricing_error() < 1e-8, "{method}");
        assert_eq!(curve.len(), 11);

        let expected = truth();
        for t in [0.5, 2.0, 5.0, 10.0, 30.0] {
            let fitted = curve.zero_rate(t, Compounding::Continuous).unwrap();
            let exact = expected.zero_rate(t, Compounding::Continuous).unwrap();
            assert!(
                (fitted - exact).abs() < 2e-4,
                "{method} at {t}: {fitted} vs {exact}"
            );
        }
    }
}

#[test]
fn test_government_curve_global_matches_sequential() {
    let sequential = SequentialBootstrapper::new(spot())
        .with_interpolation(InterpolationMethod::LogLinear)
        .add_all(government_instruments())
        .bootstrap()
        .unwrap();
    let global = GlobalBootstrapper::new(spot())
        .with_interpolation(InterpolationMethod::LogLinear)
        .add_all(government_instruments())
        .fit()
        .unwrap();

    for t in [0.25, 1.0, 3.0, 7.0, 20.0] {
        let a = sequential.discount_factor(t).unwrap();
        let b = global.curve.discount_factor(t).unwrap();
        assert!((a - b).abs() < 1e-8, "t={t}: {a} vs {b}");
    }
}

#[test]
fn test_nelson_siegel_fit_to_bonds() {
    let fit = GlobalBootstrapper::new(spot())
        .with_model(GlobalModel::NelsonSiegel)
        .add_all(government_instruments())
        .fit()
        .unwrap();
    assert!(fit.rms < 1e-7, "rms {}", fit.rms);
    let params = fit.curve.parameters();
    assert!((params[0] - 0.046).abs() < 1e-4);
}

#[test]
fn test_key_rate_bumps_sum_to_parallel() {
    let curve = SequentialBootstrapper::new(spot())
        .add_all(government_instruments())
        .bootstrap()
        .unwrap();
    let bond = BondInstrument::new(
        spot(),
        spot().add_years(12).unwrap(),
        0.045,
        Frequency::SemiAnnual,
        100.0,
    )
    .unwrap();

    // central differences, so the sums agree beyond first order
    let parallel = (bond.pv(&ParallelBump::new(-1.0).apply(&curve)).unwrap()
        - bond.pv(&ParallelBump::new(1.0).apply(&curve)).unwrap())
        / 2.0;
    let down = key_rate_profile(STANDARD_KEY_TENORS, -1.0);
    let up = key_rate_profile(STANDARD_KEY_TENORS, 1.0);
    let key_rate_total: f64 = down
        .into_iter()
        .zip(up)
        .map(|(d, u)| {
            (bond.pv(&d.apply(&curve)).unwrap() - bond.pv(&u.apply(&curve)).unwrap()) / 2.0
        })
        .sum();

    assert!(parallel > 0.0);
    assert!(
        (key_rate_total - parallel).abs() < 1e-5 * parallel,
        "{key_rate_total} vs {parallel}"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_curve_reprices(
        base in 0.005f64..0.06,
        steps in proptest::collection::vec(-0.003f64..0.003, 6),
    ) {
        let tenors = ["1Y", "2Y", "3Y", "5Y", "7Y", "10Y"];
        let mut bootstrapper = SequentialBootstrapper::new(spot())
            .with_interpolation(InterpolationMethod::LogLinear)
            .with_validation(ValidationConfig::repricing_only())
            .add(Deposit::from_tenor(spot(), "6M", base).unwrap());
        let mut rate = base;
        for (tenor, step) in tenors.iter().zip(&steps) {
            rate += step;
            bootstrapper = bootstrapper.add(Swap::from_tenor(spot(), tenor, rate).unwrap());
        }
        let (curve, report) = bootstrapper.bootstrap_with_report().unwrap();
        prop_assert!(report.max_repricing_error() < 1e-8);
        prop_assert!(curve.discount_factors().iter().all(|df| *df > 0.0));
    }
}
