//! Benchmarks for bond pricing, spreads and risk.
//!
//! Run with: cargo bench -p coupon-analytics

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use coupon_analytics::prelude::*;
use coupon_bonds::types::{CallSchedule, ExerciseStyle};
use coupon_bonds::{CallableBond, FixedRateBond};
use coupon_core::{Compounding, Date};
use coupon_curves::prelude::*;
use coupon_math::solvers::SolverConfig;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn settle() -> Date {
    Date::from_ymd(2025, 1, 2).unwrap()
}

fn curve() -> DiscountCurve {
    DiscountCurveBuilder::new(settle())
        .add_zero_rate(0.25, 0.043)
        .add_zero_rate(1.0, 0.041)
        .add_zero_rate(2.0, 0.040)
        .add_zero_rate(5.0, 0.041)
        .add_zero_rate(10.0, 0.044)
        .add_zero_rate(30.0, 0.047)
        .build()
        .unwrap()
}

fn bond(years: i32, coupon: f64) -> FixedRateBond {
    FixedRateBond::builder()
        .coupon_percent(coupon)
        .issue_date(Date::from_ymd(2024, 6, 15).unwrap())
        .maturity(Date::from_ymd(2024 + years, 6, 15).unwrap())
        .us_corporate()
        .build()
        .unwrap()
}

fn bonds(count: usize) -> Vec<FixedRateBond> {
    (0..count)
        .map(|i| bond(2 + (i % 28) as i32, 3.0 + (i % 9) as f64 * 0.5))
        .collect()
}

fn callable() -> CallableBond {
    let calls = CallSchedule::new(ExerciseStyle::Bermudan)
        .with_entry(Date::from_ymd(2027, 6, 15).unwrap(), 100.0);
    CallableBond::new(bond(10, 5.5), calls).unwrap()
}

fn swap_instruments() -> Vec<Box<dyn CurveInstrument>> {
    let spot = settle();
    let mut instruments: Vec<Box<dyn CurveInstrument>> = vec![
        Box::new(Deposit::from_tenor(spot, "3M", 0.0435).unwrap()),
        Box::new(Deposit::from_tenor(spot, "6M", 0.0428).unwrap()),
        Box::new(Deposit::from_tenor(spot, "1Y", 0.0415).unwrap()),
    ];
    for (tenor, rate) in [("2Y", 0.0402), ("3Y", 0.0400), ("5Y", 0.0405), ("7Y", 0.0412), ("10Y", 0.0425)] {
        instruments.push(Box::new(Swap::from_tenor(spot, tenor, rate).unwrap()));
    }
    instruments
}

// =============================================================================
// PRICE AND YIELD
// =============================================================================

fn bench_yield(c: &mut Criterion) {
    let mut group = c.benchmark_group("yield");
    let solver = SolverConfig::default();

    for years in [2, 10, 30] {
        let b = bond(years, 4.5);
        group.bench_with_input(BenchmarkId::new("price_from_yield", years), &b, |bench, b| {
            bench.iter(|| {
                price_from_yield(black_box(b), black_box(0.045), settle(), Compounding::SemiAnnual)
            });
        });
        group.bench_with_input(BenchmarkId::new("yield_from_price", years), &b, |bench, b| {
            bench.iter(|| {
                yield_from_price(
                    black_box(b),
                    black_box(98.75),
                    settle(),
                    Compounding::SemiAnnual,
                    &solver,
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// SPREADS
// =============================================================================

fn bench_spreads(c: &mut Criterion) {
    let mut group = c.benchmark_group("spreads");
    let curve = curve();
    let b = bond(10, 5.0);
    let dirty = price_with_spread(&b, &curve, settle(), 0.011).unwrap();

    group.bench_function("z_spread", |bench| {
        bench.iter(|| z_spread(black_box(&b), &curve, black_box(dirty), settle()));
    });

    let c_bond = callable();
    let c_dirty = dirty - 1.5;
    for steps in [50, 100, 200] {
        let calc = OasCalculator::new(OasConfig::default().with_tree_steps(steps)).unwrap();
        group.bench_with_input(BenchmarkId::new("oas", steps), &calc, |bench, calc| {
            bench.iter(|| calc.calculate(black_box(&c_bond), &curve, black_box(c_dirty), settle()));
        });
    }

    group.finish();
}

// =============================================================================
// RISK
// =============================================================================

fn bench_risk(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk");
    let curve = curve();
    let b = bond(10, 5.0);

    group.bench_function("risk_metrics", |bench| {
        bench.iter(|| RiskMetrics::from_yield(black_box(&b), 0.047, settle(), Compounding::SemiAnnual));
    });
    group.bench_function("key_rate_dv01s", |bench| {
        bench.iter(|| key_rate_dv01s(black_box(&b), &curve, settle(), None));
    });

    group.finish();
}

// =============================================================================
// CURVES AND BATCHES
// =============================================================================

fn bench_bootstrap(c: &mut Criterion) {
    c.bench_function("bootstrap_swap_curve", |bench| {
        bench.iter(|| {
            SequentialBootstrapper::new(settle())
                .add_all(swap_instruments())
                .bootstrap()
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_batch");
    let curve = curve();

    for size in [100, 1_000] {
        let portfolio = bonds(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &portfolio, |bench, p| {
            bench.iter(|| price_batch(black_box(p), &curve, settle()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_yield,
    bench_spreads,
    bench_risk,
    bench_bootstrap,
    bench_batch
);
criterion_main!(benches);
