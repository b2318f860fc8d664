//! Cash flow and accrual behaviour across bond types.

use approx::assert_relative_eq;
use coupon_bonds::prelude::*;
use coupon_core::calendars::BusinessDayConvention;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{CashFlowKind, Date, Frequency};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn treasury() -> FixedRateBond {
    FixedRateBond::builder()
        .identifier("T 4.25 11/15/34")
        .coupon_percent(4.25)
        .issue_date(date(2024, 11, 15))
        .maturity(date(2034, 11, 15))
        .us_treasury()
        .build()
        .unwrap()
}

#[test]
fn flows_strictly_after_settlement() {
    let bond = treasury();
    // on a coupon date the coupon has gone
    let settle = date(2025, 5, 15);
    let flows = bond.cash_flows(settle).unwrap();
    assert_eq!(flows.len(), 19);
    assert!(flows.iter().all(|cf| cf.date > settle));
    assert_eq!(bond.accrued_interest(settle).unwrap(), 0.0);
}

#[test]
fn coupon_paid_before_settlement_is_excluded() {
    // 2025-11-30 is a Sunday, so the coupon is paid on Friday 2025-11-28
    let bond = FixedRateBond::builder()
        .coupon_percent(5.0)
        .issue_date(date(2025, 5, 31))
        .maturity(date(2030, 5, 31))
        .business_day_convention(BusinessDayConvention::Preceding)
        .build()
        .unwrap();
    let first = bond.schedule().periods()[0];
    assert_eq!(first.accrual_end, date(2025, 11, 30));
    assert_eq!(first.payment_date, date(2025, 11, 28));

    let settle = date(2025, 11, 29);
    let flows = bond.cash_flows(settle).unwrap();
    assert!(flows.iter().all(|cf| cf.date > settle));
    assert_eq!(flows[0].accrual_start, Some(date(2025, 11, 30)));
    assert_eq!(flows.len(), bond.yield_times(settle).unwrap().len());

    // the seller kept the coupon, so the buyer is owed the day back
    assert!(bond.is_ex_coupon(settle));
    assert_relative_eq!(
        bond.accrued_interest(settle).unwrap(),
        -2.5 / 180.0,
        epsilon = 1e-12
    );
    assert!(bond.accrued_interest(date(2025, 11, 27)).unwrap() > 2.0);
}

#[test]
fn icma_full_period_pays_coupon_over_frequency() {
    let bond = treasury();
    let flows = bond.cash_flows(date(2025, 1, 2)).unwrap();
    for cf in &flows[..flows.len() - 1] {
        assert_relative_eq!(cf.amount, 2.125, epsilon = 1e-12);
        assert_eq!(cf.kind, CashFlowKind::Coupon);
    }
    let last = flows.last().unwrap();
    assert_eq!(last.kind, CashFlowKind::CouponAndPrincipal);
    assert_relative_eq!(last.amount, 102.125, epsilon = 1e-12);
}

#[test]
fn long_first_coupon_from_explicit_date() {
    let bond = FixedRateBond::builder()
        .coupon_percent(5.0)
        .issue_date(date(2025, 1, 10))
        .maturity(date(2030, 12, 15))
        .first_coupon_date(date(2025, 12, 15))
        .day_count(DayCountConvention::ActActIcma)
        .build()
        .unwrap();
    let first = bond.schedule().periods()[0];
    assert_eq!(first.kind, PeriodKind::FrontStub);
    assert_eq!(first.accrual_end, date(2025, 12, 15));

    let flows = bond.cash_flows(date(2025, 2, 3)).unwrap();
    // notional 2025-06-15..2025-12-15 is one period; 2025-01-10..06-15 is 156 of 182 days
    assert_relative_eq!(flows[0].amount, 2.5 * (1.0 + 156.0 / 182.0), epsilon = 1e-12);
}

#[test]
fn zero_coupon_has_no_accrued() {
    let bond = ZeroCouponBond::new("Z 2031", date(2021, 6, 1), date(2031, 6, 2)).unwrap();
    let settle = date(2025, 9, 17);
    assert_eq!(bond.accrued_interest(settle).unwrap(), 0.0);
    let flows = bond.cash_flows(settle).unwrap();
    assert_eq!(flows.len(), 1);
    assert!(flows[0].is_principal());
}

#[test]
fn settlement_on_or_after_maturity_errors() {
    let bond = treasury();
    for settle in [date(2034, 11, 15), date(2035, 1, 1)] {
        assert!(matches!(
            bond.cash_flows(settle),
            Err(BondError::InvalidSettlement { .. })
        ));
        assert!(bond.accrued_interest(settle).is_err());
    }
}

#[test]
fn settlement_date_skips_holidays() {
    let bond = treasury();
    // Thursday 2025-07-03, T+1 over Independence Day
    assert_eq!(bond.settlement_date(date(2025, 7, 3)), date(2025, 7, 7));
}

#[test]
fn frn_current_coupon_matches_fixed_equivalent() {
    let frn = FloatingRateNote::builder()
        .issue_date(date(2025, 3, 17))
        .maturity(date(2027, 3, 17))
        .frequency(Frequency::SemiAnnual)
        .day_count(DayCountConvention::Thirty360US)
        .margin_bps(25.0)
        .current_fixing(0.0475)
        .build()
        .unwrap();
    let fixed = FixedRateBond::builder()
        .coupon_rate(0.05)
        .issue_date(date(2025, 3, 17))
        .maturity(date(2027, 3, 17))
        .build()
        .unwrap();
    let settle = date(2025, 6, 2);
    assert_relative_eq!(
        frn.accrued_interest(settle).unwrap(),
        fixed.accrued_interest(settle).unwrap(),
        epsilon = 1e-12
    );
}

proptest! {
    #[test]
    fn accrued_plus_remaining_is_full_coupon(offset in 0i64..3650) {
        let bond = treasury();
        let settle = date(2024, 11, 15).add_days(offset);
        let period = *bond.schedule().period_containing(settle).unwrap();
        let rules = bond.accrual_rules();
        let accrued = rules.fraction(&period, period.accrual_start, settle);
        let remaining = rules.fraction(&period, settle, period.accrual_end);
        prop_assert!((accrued + remaining - 1.0).abs() < 1e-12);
        prop_assert!(accrued >= 0.0 && accrued < 1.0);
    }

    #[test]
    fn yield_times_increase(offset in 0i64..3600) {
        let bond = treasury();
        let settle = date(2024, 11, 15).add_days(offset);
        let times = bond.yield_times(settle).unwrap();
        prop_assert!(times[0] > 0.0 && times[0] <= 0.5 + 1e-12);
        prop_assert!(times.windows(2).all(|w| (w[1] - w[0] - 0.5).abs() < 1e-12));
    }
}
