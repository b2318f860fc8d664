//! Dated cash flow amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// What a cash flow pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashFlowKind {
    /// Fixed coupon payment.
    Coupon,
    /// Projected floating coupon payment.
    FloatingCoupon,
    /// Redemption of principal.
    Principal,
    /// Final coupon paid together with redemption.
    CouponAndPrincipal,
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowKind::Coupon => "Coupon",
            CashFlowKind::FloatingCoupon => "Floating Coupon",
            CashFlowKind::Principal => "Principal",
            CashFlowKind::CouponAndPrincipal => "Coupon+Principal",
        };
        write!(f, "{name}")
    }
}

/// A single payment on a date.
///
/// `date` is the (business-day adjusted) payment date. Coupon flows also
/// carry their unadjusted accrual period, which yield and accrual
/// calculations use instead of the payment date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date.
    pub date: Date,
    /// Amount paid, in currency units per the bond's face value.
    pub amount: f64,
    /// Flow classification.
    pub kind: CashFlowKind,
    /// Unadjusted accrual start, for coupon flows.
    pub accrual_start: Option<Date>,
    /// Unadjusted accrual end, for coupon flows.
    pub accrual_end: Option<Date>,
}

impl CashFlow {
    /// Creates a cash flow without accrual information.
    #[must_use]
    pub fn new(date: Date, amount: f64, kind: CashFlowKind) -> Self {
        Self {
            date,
            amount,
            kind,
            accrual_start: None,
            accrual_end: None,
        }
    }

    /// Creates a coupon with its accrual period.
    #[must_use]
    pub fn coupon(date: Date, amount: f64, accrual_start: Date, accrual_end: Date) -> Self {
        Self {
            date,
            amount,
            kind: CashFlowKind::Coupon,
            accrual_start: Some(accrual_start),
            accrual_end: Some(accrual_end),
        }
    }

    /// Creates a principal redemption.
    #[must_use]
    pub fn principal(date: Date, amount: f64) -> Self {
        Self::new(date, amount, CashFlowKind::Principal)
    }

    /// Returns a copy with a different kind.
    #[must_use]
    pub fn with_kind(mut self, kind: CashFlowKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns a copy with the amount increased by `extra`.
    #[must_use]
    pub fn plus(mut self, extra: f64) -> Self {
        self.amount += extra;
        self
    }

    /// Accrual end date if known, otherwise the payment date.
    #[must_use]
    pub fn period_end(&self) -> Date {
        self.accrual_end.unwrap_or(self.date)
    }

    /// Returns true if this flow includes principal.
    #[must_use]
    pub fn is_principal(&self) -> bool {
        matches!(
            self.kind,
            CashFlowKind::Principal | CashFlowKind::CouponAndPrincipal
        )
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.6}", self.date, self.kind, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cash_flow_helpers() {
        let start = Date::from_ymd(2024, 12, 15).unwrap();
        let end = Date::from_ymd(2025, 6, 15).unwrap();
        let paid = Date::from_ymd(2025, 6, 16).unwrap();

        let cf = CashFlow::coupon(paid, 3.75, start, end);
        assert_eq!(cf.period_end(), end);
        assert!(!cf.is_principal());

        let last = cf.plus(100.0).with_kind(CashFlowKind::CouponAndPrincipal);
        assert!((last.amount - 103.75).abs() < 1e-12);
        assert!(last.is_principal());
    }
}
