//! Floating rate notes.
//!
//! Coupons pay an index rate plus a quoted margin, optionally collared by a
//! cap and a floor. The index is projected from a forward curve period by
//! period; the period already fixing uses the current fixing.

use log::debug;

use coupon_core::calendars::BusinessDayConvention;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{CashFlow, CashFlowKind, Date, Frequency};
use coupon_curves::Curve;

use crate::cashflows::{CouponPeriod, Schedule, ScheduleConfig};
use crate::error::{BondError, BondResult};
use crate::traits::Bond;
use crate::types::CalendarId;

/// A floating rate note.
///
/// Without a curve the note behaves as a fixed rate bond paying the current
/// coupon (fixing plus margin, collared) every period. With a curve,
/// [`projected_cash_flows`](Self::projected_cash_flows) projects each coupon
/// from the simple forward rate over its accrual period.
///
/// ```rust
/// use coupon_bonds::prelude::*;
/// use coupon_core::Date;
///
/// let frn = FloatingRateNote::builder()
///     .identifier("FRN 2028")
///     .issue_date(Date::from_ymd(2025, 3, 15).unwrap())
///     .maturity(Date::from_ymd(2028, 3, 15).unwrap())
///     .margin_bps(85.0)
///     .current_fixing(0.043)
///     .build()
///     .unwrap();
///
/// assert!((frn.coupon_rate() - 0.0515).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingRateNote {
    identifier: String,
    issue_date: Date,
    maturity: Date,
    frequency: Frequency,
    day_count: DayCountConvention,
    margin: f64,
    current_fixing: Option<f64>,
    cap: Option<f64>,
    floor: Option<f64>,
    settlement_days: u32,
    calendar: CalendarId,
    business_day_convention: BusinessDayConvention,
    face_value: f64,
    schedule: Schedule,
}

impl FloatingRateNote {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> FloatingRateNoteBuilder {
        FloatingRateNoteBuilder::default()
    }

    /// Quoted margin over the index as a decimal.
    #[must_use]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Quoted margin in basis points.
    #[must_use]
    pub fn margin_bps(&self) -> f64 {
        self.margin * 10_000.0
    }

    /// Index fixing of the current period, if known.
    #[must_use]
    pub fn current_fixing(&self) -> Option<f64> {
        self.current_fixing
    }

    /// Coupon cap.
    #[must_use]
    pub fn cap(&self) -> Option<f64> {
        self.cap
    }

    /// Coupon floor.
    #[must_use]
    pub fn floor(&self) -> Option<f64> {
        self.floor
    }

    /// Coupon rate for an index rate: index plus margin, floored then
    /// capped.
    #[must_use]
    pub fn effective_rate(&self, index_rate: f64) -> f64 {
        let mut rate = index_rate + self.margin;
        if let Some(floor) = self.floor {
            rate = rate.max(floor);
        }
        if let Some(cap) = self.cap {
            rate = rate.min(cap);
        }
        rate
    }

    /// Index rate projected over `period` from `curve`.
    ///
    /// Periods starting before the curve's reference date have fixed
    /// already: they use the current fixing, or the forward from the
    /// reference date when no fixing was given.
    pub fn projected_index<C: Curve + ?Sized>(
        &self,
        curve: &C,
        period: &CouponPeriod,
    ) -> BondResult<f64> {
        let reference = curve.reference_date();
        let start = if period.accrual_start < reference {
            if let Some(fixing) = self.current_fixing {
                return Ok(fixing);
            }
            reference
        } else {
            period.accrual_start
        };
        let end = period.accrual_end;
        if end <= start {
            return Ok(self.current_fixing.unwrap_or(0.0));
        }
        let tau = self.day_count.year_fraction_f64(start, end);
        let df_start = curve.discount_factor_at(start)?;
        let df_end = curve.discount_factor_at(end)?;
        Ok((df_start / df_end - 1.0) / tau)
    }

    /// Flows after `settlement` with coupons projected from `curve`.
    pub fn projected_cash_flows<C: Curve + ?Sized>(
        &self,
        curve: &C,
        settlement: Date,
    ) -> BondResult<Vec<CashFlow>> {
        self.check_settlement(settlement)?;
        let periods = self.schedule.periods();
        let last = periods.len().saturating_sub(1);

        let mut flows = Vec::with_capacity(periods.len());
        for (i, period) in periods.iter().enumerate() {
            if period.accrual_end <= settlement || period.payment_date <= settlement {
                continue;
            }
            let rate = self.effective_rate(self.projected_index(curve, period)?);
            let tau = self
                .day_count
                .year_fraction_f64(period.accrual_start, period.accrual_end);
            let flow = CashFlow::coupon(
                period.payment_date,
                self.face_value * rate * tau,
                period.accrual_start,
                period.accrual_end,
            );
            flows.push(if i == last {
                flow.plus(self.face_value)
                    .with_kind(CashFlowKind::CouponAndPrincipal)
            } else {
                flow.with_kind(CashFlowKind::FloatingCoupon)
            });
        }
        Ok(flows)
    }
}

impl Bond for FloatingRateNote {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn issue_date(&self) -> Date {
        self.issue_date
    }

    fn maturity(&self) -> Date {
        self.maturity
    }

    fn coupon_rate(&self) -> f64 {
        self.effective_rate(self.current_fixing.unwrap_or(0.0))
    }

    fn frequency(&self) -> Frequency {
        self.frequency
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn face_value(&self) -> f64 {
        self.face_value
    }

    fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    fn calendar(&self) -> CalendarId {
        self.calendar
    }

    fn business_day_convention(&self) -> BusinessDayConvention {
        self.business_day_convention
    }

    fn end_of_month(&self) -> bool {
        false
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn coupon_kind(&self) -> CashFlowKind {
        CashFlowKind::FloatingCoupon
    }
}

/// Builder for [`FloatingRateNote`].
///
/// Issue date and maturity are required. Defaults: quarterly, ACT/360,
/// zero margin, T+2, weekend calendar, Modified Following, face 100.
#[derive(Debug, Clone, Default)]
pub struct FloatingRateNoteBuilder {
    identifier: Option<String>,
    issue_date: Option<Date>,
    maturity: Option<Date>,
    frequency: Option<Frequency>,
    day_count: Option<DayCountConvention>,
    margin: Option<f64>,
    current_fixing: Option<f64>,
    cap: Option<f64>,
    floor: Option<f64>,
    settlement_days: Option<u32>,
    calendar: Option<CalendarId>,
    business_day_convention: Option<BusinessDayConvention>,
    face_value: Option<f64>,
}

impl FloatingRateNoteBuilder {
    /// Sets the identifier.
    #[must_use]
    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = Some(id.into());
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity.
    #[must_use]
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity = Some(date);
        self
    }

    /// Sets the reset and payment frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Sets the quoted margin as a decimal.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Sets the quoted margin in basis points.
    #[must_use]
    pub fn margin_bps(self, bps: f64) -> Self {
        self.margin(bps / 10_000.0)
    }

    /// Sets the index fixing of the current period.
    #[must_use]
    pub fn current_fixing(mut self, rate: f64) -> Self {
        self.current_fixing = Some(rate);
        self
    }

    /// Sets a coupon cap.
    #[must_use]
    pub fn cap(mut self, rate: f64) -> Self {
        self.cap = Some(rate);
        self
    }

    /// Sets a coupon floor.
    #[must_use]
    pub fn floor(mut self, rate: f64) -> Self {
        self.floor = Some(rate);
        self
    }

    /// Sets the settlement lag.
    #[must_use]
    pub fn settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = Some(days);
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Sets the payment date convention.
    #[must_use]
    pub fn business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.business_day_convention = Some(convention);
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn face_value(mut self, face: f64) -> Self {
        self.face_value = Some(face);
        self
    }

    /// Validates the terms and generates the schedule.
    pub fn build(self) -> BondResult<FloatingRateNote> {
        let issue_date = self
            .issue_date
            .ok_or_else(|| BondError::missing_field("issue_date"))?;
        let maturity = self
            .maturity
            .ok_or_else(|| BondError::missing_field("maturity"))?;
        if maturity <= issue_date {
            return Err(BondError::invalid_spec("maturity must be after issue_date"));
        }
        let frequency = self.frequency.unwrap_or(Frequency::Quarterly);
        if frequency.is_zero() {
            return Err(BondError::invalid_spec("floating rate notes need a reset frequency"));
        }
        let margin = self.margin.unwrap_or(0.0);
        if !margin.is_finite() {
            return Err(BondError::invalid_spec("margin must be finite"));
        }
        if let (Some(cap), Some(floor)) = (self.cap, self.floor) {
            if cap < floor {
                return Err(BondError::invalid_spec(format!(
                    "cap {cap} is below floor {floor}"
                )));
            }
        }
        let face_value = self.face_value.unwrap_or(100.0);
        if !(face_value.is_finite() && face_value > 0.0) {
            return Err(BondError::invalid_spec("face_value must be positive"));
        }

        let calendar = self.calendar.unwrap_or_default();
        let business_day_convention = self
            .business_day_convention
            .unwrap_or(BusinessDayConvention::ModifiedFollowing);
        let config = ScheduleConfig::new(issue_date, maturity, frequency)
            .with_calendar(calendar)
            .with_business_day_convention(business_day_convention)
            .with_end_of_month(false);
        let schedule = Schedule::generate(&config)?;

        let identifier = self
            .identifier
            .unwrap_or_else(|| format!("FRN +{:.0}bp {maturity}", margin * 10_000.0));
        debug!("built floating rate note {identifier} with {} periods", schedule.len());

        Ok(FloatingRateNote {
            identifier,
            issue_date,
            maturity,
            frequency,
            day_count: self.day_count.unwrap_or(DayCountConvention::Act360),
            margin,
            current_fixing: self.current_fixing,
            cap: self.cap,
            floor: self.floor,
            settlement_days: self.settlement_days.unwrap_or(2),
            calendar,
            business_day_convention,
            face_value,
            schedule,
        })
    }
}
