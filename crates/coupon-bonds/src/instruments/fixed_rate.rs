//! Fixed rate bonds.

use log::debug;

use coupon_core::calendars::BusinessDayConvention;
use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};

use crate::cashflows::{Schedule, ScheduleConfig, StubRule};
use crate::error::{BondError, BondResult};
use crate::traits::Bond;
use crate::types::CalendarId;

/// A fixed coupon bond.
///
/// The coupon schedule is generated once at construction; cash flows and
/// accrued interest are derived from it for any settlement date.
///
/// ```rust
/// use coupon_bonds::prelude::*;
/// use coupon_core::Date;
///
/// let bond = FixedRateBond::builder()
///     .identifier("BA 7.5 06/15/25")
///     .coupon_percent(7.5)
///     .issue_date(Date::from_ymd(2005, 5, 31).unwrap())
///     .maturity(Date::from_ymd(2025, 6, 15).unwrap())
///     .us_corporate()
///     .build()
///     .unwrap();
///
/// let settle = Date::from_ymd(2020, 4, 29).unwrap();
/// let accrued = bond.accrued_interest(settle).unwrap();
/// assert!((accrued - 3.75 * 134.0 / 180.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedRateBond {
    identifier: String,
    coupon_rate: f64,
    issue_date: Date,
    maturity: Date,
    first_coupon_date: Option<Date>,
    penultimate_coupon_date: Option<Date>,
    frequency: Frequency,
    day_count: DayCountConvention,
    settlement_days: u32,
    calendar: CalendarId,
    business_day_convention: BusinessDayConvention,
    end_of_month: bool,
    face_value: f64,
    redemption_value: f64,
    ex_dividend_days: Option<u32>,
    schedule: Schedule,
}

impl FixedRateBond {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> FixedRateBondBuilder {
        FixedRateBondBuilder::new()
    }

    /// Explicit first coupon date, if any.
    #[must_use]
    pub fn first_coupon_date(&self) -> Option<Date> {
        self.first_coupon_date
    }

    /// Explicit penultimate coupon date, if any.
    #[must_use]
    pub fn penultimate_coupon_date(&self) -> Option<Date> {
        self.penultimate_coupon_date
    }

    /// The bond redeemed early on `date` at `price` per 100 face.
    ///
    /// Used to value calls and puts as yield-to-workout bonds. A `date`
    /// inside a coupon period ends that period early.
    pub fn to_workout(&self, date: Date, price: f64) -> BondResult<Self> {
        if date <= self.issue_date || date > self.maturity {
            return Err(BondError::invalid_spec(format!(
                "workout date {date} outside ({}, {}]",
                self.issue_date, self.maturity
            )));
        }
        let schedule =
            self.schedule
                .truncated(date, self.calendar, self.business_day_convention)?;
        Ok(Self {
            identifier: format!("{} @ {date}", self.identifier),
            maturity: date,
            penultimate_coupon_date: None,
            redemption_value: price * self.face_value / 100.0,
            schedule,
            ..self.clone()
        })
    }
}

impl Bond for FixedRateBond {
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
        self.coupon_rate
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

    fn redemption_value(&self) -> f64 {
        self.redemption_value
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
        self.end_of_month
    }

    fn ex_dividend_days(&self) -> Option<u32> {
        self.ex_dividend_days
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

/// Builder for [`FixedRateBond`].
///
/// Coupon rate, issue date and maturity are required. Defaults:
/// semi-annual, 30/360 US, T+1, weekend calendar, Following, end-of-month
/// rolling, face and redemption 100.
#[derive(Debug, Clone, Default)]
pub struct FixedRateBondBuilder {
    identifier: Option<String>,
    coupon_rate: Option<f64>,
    issue_date: Option<Date>,
    maturity: Option<Date>,
    first_coupon_date: Option<Date>,
    penultimate_coupon_date: Option<Date>,
    frequency: Option<Frequency>,
    day_count: Option<DayCountConvention>,
    settlement_days: Option<u32>,
    calendar: Option<CalendarId>,
    business_day_convention: Option<BusinessDayConvention>,
    end_of_month: Option<bool>,
    face_value: Option<f64>,
    redemption_value: Option<f64>,
    ex_dividend_days: Option<u32>,
    stub_rule: Option<StubRule>,
}

impl FixedRateBondBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier.
    #[must_use]
    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = Some(id.into());
        self
    }

    /// Sets the coupon rate as a decimal (0.075 for 7.5%).
    #[must_use]
    pub fn coupon_rate(mut self, rate: f64) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the coupon rate in percent (7.5 for 7.5%).
    #[must_use]
    pub fn coupon_percent(self, percent: f64) -> Self {
        self.coupon_rate(percent / 100.0)
    }

    /// Sets the issue (accrual start) date.
    #[must_use]
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity = Some(date);
        self
    }

    /// Sets an explicit first coupon date.
    #[must_use]
    pub fn first_coupon_date(mut self, date: Date) -> Self {
        self.first_coupon_date = Some(date);
        self
    }

    /// Sets an explicit penultimate coupon date.
    #[must_use]
    pub fn penultimate_coupon_date(mut self, date: Date) -> Self {
        self.penultimate_coupon_date = Some(date);
        self
    }

    /// Sets the coupon frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the day count.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Sets the settlement lag in business days.
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

    /// Sets the payment date adjustment.
    #[must_use]
    pub fn business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.business_day_convention = Some(convention);
        self
    }

    /// Sets end-of-month rolling.
    #[must_use]
    pub fn end_of_month(mut self, eom: bool) -> Self {
        self.end_of_month = Some(eom);
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn face_value(mut self, face: f64) -> Self {
        self.face_value = Some(face);
        self
    }

    /// Sets the redemption amount (defaults to the face value).
    #[must_use]
    pub fn redemption_value(mut self, value: f64) -> Self {
        self.redemption_value = Some(value);
        self
    }

    /// Sets the ex-coupon period in business days.
    #[must_use]
    pub fn ex_dividend_days(mut self, days: u32) -> Self {
        self.ex_dividend_days = Some(days);
        self
    }

    /// Sets the stub rule used without explicit stub dates.
    #[must_use]
    pub fn stub_rule(mut self, rule: StubRule) -> Self {
        self.stub_rule = Some(rule);
        self
    }

    /// US corporate conventions.
    ///
    /// - Day count: 30/360 US
    /// - Frequency: Semi-annual
    /// - Settlement: T+2
    /// - Calendar: US Government
    #[must_use]
    pub fn us_corporate(mut self) -> Self {
        self.frequency = Some(Frequency::SemiAnnual);
        self.day_count = Some(DayCountConvention::Thirty360US);
        self.settlement_days = Some(2);
        self.calendar = Some(CalendarId::UsGovernment);
        self.business_day_convention = Some(BusinessDayConvention::Following);
        self.end_of_month = Some(true);
        self
    }

    /// US Treasury note and bond conventions.
    ///
    /// - Day count: ACT/ACT ICMA
    /// - Frequency: Semi-annual
    /// - Settlement: T+1
    /// - Calendar: US Government
    #[must_use]
    pub fn us_treasury(mut self) -> Self {
        self.frequency = Some(Frequency::SemiAnnual);
        self.day_count = Some(DayCountConvention::ActActIcma);
        self.settlement_days = Some(1);
        self.calendar = Some(CalendarId::UsGovernment);
        self.business_day_convention = Some(BusinessDayConvention::Following);
        self.end_of_month = Some(true);
        self
    }

    /// UK Gilt conventions.
    ///
    /// - Day count: ACT/ACT ICMA
    /// - Frequency: Semi-annual
    /// - Settlement: T+1
    /// - Ex-dividend: 7 business days
    #[must_use]
    pub fn uk_gilt(mut self) -> Self {
        self.frequency = Some(Frequency::SemiAnnual);
        self.day_count = Some(DayCountConvention::ActActIcma);
        self.settlement_days = Some(1);
        self.calendar = Some(CalendarId::Uk);
        self.business_day_convention = Some(BusinessDayConvention::Following);
        self.end_of_month = Some(true);
        self.ex_dividend_days = Some(7);
        self
    }

    /// German Bund conventions.
    ///
    /// - Day count: ACT/ACT ICMA
    /// - Frequency: Annual
    /// - Settlement: T+2
    /// - Calendar: TARGET2
    #[must_use]
    pub fn german_bund(mut self) -> Self {
        self.frequency = Some(Frequency::Annual);
        self.day_count = Some(DayCountConvention::ActActIcma);
        self.settlement_days = Some(2);
        self.calendar = Some(CalendarId::Target2);
        self.business_day_convention = Some(BusinessDayConvention::Following);
        self.end_of_month = Some(true);
        self
    }

    /// Builds the bond.
    ///
    /// # Errors
    ///
    /// `MissingField` for absent required terms, `InvalidSpec` for
    /// inconsistent values and `InvalidSchedule` for bad stub dates.
    pub fn build(self) -> BondResult<FixedRateBond> {
        let coupon_rate = self
            .coupon_rate
            .ok_or_else(|| BondError::missing_field("coupon_rate"))?;
        let maturity = self
            .maturity
            .ok_or_else(|| BondError::missing_field("maturity"))?;
        let issue_date = self
            .issue_date
            .ok_or_else(|| BondError::missing_field("issue_date"))?;

        if maturity <= issue_date {
            return Err(BondError::invalid_spec("maturity must be after issue_date"));
        }
        if !coupon_rate.is_finite() || coupon_rate < 0.0 {
            return Err(BondError::invalid_spec(format!(
                "coupon_rate must be a non-negative number, got {coupon_rate}"
            )));
        }
        let frequency = self.frequency.unwrap_or(Frequency::SemiAnnual);
        if frequency.is_zero() {
            return Err(BondError::invalid_spec(
                "fixed rate bonds need a coupon frequency; use ZeroCouponBond",
            ));
        }
        let face_value = self.face_value.unwrap_or(100.0);
        if !(face_value.is_finite() && face_value > 0.0) {
            return Err(BondError::invalid_spec("face_value must be positive"));
        }
        let redemption_value = self.redemption_value.unwrap_or(face_value);
        if !(redemption_value.is_finite() && redemption_value > 0.0) {
            return Err(BondError::invalid_spec("redemption_value must be positive"));
        }

        let calendar = self.calendar.unwrap_or_default();
        let business_day_convention = self
            .business_day_convention
            .unwrap_or(BusinessDayConvention::Following);
        let end_of_month = self.end_of_month.unwrap_or(true);

        let mut config = ScheduleConfig::new(issue_date, maturity, frequency)
            .with_calendar(calendar)
            .with_business_day_convention(business_day_convention)
            .with_end_of_month(end_of_month)
            .with_stub_rule(self.stub_rule.unwrap_or_default());
        config.first_coupon = self.first_coupon_date;
        config.penultimate_coupon = self.penultimate_coupon_date;
        let schedule = Schedule::generate(&config)?;

        let identifier = self
            .identifier
            .unwrap_or_else(|| format!("{:.3}% {maturity}", coupon_rate * 100.0));
        debug!("built fixed rate bond {identifier} with {} periods", schedule.len());

        Ok(FixedRateBond {
            identifier,
            coupon_rate,
            issue_date,
            maturity,
            first_coupon_date: self.first_coupon_date,
            penultimate_coupon_date: self.penultimate_coupon_date,
            frequency,
            day_count: self.day_count.unwrap_or(DayCountConvention::Thirty360US),
            settlement_days: self.settlement_days.unwrap_or(1),
            calendar,
            business_day_convention,
            end_of_month,
            face_value,
            redemption_value,
            ex_dividend_days: self.ex_dividend_days,
            schedule,
        })
    }
}
