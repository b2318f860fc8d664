//! Domain value types.
//!
//! - [`Date`]: calendar date for financial calculations
//! - [`Frequency`]: coupon payment frequency
//! - [`Compounding`]: interest compounding convention
//! - [`CashFlow`]: dated payment amount

mod cashflow;
mod date;
mod frequency;

pub use cashflow::{CashFlow, CashFlowKind};
pub use date::{days_in_month, is_leap_year, Date};
pub use frequency::{Compounding, Frequency};
