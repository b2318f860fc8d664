//! Curve implementations.
//!
//! - [`DiscountCurve`]: pillar-based curve with interpolation and extrapolation
//! - [`DiscountCurveBuilder`]: fluent builder for discount curves
//! - [`NelsonSiegelCurve`] and [`SvenssonCurve`]: parametric curves

mod builder;
mod discount;
mod parametric;

pub use builder::DiscountCurveBuilder;
pub use discount::DiscountCurve;
pub use parametric::{NelsonSiegelCurve, SvenssonCurve};
