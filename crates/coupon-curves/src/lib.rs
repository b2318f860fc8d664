//! # Coupon Curves
//!
//! Discount curves and their construction for the Coupon fixed income
//! engine.
//!
//! - **Curve trait**: [`Curve`], discount factors by time with derived zero,
//!   forward and instantaneous forward rates
//! - **Curves**: pillar-based [`DiscountCurve`] with four interpolation
//!   schemes and flat, linear or Smith-Wilson extrapolation, plus
//!   Nelson-Siegel and Svensson curves
//! - **Instruments**: deposits, FRAs, futures, swaps, OIS and bonds
//! - **Bootstrap**: sequential and global (Levenberg-Marquardt) fitting,
//!   always followed by validation
//! - **Bumping**: parallel, key-rate and scenario overlays for risk
//!
//! Curves are immutable once built. Times are year fractions ACT/365F from
//! the reference date.
//!
//! ## Quick Start
//!
//! ```rust
//! use coupon_core::{Compounding, Date};
//! use coupon_curves::prelude::*;
//!
//! let curve = DiscountCurveBuilder::new(Date::from_ymd(2025, 1, 2).unwrap())
//!     .add_pillar(0.25, 0.99)
//!     .add_pillar(0.5, 0.98)
//!     .add_pillar(1.0, 0.96)
//!     .add_pillar(2.0, 0.92)
//!     .with_interpolation(InterpolationMethod::MonotoneConvex)
//!     .build()
//!     .unwrap();
//!
//! let df = curve.discount_factor(1.5).unwrap();
//! assert!(df < 0.96 && df > 0.92);
//! let zero = curve.zero_rate(1.5, Compounding::Continuous).unwrap();
//! assert!(zero > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]

pub mod bootstrap;
pub mod bumping;
pub mod curves;
pub mod error;
pub mod instruments;
pub mod interpolation;
pub mod traits;
pub mod validation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        BootstrapConfig, FittedCurve, FitterConfig, GlobalBootstrapper, GlobalFit, GlobalModel,
        SequentialBootstrapper,
    };
    pub use crate::bumping::{
        key_rate_profile, CurveShift, KeyRateBump, ParallelBump, Scenario, ScenarioBump,
        ShiftedCurve, STANDARD_KEY_TENORS,
    };
    pub use crate::curves::{DiscountCurve, DiscountCurveBuilder, NelsonSiegelCurve, SvenssonCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instruments::{
        BondInstrument, CurveInstrument, CurveQuote, Deposit, Fra, InstrumentType, Ois,
        QuoteKind, RateFuture, Swap,
    };
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::traits::Curve;
    pub use crate::validation::{validate_curve, ValidationConfig, ValidationReport};
    pub use coupon_math::extrapolation::ExtrapolationMethod;
}

pub use curves::{DiscountCurve, DiscountCurveBuilder};
pub use error::{CurveError, CurveResult};
pub use interpolation::InterpolationMethod;
pub use traits::Curve;
