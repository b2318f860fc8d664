//! # Coupon Math
//!
//! Numerical building blocks for the Coupon fixed income engine.
//!
//! - **Solvers**: Newton-Raphson, Brent, bisection, secant, and a Newton
//!   first / Brent fallback hybrid
//! - **Interpolation**: linear, log-linear, natural cubic spline, Hagan-West
//!   monotone convex, Nelson-Siegel and Svensson
//! - **Extrapolation**: flat, linear and Smith-Wilson
//! - **Optimization**: Levenberg-Marquardt nonlinear least squares
//! - **Linear Algebra**: tridiagonal and dense solves
//!
//! All routines work on `f64` and never panic on bad input; failures are
//! reported through [`MathError`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod extrapolation;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::extrapolation::{
        ExtrapolationMethod, Extrapolator, FlatExtrapolator, LinearExtrapolator, SmithWilson,
    };
    pub use crate::interpolation::{
        CubicSpline, Interpolator, LinearInterpolator, LogLinearInterpolator, MonotoneConvex,
        NelsonSiegel, Svensson,
    };
    pub use crate::optimization::{levenberg_marquardt, LmConfig, LmResult};
    pub use crate::solvers::{
        bisection, brent, find_bracket, hybrid, hybrid_numerical, newton_raphson,
        newton_raphson_numerical, secant, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
