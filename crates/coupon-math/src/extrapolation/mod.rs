//! Extending a zero curve past its last pillar.
//!
//! - [`FlatExtrapolator`]: the last zero rate is held
//! - [`LinearExtrapolator`]: the zero rate continues along its last slope
//! - [`SmithWilson`]: forwards converge to an ultimate forward rate
//!
//! All extrapolators work on continuously compounded zero rates.

mod flat;
mod linear;
mod smith_wilson;

pub use flat::FlatExtrapolator;
pub use linear::LinearExtrapolator;
pub use smith_wilson::SmithWilson;

/// Extends a zero curve beyond its last known point.
pub trait Extrapolator: Send + Sync {
    /// Zero rate at `t > last_t`, given the value and slope at `last_t`.
    fn extrapolate(&self, t: f64, last_t: f64, last_value: f64, last_derivative: f64) -> f64;

    /// Method name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Extrapolation choice for a curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExtrapolationMethod {
    /// Queries past the last pillar fail.
    None,
    /// Hold the last zero rate.
    #[default]
    Flat,
    /// Continue the zero rate along the last slope.
    Linear,
    /// Smith-Wilson, fitted to the pillars up to the last liquid point.
    SmithWilson {
        /// Ultimate forward rate (annually compounded).
        ufr: f64,
        /// Convergence speed.
        alpha: f64,
        /// Last liquid point in years.
        llp: f64,
    },
}

impl ExtrapolationMethod {
    /// EIOPA-style EUR parameters: UFR 3.45%, alpha 0.126, LLP 20y.
    #[must_use]
    pub fn eiopa_eur() -> Self {
        Self::SmithWilson {
            ufr: 0.0345,
            alpha: 0.126,
            llp: 20.0,
        }
    }

    /// True unless this is [`ExtrapolationMethod::None`].
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_flat() {
        assert_eq!(ExtrapolationMethod::default(), ExtrapolationMethod::Flat);
        assert!(ExtrapolationMethod::Linear.is_enabled());
        assert!(!ExtrapolationMethod::None.is_enabled());
    }

    #[test]
    fn test_names() {
        assert_eq!(FlatExtrapolator.name(), "Flat");
        assert_eq!(LinearExtrapolator.name(), "Linear");
    }
}
