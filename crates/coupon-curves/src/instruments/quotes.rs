//! Market quotes and their conversion to instruments.
//!
//! | Kind    | `rate` holds            | Instrument            |
//! |---------|-------------------------|-----------------------|
//! | Deposit | simple rate (ACT/360)   | [`Deposit`]           |
//! | Fra     | contract rate           | [`Fra`]               |
//! | Future  | price (`100 − rate`)    | [`RateFuture`]        |
//! | Swap    | par fixed rate          | [`Swap`]              |
//! | Ois     | par fixed rate          | [`Ois`]               |
//! | Bill    | price per 100           | [`BondInstrument`]    |

use coupon_core::daycounts::DayCountConvention;
use coupon_core::{Date, Frequency};
use serde::{Deserialize, Serialize};

use super::{add_tenor, BondInstrument, CurveInstrument, Deposit, Fra, Ois, RateFuture, Swap};
use crate::error::{CurveError, CurveResult};

/// Instrument kind for a [`CurveQuote`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuoteKind {
    /// Cash deposit from spot to the tenor.
    Deposit,
    /// FRA from `start` to the tenor, both measured from spot.
    Fra {
        /// Start tenor, e.g. `"3M"`.
        start: String,
    },
    /// Three-month future starting at the tenor; `rate` is the price.
    Future {
        /// Convexity adjustment in rate units.
        convexity_adjustment: f64,
    },
    /// Swap from spot with the given fixed leg frequency.
    Swap {
        /// Fixed leg frequency.
        frequency: Frequency,
    },
    /// Overnight index swap from spot.
    Ois,
    /// Zero-coupon bill from spot; `rate` is the price per 100.
    Bill,
}

/// A market quote for one curve instrument.
///
/// ```rust
/// use coupon_core::Date;
/// use coupon_curves::instruments::{build_instruments, CurveQuote};
///
/// let spot = Date::from_ymd(2025, 1, 2).unwrap();
/// let quotes = [CurveQuote::deposit("3M", 0.043), CurveQuote::ois("2Y", 0.041)];
/// let instruments = build_instruments(spot, &quotes).unwrap();
/// assert_eq!(instruments.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveQuote {
    /// Tenor from spot (`"ON"`, `"3M"`, `"10Y"`).
    pub tenor: String,
    /// Quoted rate or price, see [`QuoteKind`].
    pub rate: f64,
    /// Instrument kind.
    pub kind: QuoteKind,
}

impl CurveQuote {
    /// Creates a quote.
    #[must_use]
    pub fn new(tenor: impl Into<String>, rate: f64, kind: QuoteKind) -> Self {
        Self {
            tenor: tenor.into(),
            rate,
            kind,
        }
    }

    /// Deposit rate quote.
    #[must_use]
    pub fn deposit(tenor: impl Into<String>, rate: f64) -> Self {
        Self::new(tenor, rate, QuoteKind::Deposit)
    }

    /// Annual swap rate quote.
    #[must_use]
    pub fn swap(tenor: impl Into<String>, rate: f64) -> Self {
        Self::new(
            tenor,
            rate,
            QuoteKind::Swap {
                frequency: Frequency::Annual,
            },
        )
    }

    /// OIS rate quote.
    #[must_use]
    pub fn ois(tenor: impl Into<String>, rate: f64) -> Self {
        Self::new(tenor, rate, QuoteKind::Ois)
    }

    /// Builds the instrument this quote describes.
    pub fn to_instrument(&self, spot: Date) -> CurveResult<Box<dyn CurveInstrument>> {
        if !self.rate.is_finite() {
            return Err(CurveError::invalid_input(format!(
                "non-finite quote for {}",
                self.tenor
            )));
        }
        let end = add_tenor(spot, &self.tenor)?;
        let instrument: Box<dyn CurveInstrument> = match &self.kind {
            QuoteKind::Deposit => Box::new(Deposit::new(spot, end, self.rate)),
            QuoteKind::Fra { start } => {
                Box::new(Fra::new(add_tenor(spot, start)?, end, self.rate)?)
            }
            QuoteKind::Future {
                convexity_adjustment,
            } => Box::new(
                RateFuture::new(end, end.add_months(3)?, self.rate)?
                    .with_convexity_adjustment(*convexity_adjustment),
            ),
            QuoteKind::Swap { frequency } => Box::new(Swap::with_conventions(
                spot,
                end,
                self.rate,
                *frequency,
                DayCountConvention::Act360,
            )?),
            QuoteKind::Ois => Box::new(Ois::new(spot, end, self.rate)?),
            QuoteKind::Bill => Box::new(BondInstrument::zero_coupon(spot, end, self.rate)?),
        };
        Ok(instrument)
    }
}

/// Converts quotes to instruments, in input order.
pub fn build_instruments(
    spot: Date,
    quotes: &[CurveQuote],
) -> CurveResult<Vec<Box<dyn CurveInstrument>>> {
    quotes.iter().map(|q| q.to_instrument(spot)).collect()
}

/// `(100 − price) / 100`.
#[must_use]
pub fn futures_price_to_rate(price: f64) -> f64 {
    (100.0 - price) / 100.0
}

/// `100 × (1 − rate)`.
#[must_use]
pub fn rate_to_futures_price(rate: f64) -> f64 {
    100.0 * (1.0 - rate)
}
