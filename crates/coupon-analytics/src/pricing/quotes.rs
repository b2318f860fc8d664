//! Treasury price quotes in 32nds.
//!
//! | quote | price |
//! |-------|-------|
//! | `99-16` | 99 + 16/32 |
//! | `99-16+` | 99 + 16.5/32 |
//! | `99-16 1/4` | 99 + 16.25/32 |
//! | `99-162` | 99 + 16.25/32 (third digit in eighths) |
//! | `99.5` | 99.5 |

use crate::error::{AnalyticsError, AnalyticsResult};

fn bad(quote: &str, reason: &str) -> AnalyticsError {
    AnalyticsError::invalid_input(format!("bad price quote {quote:?}: {reason}"))
}

fn parse_fraction(quote: &str, text: &str) -> AnalyticsResult<f64> {
    let (num, den) = text
        .split_once('/')
        .ok_or_else(|| bad(quote, "expected a fraction"))?;
    let num: u32 = num.trim().parse().map_err(|_| bad(quote, "fraction numerator"))?;
    let den: u32 = den.trim().parse().map_err(|_| bad(quote, "fraction denominator"))?;
    if den == 0 || num >= den {
        return Err(bad(quote, "fraction must be proper"));
    }
    Ok(f64::from(num) / f64::from(den))
}

/// Parses a decimal or 32nds price quote.
///
/// ```rust
/// use coupon_analytics::pricing::parse_fractional_price;
///
/// assert_eq!(parse_fractional_price("99-16+").unwrap(), 99.515625);
/// assert_eq!(parse_fractional_price("101-04 1/4").unwrap(), 101.1328125);
/// ```
pub fn parse_fractional_price(quote: &str) -> AnalyticsResult<f64> {
    let text = quote.trim();
    let Some((handle, rest)) = text.split_once('-') else {
        let price: f64 = text.parse().map_err(|_| bad(quote, "not a number"))?;
        return if price.is_finite() && price >= 0.0 {
            Ok(price)
        } else {
            Err(bad(quote, "not a price"))
        };
    };

    let handle: u32 = handle
        .trim()
        .parse()
        .map_err(|_| bad(quote, "handle must be a whole number"))?;

    let rest = rest.trim();
    let (ticks_text, extra) = match rest.split_once(' ') {
        Some((ticks, fraction)) => (ticks, parse_fraction(quote, fraction)?),
        None => match rest.strip_suffix('+') {
            Some(ticks) => (ticks, 0.5),
            None => (rest, 0.0),
        },
    };

    if !(ticks_text.len() == 2 || ticks_text.len() == 3)
        || !ticks_text.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(bad(quote, "expected two digits of 32nds"));
    }
    let (ticks, eighths) = ticks_text.split_at(2);
    let ticks: u32 = ticks.parse().map_err(|_| bad(quote, "32nds"))?;
    if ticks >= 32 {
        return Err(bad(quote, "32nds must be below 32"));
    }
    let eighths = if eighths.is_empty() {
        0.0
    } else {
        if extra != 0.0 {
            return Err(bad(quote, "eighths digit with a fraction"));
        }
        let e: u32 = eighths.parse().map_err(|_| bad(quote, "eighths"))?;
        if e >= 8 {
            return Err(bad(quote, "eighths digit must be below 8"));
        }
        f64::from(e) / 8.0
    };

    Ok(f64::from(handle) + (f64::from(ticks) + extra + eighths) / 32.0)
}

/// Formats a price in 32nds, rounding to the nearest half 32nd.
#[must_use]
pub fn format_fractional_price(price: f64) -> String {
    let halves = (price * 64.0).round() as i64;
    let handle = halves.div_euclid(64);
    let rem = halves.rem_euclid(64);
    let plus = if rem % 2 == 1 { "+" } else { "" };
    format!("{handle}-{:02}{plus}", rem / 2)
}
