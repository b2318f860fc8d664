//! Bracket search.

use crate::error::{MathError, MathResult};

/// Growth factor applied to the side with the smaller |f|.
const EXPANSION: f64 = 1.6;

/// Expands `[a, b]` geometrically until `f` changes sign.
///
/// At each step the endpoint with the smaller |f| is pushed outward by
/// `1.6 × (b - a)`. Gives up after `max_expansions` steps.
///
/// # Errors
///
/// [`MathError::InvalidBracket`] with the last interval tried.
pub fn find_bracket<F>(f: F, a: f64, b: f64, max_expansions: u32) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if a == b || !a.is_finite() || !b.is_finite() {
        return Err(MathError::invalid_input(format!(
            "cannot expand degenerate interval [{a}, {b}]"
        )));
    }

    let (mut lo, mut hi) = if a < b { (a, b) } else { (b, a) };
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    for _ in 0..=max_expansions {
        if f_lo.is_finite() && f_hi.is_finite() && f_lo * f_hi <= 0.0 {
            return Ok((lo, hi));
        }

        let width = hi - lo;
        if !f_hi.is_finite() || (f_lo.is_finite() && f_lo.abs() < f_hi.abs()) {
            lo -= EXPANSION * width;
            f_lo = f(lo);
        } else {
            hi += EXPANSION * width;
            f_hi = f(hi);
        }
    }

    Err(MathError::InvalidBracket {
        a: lo,
        b: hi,
        fa: f_lo,
        fb: f_hi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_upward() {
        let (lo, hi) = find_bracket(|x| x - 10.0, 0.0, 1.0, 20).unwrap();
        assert!(lo <= 10.0 && hi >= 10.0);
    }

    #[test]
    fn test_expands_downward() {
        let (lo, hi) = find_bracket(|x| x + 5.0, 0.0, 1.0, 20).unwrap();
        assert!(lo <= -5.0 && hi >= -5.0);
    }

    #[test]
    fn test_gives_up() {
        let err = find_bracket(|x| x * x + 1.0, -1.0, 1.0, 10).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));
    }
}
