//! # Number Formatting
//!
//! Fixed-point text for titles, tick labels and tooltips, with browser
//! `Number.prototype.toFixed` semantics.
//!
//! Rust's `{:.N}` rounds exact binary ties to even (`0.625` → `"0.62"`);
//! report text rounds them away from zero (`"0.63"`). [`to_fixed`] works on
//! the exact decimal expansion of the `f64` so only true ties round up.

/// Fractional digits of the exact decimal expansion of any `f64`.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Format `value` with `digits` decimals, rounding ties away from zero.
///
/// - Negative values keep their sign even when they round to zero
///   (`-0.001` → `"-0.00"`); `-0.0` itself prints as `"0.00"`.
/// - Non-finite values print as `NaN`, `Infinity`, `-Infinity`.
#[must_use]
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let negative = value < 0.0;
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();
    let round_up = frac_part
        .as_bytes()
        .get(digits)
        .is_some_and(|&next| next >= b'5');

    if round_up {
        increment_decimal(&mut kept);
    }

    let int_len = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(kept[..int_len].iter().map(|&b| char::from(b)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[int_len..].iter().map(|&b| char::from(b)));
    }
    out
}

/// Add one unit in the last place of an ASCII digit string.
fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_away_from_zero() {
        assert_eq!(to_fixed(-1.125, 2), "-1.13");
        assert_eq!(to_fixed(0.625, 2), "0.63");
        assert_eq!(to_fixed(0.25, 1), "0.3");
        assert_eq!(to_fixed(-0.25, 1), "-0.3");
        assert_eq!(to_fixed(2.5, 0), "3");
    }

    #[test]
    fn near_ties_follow_the_binary_value() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(to_fixed(1.005, 2), "1.00");
        // 0.15 is stored as 0.1499999999999999944...
        assert_eq!(to_fixed(0.15, 1), "0.1");
    }

    #[test]
    fn plain_values() {
        assert_eq!(to_fixed(-2.6, 2), "-2.60");
        assert_eq!(to_fixed(3.0, 1), "3.0");
        assert_eq!(to_fixed(-1.2, 2), "-1.20");
        assert_eq!(to_fixed(12.0, 0), "12");
    }

    #[test]
    fn carry_propagates() {
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(9.9951, 2), "10.00");
        assert_eq!(to_fixed(-0.96, 1), "-1.0");
    }

    #[test]
    fn signed_zero() {
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(0.0, 1), "0.0");
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
    }

    #[test]
    fn non_finite() {
        assert_eq!(to_fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
    }
}
