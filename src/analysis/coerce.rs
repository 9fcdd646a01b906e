//! Numeric coercion for loosely typed dataset values.
//!
//! Every numeric field passes through [`coerce`] before it reaches the
//! aggregator, so the rest of the pipeline only ever sees `f64`.

use crate::models::RawValue;

/// Coerce a raw dataset value to a number.
///
/// Policy:
/// - numbers are used as-is;
/// - strings are parsed by their longest leading numeric prefix
///   (`"123.45abc"` is `123.45`, `"  -7e2 t"` is `-700`);
/// - anything that yields no number (`"abc"`, `""`, missing) becomes `0.0`.
///
/// A NaN or negative zero result is also reported as `0.0`. Coercion never fails.
pub fn coerce(value: &RawValue) -> f64 {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => parse_leading_float(s).unwrap_or(0.0),
        RawValue::Missing => 0.0,
    };

    if n.is_nan() || n == 0.0 {
        0.0
    } else {
        n
    }
}

/// Returns true if the value holds no parseable number and so coerces to zero
/// by default rather than by content.
pub fn is_malformed(value: &RawValue) -> bool {
    match value {
        RawValue::Number(n) => n.is_nan(),
        RawValue::Text(s) => parse_leading_float(s).is_none(),
        RawValue::Missing => true,
    }
}

/// Parse the longest prefix of `s` that forms a decimal number.
///
/// Leading whitespace is skipped. Accepts an optional sign, `Infinity`,
/// digits with an optional fraction, and an exponent only when at least
/// one exponent digit follows.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let inf = f64::INFINITY;
        return Some(if bytes[0] == b'-' { -inf } else { inf });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
