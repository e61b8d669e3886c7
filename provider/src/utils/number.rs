//! Numeric parsing helpers

/// Parse the longest leading decimal number in `s`.
///
/// Leading whitespace is skipped, then the longest prefix matching
/// `[+-]?(digits[.digits]|.digits)([eE][+-]?digits)?` is parsed. Trailing
/// text is ignored, so `"3abc"` yields `3.0` and `"1e3x"` yields `1000.0`.
///
/// Returns `None` when no digits lead the string or when the prefix overflows
/// to a non-finite value. `Infinity`, `NaN` and hex literals are not
/// recognised.
///
/// # Example
///
/// ```
/// use crm_provider::utils::number::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("42"), Some(42.0));
/// assert_eq!(parse_float_prefix("-1.5kg"), Some(-1.5));
/// assert_eq!(parse_float_prefix("abc"), None);
/// ```
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut mantissa_digits = int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            mantissa_digits += frac_digits;
            end += 1 + frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}
