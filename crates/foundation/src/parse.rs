//! Parsing of numeric form input.
//!
//! Form fields arrive as raw strings. These helpers accept surrounding
//! whitespace and reject anything that is not a finite number.

/// Parses a finite `f64`. `NaN` and the infinities are rejected.
pub fn parse_finite(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parses an integer-valued field. Fractional input is truncated toward zero.
pub fn parse_truncated_i32(raw: &str) -> Option<i32> {
    let v = parse_finite(raw)?.trunc();
    if v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

/// Parses a non-negative integer-valued field, truncating fractions.
pub fn parse_truncated_u32(raw: &str) -> Option<u32> {
    let v = parse_finite(raw)?.trunc();
    if v < 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_accepts_whitespace_and_signs() {
        assert_eq!(parse_finite(" 6.5 "), Some(6.5));
        assert_eq!(parse_finite("-12"), Some(-12.0));
        assert_eq!(parse_finite("1e2"), Some(100.0));
    }

    #[test]
    fn finite_rejects_garbage_and_non_finite() {
        assert_eq!(parse_finite(""), None);
        assert_eq!(parse_finite("abc"), None);
        assert_eq!(parse_finite("NaN"), None);
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(parse_finite("12abc"), None);
    }

    #[test]
    fn truncation_goes_toward_zero() {
        assert_eq!(parse_truncated_i32("4.9"), Some(4));
        assert_eq!(parse_truncated_i32("-4.9"), Some(-4));
        assert_eq!(parse_truncated_i32("1e12"), None);
    }

    #[test]
    fn unsigned_rejects_negatives() {
        assert_eq!(parse_truncated_u32("3"), Some(3));
        assert_eq!(parse_truncated_u32("2.7"), Some(2));
        assert_eq!(parse_truncated_u32("-1"), None);
    }
}
