//! Coercion of increment amounts to integers.
//!
//! Text follows `parseInt`: optional leading whitespace and sign, then the
//! leading run of decimal digits. Anything without a numeric prefix counts
//! as zero, as do missing and non-finite amounts.

/// Anything that can be used as an increment amount.
pub trait IncrementBy {
    fn to_delta(&self) -> i64;
}

impl IncrementBy for i64 {
    fn to_delta(&self) -> i64 { *self }
}

impl IncrementBy for i32 {
    fn to_delta(&self) -> i64 { i64::from(*self) }
}

impl IncrementBy for u32 {
    fn to_delta(&self) -> i64 { i64::from(*self) }
}

impl IncrementBy for f64 {
    fn to_delta(&self) -> i64 { truncate(*self).unwrap_or(0) }
}

impl IncrementBy for str {
    fn to_delta(&self) -> i64 { parse_int_prefix(self).unwrap_or(0) }
}

impl IncrementBy for &str {
    fn to_delta(&self) -> i64 { parse_int_prefix(self).unwrap_or(0) }
}

impl IncrementBy for String {
    fn to_delta(&self) -> i64 { parse_int_prefix(self).unwrap_or(0) }
}

impl<T: IncrementBy> IncrementBy for Option<T> {
    fn to_delta(&self) -> i64 { self.as_ref().map_or(0, IncrementBy::to_delta) }
}

impl IncrementBy for serde_json::Value {
    fn to_delta(&self) -> i64 {
        match self {
            serde_json::Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(truncate))
                .unwrap_or(0),
            serde_json::Value::String(s) => s.to_delta(),
            _ => 0,
        }
    }
}

/// Truncate toward zero, saturating at the `i64` bounds. `None` for NaN and
/// infinities.
pub(crate) fn truncate(v: f64) -> Option<i64> {
    if v.is_finite() {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

/// Leading integer of `s`, if it has one.
pub(crate) fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }

    let mut acc: i64 = 0;
    for b in digits[..end].bytes() {
        let d = i64::from(b - b'0');
        acc = if negative {
            acc.saturating_mul(10).saturating_sub(d)
        } else {
            acc.saturating_mul(10).saturating_add(d)
        };
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_uses_leading_integer() {
        assert_eq!("42".to_delta(), 42);
        assert_eq!("  -7".to_delta(), -7);
        assert_eq!("+3".to_delta(), 3);
        assert_eq!("12abc".to_delta(), 12);
        assert_eq!("3.9".to_delta(), 3);
    }

    #[test]
    fn non_numeric_text_is_zero() {
        assert_eq!("abc".to_delta(), 0);
        assert_eq!("".to_delta(), 0);
        assert_eq!("-".to_delta(), 0);
        assert_eq!(String::from("x1").to_delta(), 0);
    }

    #[test]
    fn huge_text_saturates() {
        assert_eq!("99999999999999999999999".to_delta(), i64::MAX);
        assert_eq!("-99999999999999999999999".to_delta(), i64::MIN);
    }

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(2.9_f64.to_delta(), 2);
        assert_eq!((-2.9_f64).to_delta(), -2);
        assert_eq!(f64::NAN.to_delta(), 0);
        assert_eq!(f64::INFINITY.to_delta(), 0);
    }

    #[test]
    fn missing_amount_is_zero() {
        assert_eq!(None::<i64>.to_delta(), 0);
        assert_eq!(Some(5_i64).to_delta(), 5);
    }

    #[test]
    fn json_amounts() {
        assert_eq!(json!(4).to_delta(), 4);
        assert_eq!(json!(4.7).to_delta(), 4);
        assert_eq!(json!("8").to_delta(), 8);
        assert_eq!(json!(true).to_delta(), 0);
        assert_eq!(json!(null).to_delta(), 0);
    }
}
