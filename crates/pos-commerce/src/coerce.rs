//! Lenient conversion of loosely-typed document fields.
//!
//! Line items reach the cart from several places (storefront buttons, old
//! orders, saved drafts) and their fields are not always the expected
//! JSON type. These helpers turn any JSON value into a number or string
//! the way the storefront has always read them: missing, empty and
//! non-numeric values become zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a value as a finite number. Anything that isn't one reads as `0`.
///
/// ```rust
/// use pos_commerce::coerce::to_number;
/// use serde_json::json;
///
/// assert_eq!(to_number(&json!(" 12.5 ")), 12.5);
/// assert_eq!(to_number(&json!("abc")), 0.0);
/// assert_eq!(to_number(&json!(null)), 0.0);
/// ```
pub fn to_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        Value::Bool(false) | Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => 0.0,
    };
    finite_or_zero(n)
}

/// Replace NaN and infinities with `0`.
pub fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Read a value as display text. Numbers and booleans are stringified,
/// `null` and containers read as empty.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Read a value as an identifier string.
pub fn to_id_string(value: &Value) -> String {
    to_text(value)
}

/// First field among `names` holding a non-empty, non-zero value.
pub fn first_present<'a>(object: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|value| is_truthy(value))
}

/// Whether a value counts as present: not null, false, zero or empty text.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `deserialize_with` adapter for [`to_number`].
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(to_number(&Value::deserialize(deserializer)?))
}

/// `deserialize_with` adapter for [`to_text`].
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(to_text(&Value::deserialize(deserializer)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_number_variants() {
        assert_eq!(to_number(&json!(3)), 3.0);
        assert_eq!(to_number(&json!(2.5)), 2.5);
        assert_eq!(to_number(&json!("7")), 7.0);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!("1e2")), 100.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!([1])), 0.0);
        assert_eq!(to_number(&json!({"a": 1})), 0.0);
    }

    #[test]
    fn test_to_number_rejects_non_finite_text() {
        assert_eq!(to_number(&json!("inf")), 0.0);
        assert_eq!(to_number(&json!("NaN")), 0.0);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&json!("abc")), "abc");
        assert_eq!(to_text(&json!(12)), "12");
        assert_eq!(to_text(&json!(null)), "");
    }

    #[test]
    fn test_first_present_skips_empty() {
        let item = json!({"id": "", "productId": "p9"});
        assert_eq!(first_present(&item, &["id", "productId"]), Some(&json!("p9")));
        assert_eq!(first_present(&item, &["missing"]), None);
    }
}
