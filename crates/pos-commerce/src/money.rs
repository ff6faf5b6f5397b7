//! Currency display.
//!
//! Amounts are plain `f64` values, as the storefront stores them; this
//! module only formats them for people.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    PHP,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "PHP").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::PHP => "PHP",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol (e.g., "₱").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::PHP => "\u{20b1}",
            Currency::USD => "$",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "PHP" => Some(Currency::PHP),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }

    /// Format an amount with symbol, thousands separators and two decimals.
    ///
    /// ```
    /// use pos_commerce::Currency;
    /// assert_eq!(Currency::PHP.format(1234.5), "\u{20b1}1,234.50");
    /// assert_eq!(Currency::USD.format(-3.0), "-$3.00");
    /// ```
    pub fn format(&self, amount: f64) -> String {
        let amount = crate::coerce::finite_or_zero(amount);
        let fixed = format!("{:.2}", amount.abs());
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{}{}{}.{}", sign, self.symbol(), grouped, frac)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouping() {
        assert_eq!(Currency::USD.format(0.0), "$0.00");
        assert_eq!(Currency::USD.format(999.999), "$1,000.00");
        assert_eq!(Currency::USD.format(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn test_format_non_finite_is_zero() {
        assert_eq!(Currency::PHP.format(f64::NAN), "\u{20b1}0.00");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Currency::from_code("php"), Some(Currency::PHP));
        assert_eq!(Currency::from_code("EUR"), None);
    }

    #[test]
    fn test_serde_uses_code() {
        assert_eq!(serde_json::to_string(&Currency::USD).unwrap(), r#""USD""#);
    }
}
