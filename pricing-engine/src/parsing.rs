//! Parsing boundary for raw form input
//!
//! Shipment forms hand over weights, dimensions and the advance amount as
//! text. This module turns that text into the numeric types the calculator
//! works with. Nothing here fails on numbers: empty, non-numeric, negative
//! or out-of-range text becomes zero. The only errors are an unknown
//! transport mode or currency.

use crate::types::{non_negative, AdvancePayment, Currency, Dimensions, TransportMode, Weights};
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parse a user-typed amount
///
/// The longest leading number is used, so `"12kg"` reads as 12 and
/// `"1,5"` as 1. Exponents (`"1e3"`, `"1.e5"`) are honoured. Anything
/// unparseable or negative yields zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let prefix = numeric_prefix(raw.trim());
    if prefix.is_empty() {
        return Decimal::ZERO;
    }

    let unsigned = prefix.strip_prefix('+').unwrap_or(prefix);
    let mut normalized = unsigned.to_ascii_lowercase();
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    } else if normalized.starts_with("-.") {
        normalized.insert(1, '0');
    }

    let parsed = if normalized.contains('e') {
        // "1.e5" has an empty fraction
        Decimal::from_scientific(&normalized.replace(".e", "e"))
    } else {
        Decimal::from_str(&normalized)
    };

    match parsed {
        Ok(value) => non_negative(value),
        Err(e) => {
            tracing::warn!("Discarding unparseable amount {:?}: {}", raw, e);
            Decimal::ZERO
        }
    }
}

/// Longest prefix shaped like `[+-]?digits[.digits][(e|E)[+-]?digits]`
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
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
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
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

    // "12." reads as 12
    s[..end].strip_suffix('.').unwrap_or(&s[..end])
}

/// Advance payment as typed into the form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawAdvancePayment {
    /// Amount text, possibly empty or malformed
    #[serde(default)]
    pub amount: String,
    /// Currency selected next to the amount
    #[serde(default)]
    pub currency: Currency,
}

impl RawAdvancePayment {
    /// Create raw advance
    pub fn new(amount: impl Into<String>, currency: Currency) -> Self {
        Self {
            amount: amount.into(),
            currency,
        }
    }

    /// Parsed advance, `None` when the amount is not strictly positive
    pub fn parse(&self) -> Option<AdvancePayment> {
        let amount = parse_amount(&self.amount);
        AdvancePayment::new(amount, self.currency)
            .effective_amount()
            .map(|amount| AdvancePayment::new(amount, self.currency))
    }
}

/// Quote inputs as typed into the shipment form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQuoteInput {
    /// Food weight (kg)
    pub food_weight: String,
    /// Non-food weight (kg)
    pub non_food_weight: String,
    /// HN7 weight (kg)
    pub hn7_weight: String,
    /// Length (cm)
    pub length: String,
    /// Width (cm)
    pub width: String,
    /// Height (cm)
    pub height: String,
    /// Advance payment
    pub advance: Option<RawAdvancePayment>,
}

/// Numeric quote inputs ready for the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Transport mode
    pub mode: TransportMode,
    /// Weights
    pub weights: Weights,
    /// Dimensions, only kept for modes that price volume
    pub dimensions: Option<Dimensions>,
    /// Advance payment, only when strictly positive
    pub advance: Option<AdvancePayment>,
}

impl RawQuoteInput {
    /// Parsed weights
    pub fn weights(&self) -> Weights {
        Weights::new(
            parse_amount(&self.food_weight),
            parse_amount(&self.non_food_weight),
            parse_amount(&self.hn7_weight),
        )
    }

    /// Parsed dimensions
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(
            parse_amount(&self.length),
            parse_amount(&self.width),
            parse_amount(&self.height),
        )
    }

    /// Convert into numeric input for `mode`
    pub fn into_quote(&self, mode: TransportMode) -> QuoteInput {
        QuoteInput {
            mode,
            weights: self.weights(),
            dimensions: mode.uses_dimensions().then(|| self.dimensions()),
            advance: self.advance.as_ref().and_then(RawAdvancePayment::parse),
        }
    }

    /// Convert into numeric input, parsing the mode text
    pub fn into_quote_for(&self, mode: &str) -> Result<QuoteInput> {
        let mode = TransportMode::from_str(mode)?;
        Ok(self.into_quote(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_amount("54.5"), Decimal::new(545, 1));
        assert_eq!(parse_amount("  40 "), Decimal::from(40));
        assert_eq!(parse_amount("+7"), Decimal::from(7));
        assert_eq!(parse_amount(".5"), Decimal::new(5, 1));
        assert_eq!(parse_amount("12."), Decimal::from(12));
    }

    #[test]
    fn test_malformed_numbers_are_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("-5"), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
        assert_eq!(parse_amount("Infinity"), Decimal::ZERO);
    }

    #[test]
    fn test_leading_prefix() {
        assert_eq!(parse_amount("12kg"), Decimal::from(12));
        assert_eq!(parse_amount("1,5"), Decimal::ONE);
        assert_eq!(parse_amount("3.25.1"), Decimal::new(325, 2));
    }

    #[test]
    fn test_exponent() {
        assert_eq!(parse_amount("1e3"), Decimal::from(1000));
        assert_eq!(parse_amount("2.5E-1"), Decimal::new(25, 2));
        assert_eq!(parse_amount("1.e5"), Decimal::from(100_000));
        assert_eq!(parse_amount("3.E-1kg"), Decimal::new(3, 1));
        // dangling exponent is ignored
        assert_eq!(parse_amount("4e"), Decimal::from(4));
        assert_eq!(parse_amount("4.e"), Decimal::from(4));
    }

    #[test]
    fn test_out_of_range_is_zero() {
        assert_eq!(parse_amount("1e40"), Decimal::ZERO);
        assert_eq!(parse_amount("99999999999999999999999999999999"), Decimal::ZERO);
    }

    #[test]
    fn test_advance_parse() {
        let advance = RawAdvancePayment::new("40", Currency::EUR).parse().unwrap();
        assert_eq!(advance.amount, Decimal::from(40));

        assert!(RawAdvancePayment::new("0", Currency::EUR).parse().is_none());
        assert!(RawAdvancePayment::new("-5", Currency::XOF).parse().is_none());
        assert!(RawAdvancePayment::new("", Currency::XOF).parse().is_none());
    }

    #[test]
    fn test_dimensions_dropped_outside_sea() {
        let raw = RawQuoteInput {
            food_weight: "10".into(),
            length: "100".into(),
            width: "50".into(),
            height: "50".into(),
            ..Default::default()
        };

        assert!(raw.into_quote(TransportMode::Air).dimensions.is_none());
        let sea = raw.into_quote(TransportMode::Sea);
        assert_eq!(sea.dimensions.unwrap().length, Decimal::from(100));
        assert_eq!(sea.weights.food, Decimal::from(10));
    }

    #[test]
    fn test_unknown_mode() {
        let err = RawQuoteInput::default().into_quote_for("truck").unwrap_err();
        assert!(matches!(err, Error::InvalidMode(_)));
    }
}
