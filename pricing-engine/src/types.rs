//! Core types for pricing engine
//!
//! Everything here is plain data: inputs are numeric (the string-typed
//! form fields are handled by [`crate::parsing`]) and the breakdown is
//! built fresh on every call.

use crate::{money, Error};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport mode of a freight number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Air freight, priced per kg
    Air,
    /// Sea freight, priced per kg or per m³, whichever is higher
    Sea,
    /// GP (accompanied baggage), fixed price
    Gp,
}

impl TransportMode {
    /// All modes, in display order
    pub const ALL: [TransportMode; 3] = [TransportMode::Air, TransportMode::Sea, TransportMode::Gp];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Air => "air",
            TransportMode::Sea => "sea",
            TransportMode::Gp => "gp",
        }
    }

    /// Whether dimensions take part in pricing
    pub fn uses_dimensions(&self) -> bool {
        matches!(self, TransportMode::Sea)
    }
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "air" => Ok(TransportMode::Air),
            "sea" => Ok(TransportMode::Sea),
            "gp" => Ok(TransportMode::Gp),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// Euro
    #[default]
    EUR,
    /// West African CFA franc
    XOF,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::XOF => "XOF",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::EUR),
            "XOF" => Ok(Currency::XOF),
            _ => Err(Error::InvalidCurrency(s.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Declared weights per goods category, in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Weights {
    /// Food
    pub food: Decimal,
    /// Non-food
    pub non_food: Decimal,
    /// HN7 goods
    pub hn7: Decimal,
}

impl Weights {
    /// Create weights; negative values are clamped to zero
    pub fn new(food: Decimal, non_food: Decimal, hn7: Decimal) -> Self {
        Self {
            food,
            non_food,
            hn7,
        }
        .sanitized()
    }

    /// Copy with every negative weight replaced by zero
    pub fn sanitized(&self) -> Self {
        Self {
            food: non_negative(self.food),
            non_food: non_negative(self.non_food),
            hn7: non_negative(self.hn7),
        }
    }

    /// Sum of all categories, saturating at `Decimal::MAX`
    pub fn total(&self) -> Decimal {
        let w = self.sanitized();
        w.food.saturating_add(w.non_food).saturating_add(w.hn7)
    }

    /// Whether any category carries weight
    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}

/// Package dimensions, in centimeters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Length
    pub length: Decimal,
    /// Width
    pub width: Decimal,
    /// Height
    pub height: Decimal,
}

impl Dimensions {
    /// Create dimensions; negative values are clamped to zero
    pub fn new(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            length: non_negative(length),
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// All three sides are strictly positive
    pub fn is_complete(&self) -> bool {
        self.length > Decimal::ZERO && self.width > Decimal::ZERO && self.height > Decimal::ZERO
    }
}

/// Advance payment captured at shipment creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancePayment {
    /// Amount in `currency`; anything not strictly positive counts as no advance
    pub amount: Decimal,
    /// Currency the advance was paid in
    pub currency: Currency,
}

impl AdvancePayment {
    /// Create advance payment
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Amount if strictly positive
    pub fn effective_amount(&self) -> Option<Decimal> {
        (self.amount > Decimal::ZERO).then_some(self.amount)
    }
}

/// Costing method that won for a sea shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostingMethod {
    /// Weighted per-kg sum
    Weight,
    /// Billable volume times volume rate
    Volume,
}

/// Payment status of a shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Balance outstanding
    Pending,
    /// Fully paid
    Completed,
}

impl PaymentStatus {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic part of a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetails {
    /// Total declared weight (kg)
    pub total_weight: Decimal,

    /// Food weight × food rate
    pub food_cost: Decimal,

    /// Non-food weight × non-food rate
    pub non_food_cost: Decimal,

    /// HN7 weight × HN7 rate
    pub hn7_cost: Decimal,

    /// Sum of the three category costs
    pub weight_based_cost: Decimal,

    /// Measured volume in m³ (sea only, complete dimensions)
    pub volume: Option<Decimal>,

    /// Volume after the minimum-volume floor (sea only)
    pub billable_volume: Option<Decimal>,

    /// Billable volume × volume rate (sea only)
    pub volume_based_cost: Option<Decimal>,

    /// Winning costing method (sea only)
    pub applied_method: Option<CostingMethod>,
}

/// Dual-currency price breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Transport mode the quote was computed for
    pub mode: TransportMode,

    /// Shipping cost (EUR, cents)
    #[serde(rename = "baseAmountEUR")]
    pub base_amount_eur: Decimal,

    /// Shipping cost (XOF, whole francs)
    #[serde(rename = "baseAmountXOF")]
    pub base_amount_xof: Decimal,

    /// Advance paid (EUR, cents)
    #[serde(rename = "advanceAmountEUR")]
    pub advance_amount_eur: Decimal,

    /// Advance paid (XOF, whole francs)
    #[serde(rename = "advanceAmountXOF")]
    pub advance_amount_xof: Decimal,

    /// Outstanding balance (EUR), never negative
    #[serde(rename = "remainingEUR")]
    pub remaining_eur: Decimal,

    /// Outstanding balance (XOF), never negative
    #[serde(rename = "remainingXOF")]
    pub remaining_xof: Decimal,

    /// Payment status
    #[serde(rename = "paymentStatus")]
    pub payment_status: PaymentStatus,

    /// Diagnostic breakdown
    pub details: PriceDetails,
}

impl PriceBreakdown {
    /// Check if fully paid
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }

    /// Check if an advance was recorded
    pub fn has_advance(&self) -> bool {
        self.advance_amount_eur > Decimal::ZERO || self.advance_amount_xof > Decimal::ZERO
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Base price ({}): {} / {}",
            self.mode,
            money::format_eur(self.base_amount_eur),
            money::format_xof(self.base_amount_xof)
        )?;
        if self.has_advance() {
            writeln!(
                f,
                "Advance payment: {} / {}",
                money::format_eur(self.advance_amount_eur),
                money::format_xof(self.advance_amount_xof)
            )?;
        }
        write!(
            f,
            "Remaining: {} / {} [{}]",
            money::format_eur(self.remaining_eur),
            money::format_xof(self.remaining_xof),
            self.payment_status
        )
    }
}

pub(crate) fn non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("air".parse::<TransportMode>().unwrap(), TransportMode::Air);
        assert_eq!(" SEA ".parse::<TransportMode>().unwrap(), TransportMode::Sea);
        assert_eq!("Gp".parse::<TransportMode>().unwrap(), TransportMode::Gp);

        let err = "rail".parse::<TransportMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidMode(ref m) if m == "rail"));
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("xof".parse::<Currency>().unwrap(), Currency::XOF);
        assert!("USD".parse::<Currency>().is_err());
    }

    #[test]
    fn test_negative_weights_clamped() {
        let w = Weights::new(Decimal::from(-3), Decimal::from(2), Decimal::ZERO);
        assert_eq!(w.food, Decimal::ZERO);
        assert_eq!(w.total(), Decimal::from(2));
    }

    #[test]
    fn test_incomplete_dimensions() {
        let d = Dimensions::new(Decimal::from(100), Decimal::ZERO, Decimal::from(50));
        assert!(!d.is_complete());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&TransportMode::Gp).unwrap();
        assert_eq!(json, "\"gp\"");

        let weights: Weights = serde_json::from_str(r#"{"nonFood":"4.5"}"#).unwrap();
        assert_eq!(weights.non_food, Decimal::new(45, 1));
        assert_eq!(weights.food, Decimal::ZERO);
    }

    #[test]
    fn test_numeric_json_amounts() {
        let weights: Weights = serde_json::from_str(r#"{"food": 10, "nonFood": 4.5}"#).unwrap();
        assert_eq!(weights.food, Decimal::from(10));
        assert_eq!(weights.non_food, Decimal::new(45, 1));

        let dims: Dimensions =
            serde_json::from_str(r#"{"length": 100, "width": 50.5, "height": 20}"#).unwrap();
        assert_eq!(dims.width, Decimal::new(505, 1));

        let advance: AdvancePayment =
            serde_json::from_str(r#"{"amount": 32795, "currency": "XOF"}"#).unwrap();
        assert_eq!(advance.amount, Decimal::from(32_795));
        assert_eq!(advance.currency, Currency::XOF);
    }
}
