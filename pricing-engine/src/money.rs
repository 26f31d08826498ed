//! EUR / XOF rounding, conversion and formatting
//!
//! XOF has no subdivision in practice, so every XOF figure is a whole
//! number of francs. EUR figures are kept to the cent. Both roundings
//! use midpoint-away-from-zero, which is what the form layer displayed.

use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for EUR figures
pub const EUR_SCALE: u32 = 2;

/// Round to the cent
pub fn round_eur(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(EUR_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to the whole franc
pub fn round_xof(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert EUR to XOF, rounded to the whole franc
pub fn eur_to_xof(amount_eur: Decimal, rate: Decimal) -> Result<Decimal> {
    let converted = amount_eur
        .checked_mul(rate)
        .ok_or_else(|| Error::Overflow(format!("{} EUR x {}", amount_eur, rate)))?;
    Ok(round_xof(converted))
}

/// Round an amount still owed up to the next cent
///
/// A balance short by a fraction of a cent stays visible as `0.01`.
pub fn round_eur_owed(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(EUR_SCALE, RoundingStrategy::AwayFromZero)
}

/// EUR value of an XOF amount, unrounded
pub fn xof_value_in_eur(amount_xof: Decimal, rate: Decimal) -> Result<Decimal> {
    amount_xof
        .checked_div(rate)
        .ok_or_else(|| Error::Overflow(format!("{} XOF / {}", amount_xof, rate)))
}

/// Convert XOF to EUR, rounded to the cent
pub fn xof_to_eur(amount_xof: Decimal, rate: Decimal) -> Result<Decimal> {
    Ok(round_eur(xof_value_in_eur(amount_xof, rate)?))
}

/// `max(0, total - paid)`
pub fn outstanding(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

/// Format as `€1,234.50`
pub fn format_eur(amount: Decimal) -> String {
    let rounded = round_eur(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let units = abs.trunc();
    let cents = ((abs - units) * Decimal::from(100)).to_u32().unwrap_or(0);
    format!("{}€{}.{:02}", sign, group_thousands(&units.normalize().to_string()), cents)
}

/// Format as `35,749 CFA`
pub fn format_xof(amount: Decimal) -> String {
    let rounded = round_xof(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let units = rounded.abs().trunc();
    format!("{}{} CFA", sign, group_thousands(&units.normalize().to_string()))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> Decimal {
        Decimal::new(655_957, 3)
    }

    #[test]
    fn test_rounding_midpoints() {
        assert_eq!(round_xof(Decimal::new(35_749_5, 1)), Decimal::from(35_750));
        assert_eq!(round_eur(Decimal::new(12_345, 3)), Decimal::new(1_235, 2));
    }

    #[test]
    fn test_conversion() {
        // 54.5 * 655.957 = 35749.6565
        assert_eq!(eur_to_xof(Decimal::new(545, 1), rate()).unwrap(), Decimal::from(35_750));
        // 35750 / 655.957 = 54.5005...
        assert_eq!(xof_to_eur(Decimal::from(35_750), rate()).unwrap(), Decimal::new(5_450, 2));
        assert!(xof_to_eur(Decimal::ONE, Decimal::ZERO).is_err());
        // 32795 / 655.957 = 49.99565...
        let exact = xof_value_in_eur(Decimal::from(32_795), rate()).unwrap();
        assert!(exact > Decimal::new(4_999, 2) && exact < Decimal::from(50));
    }

    #[test]
    fn test_outstanding_floor() {
        assert_eq!(outstanding(Decimal::from(10), Decimal::from(12)), Decimal::ZERO);
        assert_eq!(outstanding(Decimal::from(10), Decimal::from(4)), Decimal::from(6));
        assert_eq!(round_eur_owed(Decimal::new(43, 4)), Decimal::new(1, 2));
        assert_eq!(round_eur_owed(Decimal::new(1450, 2)), Decimal::new(1450, 2));
        assert_eq!(round_eur_owed(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_eur(Decimal::new(545, 1)), "€54.50");
        assert_eq!(format_eur(Decimal::new(123_456_789, 2)), "€1,234,567.89");
        assert_eq!(format_xof(Decimal::from(35_749)), "35,749 CFA");
        assert_eq!(format_xof(Decimal::from(500)), "500 CFA");
    }
}
