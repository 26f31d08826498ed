//! Human-readable view of the rate schedule for one transport mode

use crate::config::PricingConfig;
use crate::money::format_eur;
use crate::types::TransportMode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One priced item of a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLine {
    /// What the rate applies to
    pub label: String,
    /// Rate value
    pub rate: Decimal,
    /// Unit, e.g. `EUR/kg`
    pub unit: String,
}

impl RateLine {
    fn new(label: &str, rate: Decimal, unit: &str) -> Self {
        Self {
            label: label.to_string(),
            rate,
            unit: unit.to_string(),
        }
    }
}

/// Applicable schedule for a transport mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCard {
    /// Transport mode
    pub mode: TransportMode,
    /// Priced items
    pub lines: Vec<RateLine>,
    /// Pricing rule notes
    pub notes: Vec<String>,
}

impl RateCard {
    /// Build the card for `mode` from `config`
    pub fn for_mode(mode: TransportMode, config: &PricingConfig) -> Self {
        let rates = &config.rates;
        let (lines, notes) = match mode {
            TransportMode::Air => (
                vec![
                    RateLine::new("Food", rates.air.food, "EUR/kg"),
                    RateLine::new("Non-food", rates.air.non_food, "EUR/kg"),
                    RateLine::new("HN7", rates.air.hn7, "EUR/kg"),
                ],
                vec!["Price is the sum of weight per category times its rate".to_string()],
            ),
            TransportMode::Sea => (
                vec![
                    RateLine::new("Food", rates.sea.per_kg.food, "EUR/kg"),
                    RateLine::new("Non-food", rates.sea.per_kg.non_food, "EUR/kg"),
                    RateLine::new("HN7", rates.sea.per_kg.hn7, "EUR/kg"),
                    RateLine::new("Volume", rates.sea.volume_rate, "EUR/m³"),
                    RateLine::new("Minimum volume", rates.sea.min_volume, "m³"),
                ],
                vec![
                    "Higher of volume or weight cost applies".to_string(),
                    format!(
                        "Volume below {} m³ is billed as {} m³",
                        rates.sea.min_volume.normalize(),
                        rates.sea.min_volume.normalize()
                    ),
                ],
            ),
            TransportMode::Gp => (
                vec![RateLine::new("Base rate", rates.gp.base, "EUR")],
                vec!["Fixed price, weights and dimensions are ignored".to_string()],
            ),
        };

        Self { mode, lines, notes }
    }
}

impl fmt::Display for RateCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rates ({}):", self.mode)?;
        for line in &self.lines {
            if line.unit.starts_with("EUR") {
                writeln!(f, "  {:<16} {}{}", line.label, format_eur(line.rate), &line.unit[3..])?;
            } else {
                writeln!(f, "  {:<16} {} {}", line.label, line.rate.normalize(), line.unit)?;
            }
        }
        for note in &self.notes {
            writeln!(f, "  * {}", note)?;
        }
        Ok(())
    }
}
