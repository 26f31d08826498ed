//! Configuration for pricing engine
//!
//! The rate table and the EUR→XOF rate are one object, loaded once at
//! startup and handed to [`crate::PriceCalculator`]. Decimal values are
//! written as strings in TOML (`food = "2.5"`).

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a TOML configuration file
pub const CONFIG_PATH_ENV: &str = "FREIGHT_PRICING_CONFIG";

/// Environment variable overriding the EUR→XOF rate
pub const EUR_TO_XOF_ENV: &str = "FREIGHT_EUR_TO_XOF";

/// Pricing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PricingConfig {
    /// Currency conversion
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Rate schedule per transport mode
    #[serde(default)]
    pub rates: RateTable,
}

/// Currency conversion configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// XOF per EUR (CFA franc peg: 655.957)
    pub eur_to_xof: Decimal,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            eur_to_xof: Decimal::new(655_957, 3),
        }
    }
}

/// Per-kg rates for the three goods categories (EUR/kg)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRates {
    /// Food
    pub food: Decimal,
    /// Non-food
    pub non_food: Decimal,
    /// HN7 goods
    pub hn7: Decimal,
}

impl WeightRates {
    fn validate(&self, schedule: &str) -> Result<()> {
        ensure_non_negative(self.food, schedule, "food")?;
        ensure_non_negative(self.non_food, schedule, "non_food")?;
        ensure_non_negative(self.hn7, schedule, "hn7")
    }
}

/// Sea freight schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeaRates {
    /// Per-kg rates for the weight leg
    pub per_kg: WeightRates,

    /// EUR per billable m³
    pub volume_rate: Decimal,

    /// Minimum billable volume (m³)
    pub min_volume: Decimal,
}

/// GP schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpRates {
    /// Fixed price per shipment (EUR)
    pub base: Decimal,
}

/// Rate schedule for every transport mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Air freight
    pub air: WeightRates,
    /// Sea freight
    pub sea: SeaRates,
    /// GP
    pub gp: GpRates,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            air: WeightRates {
                food: Decimal::from(3),
                non_food: Decimal::new(49, 1),
                hn7: Decimal::from(7),
            },
            sea: SeaRates {
                per_kg: WeightRates {
                    food: Decimal::new(25, 1),
                    non_food: Decimal::from(4),
                    hn7: Decimal::from(6),
                },
                volume_rate: Decimal::from(375),
                min_volume: Decimal::new(5, 1),
            },
            gp: GpRates {
                base: Decimal::from(50),
            },
        }
    }
}

impl PricingConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PricingConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    ///
    /// Starts from [`CONFIG_PATH_ENV`] when set, otherwise from the
    /// defaults, then applies [`EUR_TO_XOF_ENV`].
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(rate) = std::env::var(EUR_TO_XOF_ENV) {
            config.exchange.eur_to_xof = rate.trim().parse().map_err(|e| {
                Error::Config(format!("{} is not a decimal ({}): {}", EUR_TO_XOF_ENV, rate, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject rates the calculator cannot price with
    pub fn validate(&self) -> Result<()> {
        if self.exchange.eur_to_xof <= Decimal::ZERO {
            return Err(Error::InvalidConfig(format!(
                "eur_to_xof must be positive, got {}",
                self.exchange.eur_to_xof
            )));
        }

        self.rates.air.validate("air")?;
        self.rates.sea.per_kg.validate("sea")?;
        ensure_non_negative(self.rates.sea.volume_rate, "sea", "volume_rate")?;
        ensure_non_negative(self.rates.sea.min_volume, "sea", "min_volume")?;
        ensure_non_negative(self.rates.gp.base, "gp", "base")
    }
}

fn ensure_non_negative(value: Decimal, schedule: &str, field: &str) -> Result<()> {
    if value.is_sign_negative() {
        return Err(Error::InvalidConfig(format!(
            "{}.{} must not be negative, got {}",
            schedule, field, value
        )));
    }
    Ok(())
}
