//! Pricing Engine for freight shipments
//!
//! Converts the physical attributes of a shipment (transport mode, weights,
//! dimensions) and a partial advance payment into a dual-currency
//! (EUR / XOF) price breakdown with a payment status.
//!
//! # Rate schedule
//!
//! - **air**: weighted sum of per-kg rates (food, non-food, HN7)
//! - **sea**: the higher of the weighted sum (sea rates) and the volume
//!   charge, where billable volume never drops below the minimum volume
//! - **gp**: fixed base rate
//!
//! All rates and the EUR→XOF rate live in one [`PricingConfig`].
//!
//! # Example
//!
//! ```
//! use pricing_engine::{PriceCalculator, TransportMode, Weights};
//! use rust_decimal::Decimal;
//!
//! let calculator = PriceCalculator::default();
//! let weights = Weights::new(Decimal::from(10), Decimal::from(5), Decimal::ZERO);
//!
//! let quote = calculator
//!     .calculate(TransportMode::Air, &weights, None, None)
//!     .unwrap();
//! assert_eq!(quote.base_amount_eur, Decimal::new(545, 1));
//! assert_eq!(quote.base_amount_xof, Decimal::from(35_750));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, missing_debug_implementations)]

pub mod calculator;
pub mod config;
pub mod error;
pub mod money;
pub mod parsing;
pub mod rate_card;
pub mod types;

pub use calculator::PriceCalculator;
pub use config::{ExchangeConfig, PricingConfig, RateTable, SeaRates, WeightRates};
pub use error::{Error, Result};
pub use parsing::{parse_amount, RawAdvancePayment, RawQuoteInput};
pub use rate_card::RateCard;
pub use types::*;
