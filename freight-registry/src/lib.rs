//! Freight Registry
//!
//! Freight numbers (one consolidated departure each) and the client
//! shipments booked on them, with prices recomputed on every read by the
//! pricing engine.
//!
//! # Example
//!
//! ```
//! use freight_registry::{Country, FreightRegistry, NewFreightNumber, NewShipment};
//! use pricing_engine::{PriceCalculator, TransportMode};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let registry = FreightRegistry::new(Arc::new(PriceCalculator::default())).unwrap();
//! let freight = registry
//!     .create_freight_number(NewFreightNumber {
//!         digits: "1".to_string(),
//!         mode: TransportMode::Gp,
//!         origin: Country::France,
//!         destination: Country::Senegal,
//!     })
//!     .unwrap();
//! assert_eq!(freight.number, "FR-FRET-0001");
//!
//! let mut form = NewShipment::for_freight(freight.id);
//! form.sender.name = "Awa Diop".to_string();
//! form.sender.phone = "+221 77 123 45 67".to_string();
//! form.recipient.name = "Moussa Ba".to_string();
//! form.recipient.phone = "06 12 34 56 78".to_string();
//! form.packaging = "suitcase".to_string();
//!
//! let shipment = registry.create_shipment(form).unwrap();
//! let view = registry.shipment_view(shipment.id).unwrap();
//! assert_eq!(view.price.base_amount_eur, Decimal::from(50));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, missing_debug_implementations)]

pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod tracking;
pub mod types;
pub mod validation;
pub mod view;

pub use dashboard::{DashboardSummary, FreightStats};
pub use error::{Error, FieldError, Result};
pub use metrics::Metrics;
pub use registry::FreightRegistry;
pub use tracking::{format_freight_number, generate_tracking_number};
pub use types::*;
pub use validation::ShipmentValidator;
pub use view::{FreightSummary, ShipmentView};
