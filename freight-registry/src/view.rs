//! Shipment views with a freshly computed price

use crate::types::{Country, FreightNumber, Shipment, ShipmentStatus};
use crate::Result;
use pricing_engine::{PriceBreakdown, PriceCalculator, TransportMode};
use serde::{Deserialize, Serialize};

/// Freight number fields shown next to a shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreightSummary {
    /// Formatted number
    pub number: String,
    /// Transport mode
    pub mode: TransportMode,
    /// Origin country
    pub origin: Country,
    /// Destination country
    pub destination: Country,
    /// Lifecycle status
    pub status: ShipmentStatus,
}

impl From<&FreightNumber> for FreightSummary {
    fn from(freight: &FreightNumber) -> Self {
        Self {
            number: freight.number.clone(),
            mode: freight.mode,
            origin: freight.origin,
            destination: freight.destination,
            status: freight.status,
        }
    }
}

/// Shipment joined with its freight number and current price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentView {
    /// Stored shipment
    #[serde(flatten)]
    pub shipment: Shipment,
    /// Owning freight number
    pub freight: FreightSummary,
    /// Price under the current configuration
    pub price: PriceBreakdown,
}

impl ShipmentView {
    /// Join `shipment` with `freight` and price it
    pub fn build(
        calculator: &PriceCalculator,
        freight: &FreightNumber,
        shipment: &Shipment,
    ) -> Result<Self> {
        let price = calculator.calculate(
            freight.mode,
            &shipment.weights,
            Some(&shipment.dimensions),
            shipment.advance.as_ref(),
        )?;

        Ok(Self {
            shipment: shipment.clone(),
            freight: FreightSummary::from(freight),
            price,
        })
    }
}
