//! Dashboard aggregates

use crate::types::{FreightNumber, ShipmentStatus};
use crate::view::ShipmentView;
use pricing_engine::{PaymentStatus, TransportMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Recent shipments shown on the dashboard
pub const RECENT_SHIPMENTS: usize = 5;

/// Freight number counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightStats {
    /// All freight numbers
    pub total: usize,
    /// Status pending
    pub pending: usize,
    /// Status in transit
    pub in_transit: usize,
    /// Status delivered
    pub delivered: usize,
    /// Status cancelled
    pub cancelled: usize,
    /// Air freight
    pub air: usize,
    /// Sea freight
    pub sea: usize,
    /// GP
    pub gp: usize,
}

impl FreightStats {
    fn record(&mut self, freight: &FreightNumber) {
        self.total += 1;
        match freight.status {
            ShipmentStatus::Pending => self.pending += 1,
            ShipmentStatus::InTransit => self.in_transit += 1,
            ShipmentStatus::Delivered => self.delivered += 1,
            ShipmentStatus::Cancelled => self.cancelled += 1,
        }
        match freight.mode {
            TransportMode::Air => self.air += 1,
            TransportMode::Sea => self.sea += 1,
            TransportMode::Gp => self.gp += 1,
        }
    }
}

/// Dashboard summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Freight number counts
    pub freight: FreightStats,
    /// Distinct sender phones plus distinct recipient phones
    pub total_clients: usize,
    /// Most recent shipments, newest first
    pub recent_shipments: Vec<ShipmentView>,
    /// Shipments whose balance is still open
    pub pending_payments: usize,
    /// Sum of remaining balances (EUR)
    #[serde(rename = "outstandingEUR")]
    pub outstanding_eur: Decimal,
    /// Sum of remaining balances (XOF)
    #[serde(rename = "outstandingXOF")]
    pub outstanding_xof: Decimal,
}

impl DashboardSummary {
    /// Aggregate freight numbers and priced shipments (newest first)
    pub fn build<'a>(
        freight_numbers: impl IntoIterator<Item = &'a FreightNumber>,
        views: Vec<ShipmentView>,
    ) -> Self {
        let mut freight = FreightStats::default();
        for f in freight_numbers {
            freight.record(f);
        }

        let senders: HashSet<&str> = views.iter().map(|v| v.shipment.sender.phone.as_str()).collect();
        let recipients: HashSet<&str> = views
            .iter()
            .map(|v| v.shipment.recipient.phone.as_str())
            .collect();
        let total_clients = senders.len() + recipients.len();

        let mut pending_payments = 0;
        let mut outstanding_eur = Decimal::ZERO;
        let mut outstanding_xof = Decimal::ZERO;
        for view in &views {
            if view.price.payment_status == PaymentStatus::Pending {
                pending_payments += 1;
            }
            outstanding_eur = outstanding_eur.saturating_add(view.price.remaining_eur);
            outstanding_xof = outstanding_xof.saturating_add(view.price.remaining_xof);
        }

        let recent_shipments = views.into_iter().take(RECENT_SHIPMENTS).collect();

        Self {
            freight,
            total_clients,
            recent_shipments,
            pending_payments,
            outstanding_eur,
            outstanding_xof,
        }
    }
}
