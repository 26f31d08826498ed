//! In-memory freight registry
//!
//! Holds freight numbers and their shipments behind one lock. Shipments
//! store their parsed inputs only; every view is priced on read with the
//! shared [`PriceCalculator`].

use crate::dashboard::DashboardSummary;
use crate::metrics::Metrics;
use crate::tracking::{format_freight_number, generate_tracking_number};
use crate::types::*;
use crate::validation::ShipmentValidator;
use crate::view::ShipmentView;
use crate::{Error, Result};
use chrono::Utc;
use parking_lot::RwLock;
use pricing_engine::{PriceBreakdown, PriceCalculator, RawQuoteInput, TransportMode};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Tracking number draws before giving up on a freight number
const MAX_TRACKING_ATTEMPTS: usize = 64;

#[derive(Debug, Default)]
struct State {
    freight_numbers: HashMap<Uuid, FreightNumber>,
    /// Freight IDs in creation order
    freight_order: Vec<Uuid>,
    shipments: HashMap<Uuid, Shipment>,
    /// Shipment IDs in creation order
    shipment_order: Vec<Uuid>,
    tracking_numbers: HashSet<String>,
}

impl State {
    fn freight(&self, id: Uuid) -> Result<&FreightNumber> {
        self.freight_numbers
            .get(&id)
            .ok_or(Error::FreightNumberNotFound(id))
    }

    fn shipments_of(&self, freight_id: Uuid) -> usize {
        self.shipments
            .values()
            .filter(|s| s.freight_number_id == freight_id)
            .count()
    }

    /// Shipments newest first, optionally restricted to one freight number
    fn shipments_newest_first(&self, freight_filter: Option<Uuid>) -> impl Iterator<Item = &Shipment> {
        self.shipment_order
            .iter()
            .rev()
            .filter_map(|id| self.shipments.get(id))
            .filter(move |s| freight_filter.map_or(true, |f| s.freight_number_id == f))
    }

    fn view(&self, calculator: &PriceCalculator, shipment: &Shipment) -> Result<ShipmentView> {
        let freight = self.freight(shipment.freight_number_id)?;
        ShipmentView::build(calculator, freight, shipment)
    }
}

/// Freight registry
#[derive(Debug)]
pub struct FreightRegistry {
    calculator: Arc<PriceCalculator>,
    validator: ShipmentValidator,
    metrics: Metrics,
    state: RwLock<State>,
}

impl FreightRegistry {
    /// Create empty registry pricing with `calculator`
    pub fn new(calculator: Arc<PriceCalculator>) -> Result<Self> {
        Ok(Self {
            calculator,
            validator: ShipmentValidator::new()?,
            metrics: Metrics::new()?,
            state: RwLock::new(State::default()),
        })
    }

    /// Calculator used for every view
    pub fn calculator(&self) -> &Arc<PriceCalculator> {
        &self.calculator
    }

    /// Booking and pricing counters
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    // ===== Freight numbers =====

    /// Register a freight number
    pub fn create_freight_number(&self, form: NewFreightNumber) -> Result<FreightNumber> {
        let number = format_freight_number(form.origin, &form.digits)?;

        let mut state = self.state.write();
        if state.freight_numbers.values().any(|f| f.number == number) {
            return Err(Error::DuplicateFreightNumber(number));
        }

        let now = Utc::now();
        let freight = FreightNumber {
            id: Uuid::new_v4(),
            number,
            mode: form.mode,
            origin: form.origin,
            destination: form.destination,
            status: ShipmentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        state.freight_order.push(freight.id);
        state.freight_numbers.insert(freight.id, freight.clone());
        self.metrics.record_freight_created();

        tracing::info!(
            "Created freight number {} ({}, {} -> {})",
            freight.number,
            freight.mode,
            freight.origin,
            freight.destination
        );
        Ok(freight)
    }

    /// Get freight number
    pub fn get_freight_number(&self, id: Uuid) -> Result<FreightNumber> {
        self.state.read().freight(id).cloned()
    }

    /// Find freight number by its formatted number
    pub fn find_freight_number(&self, number: &str) -> Option<FreightNumber> {
        self.state
            .read()
            .freight_numbers
            .values()
            .find(|f| f.number == number)
            .cloned()
    }

    /// All freight numbers, newest first
    pub fn list_freight_numbers(&self) -> Vec<FreightNumber> {
        let state = self.state.read();
        state
            .freight_order
            .iter()
            .rev()
            .filter_map(|id| state.freight_numbers.get(id))
            .cloned()
            .collect()
    }

    /// Change origin, destination or status
    pub fn update_freight_number(&self, id: Uuid, update: FreightNumberUpdate) -> Result<FreightNumber> {
        let mut state = self.state.write();
        let freight = state
            .freight_numbers
            .get_mut(&id)
            .ok_or(Error::FreightNumberNotFound(id))?;

        let origin = update.origin.unwrap_or(freight.origin);
        let destination = update.destination.unwrap_or(freight.destination);
        let status = update.status.unwrap_or(freight.status);
        if origin == freight.origin && destination == freight.destination && status == freight.status {
            return Err(Error::NoChanges);
        }

        if status != freight.status {
            tracing::info!(
                "Freight number {} status {} -> {}",
                freight.number,
                freight.status,
                status
            );
        }

        freight.origin = origin;
        freight.destination = destination;
        freight.status = status;
        freight.updated_at = Utc::now();

        Ok(freight.clone())
    }

    /// Delete a freight number without shipments
    pub fn delete_freight_number(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let number = state.freight(id)?.number.clone();

        let count = state.shipments_of(id);
        if count > 0 {
            tracing::warn!(
                "Refusing to delete freight number {} with {} shipment(s)",
                number,
                count
            );
            return Err(Error::HasShipments { number, count });
        }

        state.freight_numbers.remove(&id);
        state.freight_order.retain(|f| *f != id);

        tracing::info!("Deleted freight number {}", number);
        Ok(())
    }

    // ===== Shipments =====

    /// Register a shipment on an existing freight number
    pub fn create_shipment(&self, form: NewShipment) -> Result<Shipment> {
        let sender = form.sender.trimmed();
        let recipient = form.recipient.trimmed();
        let packaging = form.packaging.trim().to_string();
        self.validate(&sender, &recipient, &packaging)?;

        let mut state = self.state.write();
        let freight = state.freight(form.freight_number_id)?;
        let (mode, freight_number) = (freight.mode, freight.number.clone());

        let now = Utc::now();
        let mut shipment = Shipment {
            id: Uuid::new_v4(),
            freight_number_id: form.freight_number_id,
            tracking_number: String::new(),
            sender,
            recipient,
            weights: form.quote.weights(),
            dimensions: form.quote.dimensions(),
            package_type: form.package_type.trim().to_string(),
            packaging,
            special_handling: form.special_handling,
            comments: form.comments,
            advance: form.quote.advance.as_ref().and_then(|a| a.parse()),
            created_at: now,
            updated_at: now,
        };
        let price = self.check_price(mode, &shipment)?;

        shipment.tracking_number = allocate_tracking_number(&state.tracking_numbers, &freight_number)?;
        state.tracking_numbers.insert(shipment.tracking_number.clone());
        state.shipment_order.push(shipment.id);
        state.shipments.insert(shipment.id, shipment.clone());
        self.metrics.record_shipment_created(price.base_amount_eur);

        tracing::info!(
            "Created shipment {} on {}",
            shipment.tracking_number,
            freight_number
        );
        Ok(shipment)
    }

    /// Get shipment
    pub fn get_shipment(&self, id: Uuid) -> Result<Shipment> {
        self.state
            .read()
            .shipments
            .get(&id)
            .cloned()
            .ok_or(Error::ShipmentNotFound(id))
    }

    /// Find shipment by tracking number
    pub fn find_by_tracking_number(&self, tracking_number: &str) -> Option<Shipment> {
        let wanted = tracking_number.trim().to_ascii_uppercase();
        self.state
            .read()
            .shipments
            .values()
            .find(|s| s.tracking_number == wanted)
            .cloned()
    }

    /// Shipments newest first, optionally for one freight number
    pub fn list_shipments(&self, freight_filter: Option<Uuid>) -> Vec<Shipment> {
        self.state
            .read()
            .shipments_newest_first(freight_filter)
            .cloned()
            .collect()
    }

    /// Priced view of one shipment
    pub fn shipment_view(&self, id: Uuid) -> Result<ShipmentView> {
        let state = self.state.read();
        let shipment = state.shipments.get(&id).ok_or(Error::ShipmentNotFound(id))?;
        let view = state.view(&self.calculator, shipment)?;
        self.metrics.record_quotes(1);
        Ok(view)
    }

    /// Priced views newest first, optionally for one freight number
    pub fn list_shipment_views(&self, freight_filter: Option<Uuid>) -> Result<Vec<ShipmentView>> {
        self.search_shipments("", freight_filter)
    }

    /// Priced views whose tracking number, sender or recipient (name or
    /// phone) contains `query`, ignoring case; newest first
    ///
    /// A blank query matches every shipment.
    pub fn search_shipments(&self, query: &str, freight_filter: Option<Uuid>) -> Result<Vec<ShipmentView>> {
        let needle = query.trim().to_lowercase();
        let state = self.state.read();
        let views = state
            .shipments_newest_first(freight_filter)
            .filter(|s| s.matches(&needle))
            .map(|s| state.view(&self.calculator, s))
            .collect::<Result<Vec<_>>>()?;
        self.metrics.record_quotes(views.len());
        Ok(views)
    }

    /// Edit a shipment; the freight number and tracking number never change
    pub fn update_shipment(&self, id: Uuid, update: ShipmentUpdate) -> Result<Shipment> {
        let mut state = self.state.write();
        let current = state.shipments.get(&id).ok_or(Error::ShipmentNotFound(id))?;
        let mode = state.freight(current.freight_number_id)?.mode;

        let mut next = current.clone();
        if let Some(sender) = update.sender {
            next.sender = sender.trimmed();
        }
        if let Some(recipient) = update.recipient {
            next.recipient = recipient.trimmed();
        }
        if let Some(quote) = update.quote.as_ref() {
            apply_quote(&mut next, quote);
        }
        if let Some(package_type) = update.package_type {
            next.package_type = package_type.trim().to_string();
        }
        if let Some(packaging) = update.packaging {
            next.packaging = packaging.trim().to_string();
        }
        if let Some(special_handling) = update.special_handling {
            next.special_handling = special_handling;
        }
        if let Some(comments) = update.comments {
            next.comments = comments;
        }

        if next == *current {
            return Err(Error::NoChanges);
        }

        self.validate(&next.sender, &next.recipient, &next.packaging)?;
        self.check_price(mode, &next)?;

        next.updated_at = Utc::now();
        state.shipments.insert(id, next.clone());

        tracing::info!("Updated shipment {}", next.tracking_number);
        Ok(next)
    }

    /// Delete a shipment
    pub fn delete_shipment(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let shipment = state.shipments.remove(&id).ok_or(Error::ShipmentNotFound(id))?;
        state.shipment_order.retain(|s| *s != id);
        state.tracking_numbers.remove(&shipment.tracking_number);
        self.metrics.record_shipment_deleted();

        tracing::info!("Deleted shipment {}", shipment.tracking_number);
        Ok(())
    }

    // ===== Dashboard =====

    /// Totals, recent shipments and open balances
    pub fn dashboard(&self) -> Result<DashboardSummary> {
        let state = self.state.read();
        let views = state
            .shipments_newest_first(None)
            .map(|s| state.view(&self.calculator, s))
            .collect::<Result<Vec<_>>>()?;
        self.metrics.record_quotes(views.len());

        Ok(DashboardSummary::build(state.freight_numbers.values(), views))
    }

    fn validate(&self, sender: &Sender, recipient: &Recipient, packaging: &str) -> Result<()> {
        self.validator
            .validate(sender, recipient, packaging)
            .map_err(|e| {
                self.metrics.record_validation_failure();
                e
            })
    }

    /// Reject records whose price cannot be computed
    fn check_price(&self, mode: TransportMode, shipment: &Shipment) -> Result<PriceBreakdown> {
        let price = self.calculator.calculate(
            mode,
            &shipment.weights,
            Some(&shipment.dimensions),
            shipment.advance.as_ref(),
        )?;
        tracing::debug!(
            "Shipment priced at {} EUR, {} EUR remaining",
            price.base_amount_eur,
            price.remaining_eur
        );
        self.metrics.record_quotes(1);
        Ok(price)
    }
}

fn apply_quote(shipment: &mut Shipment, quote: &RawQuoteInput) {
    shipment.weights = quote.weights();
    shipment.dimensions = quote.dimensions();
    shipment.advance = quote.advance.as_ref().and_then(|a| a.parse());
}

fn allocate_tracking_number(taken: &HashSet<String>, freight_number: &str) -> Result<String> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_TRACKING_ATTEMPTS {
        let candidate = generate_tracking_number(freight_number, &mut rng);
        if !taken.contains(&candidate) {
            return Ok(candidate);
        }
        tracing::debug!("Tracking number {} taken, drawing again", candidate);
    }
    Err(Error::TrackingNumberExhausted(freight_number.to_string()))
}
