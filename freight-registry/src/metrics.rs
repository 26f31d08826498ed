//! Metrics collection for observability
//!
//! Prometheus collectors owned by one registry instance.
//!
//! # Metrics
//!
//! - `freight_numbers_created_total` - Freight numbers registered
//! - `freight_shipments_created_total` - Shipments booked
//! - `freight_shipments_deleted_total` - Shipments removed
//! - `freight_shipments_active` - Shipments currently held
//! - `freight_validation_failures_total` - Rejected shipment forms
//! - `freight_quotes_total` - Prices computed for views and checks
//! - `freight_booking_amount_eur` - Histogram of base prices at booking

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Registry};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Freight numbers registered
    pub freight_numbers_created: IntCounter,

    /// Shipments booked
    pub shipments_created: IntCounter,

    /// Shipments removed
    pub shipments_deleted: IntCounter,

    /// Shipments currently held
    pub shipments_active: IntGauge,

    /// Rejected shipment forms
    pub validation_failures: IntCounter,

    /// Prices computed
    pub quotes_total: IntCounter,

    /// Base price at booking (EUR)
    pub booking_amount: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create collectors registered in a fresh registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let freight_numbers_created = IntCounter::new(
            "freight_numbers_created_total",
            "Freight numbers registered",
        )?;
        registry.register(Box::new(freight_numbers_created.clone()))?;

        let shipments_created =
            IntCounter::new("freight_shipments_created_total", "Shipments booked")?;
        registry.register(Box::new(shipments_created.clone()))?;

        let shipments_deleted =
            IntCounter::new("freight_shipments_deleted_total", "Shipments removed")?;
        registry.register(Box::new(shipments_deleted.clone()))?;

        let shipments_active = IntGauge::new("freight_shipments_active", "Shipments currently held")?;
        registry.register(Box::new(shipments_active.clone()))?;

        let validation_failures = IntCounter::new(
            "freight_validation_failures_total",
            "Rejected shipment forms",
        )?;
        registry.register(Box::new(validation_failures.clone()))?;

        let quotes_total = IntCounter::new("freight_quotes_total", "Prices computed")?;
        registry.register(Box::new(quotes_total.clone()))?;

        let booking_amount = Histogram::with_opts(
            HistogramOpts::new("freight_booking_amount_eur", "Base price at booking (EUR)")
                .buckets(vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]),
        )?;
        registry.register(Box::new(booking_amount.clone()))?;

        Ok(Self {
            freight_numbers_created,
            shipments_created,
            shipments_deleted,
            shipments_active,
            validation_failures,
            quotes_total,
            booking_amount,
            registry,
        })
    }

    /// Record freight number registration
    pub fn record_freight_created(&self) {
        self.freight_numbers_created.inc();
    }

    /// Record a booking and its base price
    pub fn record_shipment_created(&self, base_amount_eur: Decimal) {
        self.shipments_created.inc();
        self.shipments_active.inc();
        self.booking_amount.observe(base_amount_eur.to_f64().unwrap_or(0.0));
    }

    /// Record a removal
    pub fn record_shipment_deleted(&self) {
        self.shipments_deleted.inc();
        self.shipments_active.dec();
    }

    /// Record a rejected form
    pub fn record_validation_failure(&self) {
        self.validation_failures.inc();
    }

    /// Record computed prices
    pub fn record_quotes(&self, count: usize) {
        self.quotes_total.inc_by(count as u64);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("freight_numbers_created", &self.freight_numbers_created.get())
            .field("shipments_created", &self.shipments_created.get())
            .field("shipments_deleted", &self.shipments_deleted.get())
            .field("shipments_active", &self.shipments_active.get())
            .field("validation_failures", &self.validation_failures.get())
            .field("quotes_total", &self.quotes_total.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.shipments_created.get(), 0);
        assert_eq!(metrics.shipments_active.get(), 0);
        assert_eq!(metrics.registry().gather().len(), 7);
    }

    #[test]
    fn test_instances_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.record_freight_created();
        assert_eq!(a.freight_numbers_created.get(), 1);
        assert_eq!(b.freight_numbers_created.get(), 0);
    }

    #[test]
    fn test_booking_lifecycle() {
        let metrics = Metrics::new().unwrap();
        metrics.record_shipment_created(Decimal::new(545, 1));
        metrics.record_shipment_created(Decimal::from(50));
        metrics.record_shipment_deleted();

        assert_eq!(metrics.shipments_created.get(), 2);
        assert_eq!(metrics.shipments_deleted.get(), 1);
        assert_eq!(metrics.shipments_active.get(), 1);
        assert_eq!(metrics.booking_amount.get_sample_count(), 2);
        assert!((metrics.booking_amount.get_sample_sum() - 104.5).abs() < 1e-9);
    }

    #[test]
    fn test_record_quotes() {
        let metrics = Metrics::new().unwrap();
        metrics.record_quotes(3);
        metrics.record_quotes(0);
        assert_eq!(metrics.quotes_total.get(), 3);
    }
}
