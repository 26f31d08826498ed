//! Concurrent booking against one shared registry

use freight_registry::{Country, FreightRegistry, NewFreightNumber, NewShipment};
use pricing_engine::{PriceCalculator, RawQuoteInput, TransportMode};
use std::collections::HashSet;
use std::sync::Arc;

const TASKS: usize = 8;
const PER_TASK: usize = 50;

fn registry() -> Arc<FreightRegistry> {
    Arc::new(FreightRegistry::new(Arc::new(PriceCalculator::default())).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_get_unique_tracking_numbers() {
    let registry = registry();
    let freight = registry
        .create_freight_number(NewFreightNumber {
            digits: "1".to_string(),
            mode: TransportMode::Air,
            origin: Country::Senegal,
            destination: Country::France,
        })
        .unwrap();

    let mut handles = Vec::new();
    for task in 0..TASKS {
        let registry = Arc::clone(&registry);
        let freight_id = freight.id;
        handles.push(tokio::spawn(async move {
            let mut tracking = Vec::new();
            for n in 0..PER_TASK {
                let mut form = NewShipment::for_freight(freight_id);
                form.sender.name = format!("Sender {}", task);
                form.sender.phone = format!("7700{:02}{:03}", task, n);
                form.recipient.name = "Recipient".to_string();
                form.recipient.phone = "0612345678".to_string();
                form.packaging = "carton".to_string();
                form.quote = RawQuoteInput {
                    food_weight: n.to_string(),
                    ..Default::default()
                };
                tracking.push(registry.create_shipment(form).unwrap().tracking_number);
                tokio::task::yield_now().await;
            }
            tracking
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for tracking in handle.await.unwrap() {
            assert!(tracking.starts_with("SE-FRET0001-"));
            assert!(seen.insert(tracking), "duplicate tracking number");
        }
    }

    assert_eq!(seen.len(), TASKS * PER_TASK);
    assert_eq!(registry.list_shipments(Some(freight.id)).len(), TASKS * PER_TASK);

    let summary = registry.dashboard().unwrap();
    assert_eq!(summary.total_clients, TASKS * PER_TASK + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_consistent_prices_while_writing() {
    let registry = registry();
    let freight = registry
        .create_freight_number(NewFreightNumber {
            digits: "2".to_string(),
            mode: TransportMode::Gp,
            origin: Country::France,
            destination: Country::Mali,
        })
        .unwrap();

    let freight_id = freight.id;
    let writer = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            for n in 0..PER_TASK {
                let mut form = NewShipment::for_freight(freight_id);
                form.sender.name = "Awa".to_string();
                form.sender.phone = format!("77123{:04}", n);
                form.recipient.name = "Moussa".to_string();
                form.recipient.phone = "0612345678".to_string();
                form.packaging = "bag".to_string();
                registry.create_shipment(form).unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let reader = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            for _ in 0..PER_TASK {
                let views = registry.list_shipment_views(None).unwrap();
                for view in views {
                    assert_eq!(view.price.base_amount_eur, rust_decimal::Decimal::from(50));
                }
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    assert_eq!(registry.list_shipments(None).len(), PER_TASK);
}
