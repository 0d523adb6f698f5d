//! Snapshot coverage for operator-facing text output: CSV exports and the
//! invalidation plan rendering that shows up in logs.

use comanda::cache::{InvalidationPlan, WriteEvent, WriteKind};
use comanda::domain::entities::{InventoryItemRecord, RestockItemRecord};
use comanda::domain::types::{RestockPriority, RestockStatus};
use comanda::view::{export_inventory_csv, export_restock_csv};
use time::macros::datetime;

fn inventory_fixture() -> Vec<InventoryItemRecord> {
    vec![
        InventoryItemRecord {
            sku: "TOM-001".to_string(),
            name: "Tomato Sauce".to_string(),
            category: "pantry".to_string(),
            unit: "kg".to_string(),
            available_qty: 4.5,
            reorder_point: 10.0,
            critical_point: 3.0,
            unit_cost: 1.2,
            updated_at: Some(datetime!(2026-03-01 08:00 UTC)),
        },
        InventoryItemRecord {
            sku: "MOZ-001".to_string(),
            name: "Mozzarella".to_string(),
            category: "dairy".to_string(),
            unit: "kg".to_string(),
            available_qty: 2.0,
            reorder_point: 8.0,
            critical_point: 3.0,
            unit_cost: 6.8,
            updated_at: None,
        },
    ]
}

#[test]
fn inventory_csv_layout() {
    let csv = export_inventory_csv(&inventory_fixture()).expect("export");
    insta::assert_snapshot!("inventory_csv", csv.trim_end());
}

#[test]
fn restock_csv_layout() {
    let items = vec![RestockItemRecord {
        sku: "FLR-002".to_string(),
        name: "Bread Flour".to_string(),
        requested_qty: 25.0,
        priority: RestockPriority::Urgent,
        status: RestockStatus::Pending,
        supplier: Some("Molino Rossi".to_string()),
        requested_at: Some(datetime!(2026-03-02 08:30 UTC)),
    }];
    let csv = export_restock_csv(&items).expect("export");
    insta::assert_snapshot!("restock_csv", csv.trim_end());
}

#[test]
fn stock_update_plan_rendering() {
    let events = vec![WriteEvent::new(
        WriteKind::StockUpdated {
            sku: "TOM-001".to_string(),
        },
        0,
    )];
    let plan = InvalidationPlan::from_events(events);
    insta::assert_snapshot!("stock_update_plan", plan.to_string());
}

#[test]
fn startup_prime_plan_rendering() {
    let events = vec![WriteEvent::new(WriteKind::PrimeOnStartup, 0)];
    let plan = InvalidationPlan::from_events(events);
    insta::assert_snapshot!("startup_prime_plan", plan.to_string());
}
