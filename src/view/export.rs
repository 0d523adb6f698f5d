//! CSV export.
//!
//! Synchronous, in-memory transforms of filtered lists into CSV text with a
//! fixed header row. Consumes the filter pipeline's output; it never fetches.

use std::string::FromUtf8Error;

use csv::Writer;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;

use crate::domain::entities::{InventoryItemRecord, OrderRecord, RestockItemRecord};
use crate::domain::stock::stock_level;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

const INVENTORY_HEADER: [&str; 9] = [
    "sku",
    "name",
    "category",
    "unit",
    "available_qty",
    "reorder_point",
    "critical_point",
    "stock_level",
    "updated_at",
];

const RESTOCK_HEADER: [&str; 7] = [
    "sku",
    "name",
    "requested_qty",
    "priority",
    "status",
    "supplier",
    "requested_at",
];

const ORDERS_HEADER: [&str; 7] = [
    "id",
    "status",
    "channel",
    "total",
    "items_count",
    "customer",
    "placed_at",
];

/// Render an inventory list as CSV, including the derived stock level.
pub fn export_inventory_csv(items: &[InventoryItemRecord]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(INVENTORY_HEADER)?;
    for item in items {
        let available = format_qty(item.available_qty);
        let reorder = format_qty(item.reorder_point);
        let critical = format_qty(item.critical_point);
        let updated = format_timestamp(item.updated_at);
        writer.write_record([
            item.sku.as_str(),
            item.name.as_str(),
            item.category.as_str(),
            item.unit.as_str(),
            available.as_str(),
            reorder.as_str(),
            critical.as_str(),
            stock_level(item).as_str(),
            updated.as_str(),
        ])?;
    }
    finish(writer)
}

/// Render a restock list as CSV.
pub fn export_restock_csv(items: &[RestockItemRecord]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(RESTOCK_HEADER)?;
    for item in items {
        let requested = format_qty(item.requested_qty);
        let requested_at = format_timestamp(item.requested_at);
        writer.write_record([
            item.sku.as_str(),
            item.name.as_str(),
            requested.as_str(),
            item.priority.as_str(),
            item.status.as_str(),
            item.supplier.as_deref().unwrap_or(""),
            requested_at.as_str(),
        ])?;
    }
    finish(writer)
}

/// Render an order list as CSV.
pub fn export_orders_csv(orders: &[OrderRecord]) -> Result<String, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(ORDERS_HEADER)?;
    for order in orders {
        let id = order.id.to_string();
        let total = format_qty(order.total);
        let items_count = order.items_count.to_string();
        let placed_at = format_timestamp(Some(order.placed_at));
        writer.write_record([
            id.as_str(),
            order.status.as_str(),
            order.channel.as_str(),
            total.as_str(),
            items_count.as_str(),
            order.customer.as_deref().unwrap_or(""),
            placed_at.as_str(),
        ])?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Quantities print with two decimals so spreadsheets align columns.
fn format_qty(value: f64) -> String {
    format!("{value:.2}")
}

fn format_timestamp(value: Option<time::OffsetDateTime>) -> String {
    value
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample_item() -> InventoryItemRecord {
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
        }
    }

    #[test]
    fn empty_list_yields_header_only() {
        let csv = export_inventory_csv(&[]).expect("export");
        assert_eq!(
            csv,
            "sku,name,category,unit,available_qty,reorder_point,critical_point,stock_level,updated_at\n"
        );
    }

    #[test]
    fn exported_rows_parse_back() {
        let csv = export_inventory_csv(&[sample_item()]).expect("export");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(&headers[0], "sku");
        assert_eq!(&headers[7], "stock_level");

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().expect("rows");
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][0], "TOM-001");
        assert_eq!(&records[0][4], "4.50");
        // 4.5 <= reorder_point 10 and > critical_point 3.
        assert_eq!(&records[0][7], "low");
        assert_eq!(&records[0][8], "2026-03-01T08:00:00Z");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut item = sample_item();
        item.name = "Tomatoes, crushed".to_string();
        let csv = export_inventory_csv(&[item]).expect("export");
        assert!(csv.contains("\"Tomatoes, crushed\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().expect("rows");
        assert_eq!(&records[0][1], "Tomatoes, crushed");
    }

    #[test]
    fn missing_optionals_export_as_empty_cells() {
        let item = RestockItemRecord {
            sku: "FLR-002".to_string(),
            name: "Bread Flour".to_string(),
            requested_qty: 25.0,
            priority: crate::domain::types::RestockPriority::Urgent,
            status: crate::domain::types::RestockStatus::Pending,
            supplier: None,
            requested_at: None,
        };
        let csv = export_restock_csv(&[item]).expect("export");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().expect("rows");
        assert_eq!(&records[0][5], "");
        assert_eq!(&records[0][6], "");
        assert_eq!(&records[0][3], "urgent");
    }
}
