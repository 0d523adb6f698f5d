//! Pure stock-health classification.
//!
//! Classification is a function of one item's fields and its configured
//! thresholds, with no cross-item comparison, so every rule here is unit-testable
//! item by item.

use time::{Duration, OffsetDateTime};

use crate::domain::entities::InventoryItemRecord;
use crate::domain::types::StockLevel;

/// Classify stock health from a quantity and its thresholds.
///
/// `critical_point` wins over `reorder_point` when both match; a quantity
/// above both is `Good`. Thresholds of zero mean "never flag".
pub fn classify_stock(available_qty: f64, reorder_point: f64, critical_point: f64) -> StockLevel {
    if critical_point > 0.0 && available_qty <= critical_point {
        StockLevel::Critical
    } else if reorder_point > 0.0 && available_qty <= reorder_point {
        StockLevel::Low
    } else {
        StockLevel::Good
    }
}

/// Convenience wrapper over [`classify_stock`] for a full record.
pub fn stock_level(item: &InventoryItemRecord) -> StockLevel {
    classify_stock(item.available_qty, item.reorder_point, item.critical_point)
}

/// Dead-stock test: the item has not moved for more than `threshold_days`.
///
/// Items with no recorded movement timestamp are never flagged; absence of
/// history is not evidence of staleness.
pub fn is_dead_stock(item: &InventoryItemRecord, now: OffsetDateTime, threshold_days: i64) -> bool {
    match item.updated_at {
        Some(updated_at) => now - updated_at > Duration::days(threshold_days),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn item(qty: f64, reorder: f64, critical: f64) -> InventoryItemRecord {
        InventoryItemRecord {
            sku: "TST-001".to_string(),
            name: "Test Item".to_string(),
            category: "uncategorized".to_string(),
            unit: "unit".to_string(),
            available_qty: qty,
            reorder_point: reorder,
            critical_point: critical,
            unit_cost: 0.0,
            updated_at: None,
        }
    }

    #[test]
    fn qty_between_critical_and_reorder_is_low() {
        assert_eq!(classify_stock(5.0, 10.0, 3.0), StockLevel::Low);
    }

    #[test]
    fn qty_at_or_below_critical_is_critical() {
        assert_eq!(classify_stock(2.0, 10.0, 3.0), StockLevel::Critical);
        assert_eq!(classify_stock(3.0, 10.0, 3.0), StockLevel::Critical);
    }

    #[test]
    fn qty_above_reorder_is_good() {
        assert_eq!(classify_stock(11.0, 10.0, 3.0), StockLevel::Good);
    }

    #[test]
    fn boundary_qty_equal_to_reorder_is_low() {
        assert_eq!(classify_stock(10.0, 10.0, 3.0), StockLevel::Low);
    }

    #[test]
    fn zero_thresholds_never_flag() {
        assert_eq!(classify_stock(0.0, 0.0, 0.0), StockLevel::Good);
    }

    #[test]
    fn record_wrapper_matches_raw_classification() {
        assert_eq!(stock_level(&item(5.0, 10.0, 3.0)), StockLevel::Low);
        assert_eq!(stock_level(&item(2.0, 10.0, 3.0)), StockLevel::Critical);
    }

    #[test]
    fn dead_stock_requires_movement_history() {
        let now = datetime!(2026-03-10 12:00 UTC);
        let mut aged = item(5.0, 0.0, 0.0);
        aged.updated_at = Some(datetime!(2026-01-01 12:00 UTC));
        assert!(is_dead_stock(&aged, now, 30));
        assert!(!is_dead_stock(&aged, now, 90));

        let unknown = item(5.0, 0.0, 0.0);
        assert!(!is_dead_stock(&unknown, now, 1));
    }
}
