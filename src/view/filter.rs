//! The filter pipeline.
//!
//! `filter_*` functions are pure and deterministic: list in, list out,
//! no side effects. A spec with nothing set is the identity (same
//! elements, same order). Sorting is stable; items comparing equal keep
//! their input order. Predicates that do not apply to an entity kind are
//! ignored for that kind.

use time::OffsetDateTime;

use crate::domain::entities::{InventoryItemRecord, OrderRecord, RestockItemRecord};
use crate::domain::stock::{is_dead_stock, stock_level};
use crate::domain::types::{OrderStatus, RestockPriority, RestockStatus, StockLevel};

/// Sort key for filtered lists. Keys that do not exist on an entity kind
/// leave that list's order untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Category,
    Quantity,
    UpdatedAt,
    Priority,
    Total,
    PlacedAt,
}

/// Declarative filter/sort criteria. Build one per view application and
/// replace it wholesale when the user changes a control.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Case-insensitive substring match across the entity's text fields.
    pub search: Option<String>,
    /// Exact category match (inventory).
    pub category: Option<String>,
    /// Stock classification match (inventory).
    pub stock_level: Option<StockLevel>,
    /// Flag items untouched for more than this many days (inventory).
    pub dead_stock_days: Option<i64>,
    /// Exact status match (orders).
    pub order_status: Option<OrderStatus>,
    /// Exact status match (restock).
    pub restock_status: Option<RestockStatus>,
    /// Keep restock items at or above this priority.
    pub min_priority: Option<RestockPriority>,
    /// Stable sort by this key; `None` preserves input order.
    pub sort: Option<SortKey>,
    /// Reverse the sort direction. Stability is preserved either way.
    pub descending: bool,
}

impl FilterSpec {
    /// True when the spec neither filters nor sorts.
    pub fn is_identity(&self) -> bool {
        self.search.is_none()
            && self.category.is_none()
            && self.stock_level.is_none()
            && self.dead_stock_days.is_none()
            && self.order_status.is_none()
            && self.restock_status.is_none()
            && self.min_priority.is_none()
            && self.sort.is_none()
    }
}

/// Filter and sort the inventory list. `now` anchors the dead-stock window.
pub fn filter_inventory(
    items: Vec<InventoryItemRecord>,
    spec: &FilterSpec,
    now: OffsetDateTime,
) -> Vec<InventoryItemRecord> {
    if spec.is_identity() {
        return items;
    }

    let needle = lowered(&spec.search);
    let mut out: Vec<InventoryItemRecord> = items
        .into_iter()
        .filter(|item| {
            if let Some(needle) = &needle
                && !matches_search(
                    needle,
                    &[item.name.as_str(), item.sku.as_str(), item.category.as_str()],
                )
            {
                return false;
            }
            if let Some(category) = &spec.category
                && !item.category.eq_ignore_ascii_case(category)
            {
                return false;
            }
            if let Some(level) = spec.stock_level
                && stock_level(item) != level
            {
                return false;
            }
            if let Some(days) = spec.dead_stock_days
                && !is_dead_stock(item, now, days)
            {
                return false;
            }
            true
        })
        .collect();

    match spec.sort {
        Some(SortKey::Name) => sort_stable(&mut out, spec.descending, |a, b| a.name.cmp(&b.name)),
        Some(SortKey::Category) => {
            sort_stable(&mut out, spec.descending, |a, b| a.category.cmp(&b.category));
        }
        Some(SortKey::Quantity) => sort_stable(&mut out, spec.descending, |a, b| {
            a.available_qty.total_cmp(&b.available_qty)
        }),
        Some(SortKey::UpdatedAt) => {
            sort_stable(&mut out, spec.descending, |a, b| a.updated_at.cmp(&b.updated_at));
        }
        _ => {}
    }
    out
}

/// Filter and sort the restock list.
pub fn filter_restock(items: Vec<RestockItemRecord>, spec: &FilterSpec) -> Vec<RestockItemRecord> {
    if spec.is_identity() {
        return items;
    }

    let needle = lowered(&spec.search);
    let mut out: Vec<RestockItemRecord> = items
        .into_iter()
        .filter(|item| {
            if let Some(needle) = &needle {
                let supplier = item.supplier.as_deref().unwrap_or("");
                if !matches_search(needle, &[item.name.as_str(), item.sku.as_str(), supplier]) {
                    return false;
                }
            }
            if let Some(status) = spec.restock_status
                && item.status != status
            {
                return false;
            }
            if let Some(min) = spec.min_priority
                && item.priority < min
            {
                return false;
            }
            true
        })
        .collect();

    match spec.sort {
        Some(SortKey::Name) => sort_stable(&mut out, spec.descending, |a, b| a.name.cmp(&b.name)),
        Some(SortKey::Priority) => {
            sort_stable(&mut out, spec.descending, |a, b| a.priority.cmp(&b.priority));
        }
        Some(SortKey::Quantity) => sort_stable(&mut out, spec.descending, |a, b| {
            a.requested_qty.total_cmp(&b.requested_qty)
        }),
        _ => {}
    }
    out
}

/// Filter and sort an order list.
pub fn filter_orders(items: Vec<OrderRecord>, spec: &FilterSpec) -> Vec<OrderRecord> {
    if spec.is_identity() {
        return items;
    }

    let needle = lowered(&spec.search);
    let mut out: Vec<OrderRecord> = items
        .into_iter()
        .filter(|order| {
            if let Some(needle) = &needle {
                let customer = order.customer.as_deref().unwrap_or("");
                let id = order.id.to_string();
                if !matches_search(needle, &[customer, id.as_str()]) {
                    return false;
                }
            }
            if let Some(status) = spec.order_status
                && order.status != status
            {
                return false;
            }
            true
        })
        .collect();

    match spec.sort {
        Some(SortKey::Total) => {
            sort_stable(&mut out, spec.descending, |a, b| a.total.total_cmp(&b.total));
        }
        Some(SortKey::PlacedAt) => {
            sort_stable(&mut out, spec.descending, |a, b| a.placed_at.cmp(&b.placed_at));
        }
        _ => {}
    }
    out
}

fn lowered(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn matches_search(needle: &str, haystacks: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|hay| hay.to_lowercase().contains(needle))
}

/// `sort_by` is a stable sort; reversing the comparator (not the output)
/// keeps equal-key items in input order for descending sorts too.
fn sort_stable<T>(
    items: &mut [T],
    descending: bool,
    compare: impl Fn(&T, &T) -> std::cmp::Ordering,
) {
    if descending {
        items.sort_by(|a, b| compare(b, a));
    } else {
        items.sort_by(compare);
    }
}
