//! Inventory and stock-mutation wire types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{RestockPriority, RestockStatus};

/// One inventory line as returned by `GET /inventory`.
///
/// Threshold and cost fields are optional on the wire; the client substitutes
/// defaults during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemDto {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    pub available_qty: f64,
    #[serde(default)]
    pub reorder_point: Option<f64>,
    #[serde(default)]
    pub critical_point: Option<f64>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// One restock suggestion as returned by `GET /inventory/restock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockItemDto {
    pub sku: String,
    pub name: String,
    pub requested_qty: f64,
    #[serde(default)]
    pub priority: Option<RestockPriority>,
    #[serde(default)]
    pub status: Option<RestockStatus>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub requested_at: Option<OffsetDateTime>,
}

/// Body of `POST /stock/update-stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStockRequest {
    pub sku: String,
    pub available_qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Payload of a successful stock update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStockResponse {
    pub sku: String,
    pub available_qty: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
