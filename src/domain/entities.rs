//! Domain records normalized from API payloads.
//!
//! Every record is fully populated: optional wire fields receive defaults
//! here so downstream code never branches on missing thresholds or
//! categories. Records are owned by the cache once fetched and only replaced
//! wholesale through commit or invalidation flows.

use comanda_api_types::{
    InventoryItemDto, OrderDto, RecipeDto, RecipeIngredientDto, RestockItemDto, SalesDayDto,
    SalesTotalsDto,
};
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{OrderChannel, OrderStatus, RestockPriority, RestockStatus};

pub const DEFAULT_CATEGORY: &str = "uncategorized";
pub const DEFAULT_UNIT: &str = "unit";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItemRecord {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub available_qty: f64,
    pub reorder_point: f64,
    pub critical_point: f64,
    pub unit_cost: f64,
    /// Missing on backends that never recorded a stock movement for the item.
    pub updated_at: Option<OffsetDateTime>,
}

impl From<InventoryItemDto> for InventoryItemRecord {
    fn from(dto: InventoryItemDto) -> Self {
        Self {
            sku: dto.sku,
            name: dto.name,
            category: dto
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            unit: dto
                .unit
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            available_qty: dto.available_qty,
            reorder_point: dto.reorder_point.unwrap_or(0.0),
            critical_point: dto.critical_point.unwrap_or(0.0),
            unit_cost: dto.unit_cost.unwrap_or(0.0),
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockItemRecord {
    pub sku: String,
    pub name: String,
    pub requested_qty: f64,
    pub priority: RestockPriority,
    pub status: RestockStatus,
    pub supplier: Option<String>,
    pub requested_at: Option<OffsetDateTime>,
}

impl From<RestockItemDto> for RestockItemRecord {
    fn from(dto: RestockItemDto) -> Self {
        Self {
            sku: dto.sku,
            name: dto.name,
            requested_qty: dto.requested_qty,
            priority: dto.priority.unwrap_or(RestockPriority::Normal),
            status: dto.status.unwrap_or(RestockStatus::Pending),
            supplier: dto.supplier,
            requested_at: dto.requested_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub status: OrderStatus,
    pub channel: OrderChannel,
    pub total: f64,
    pub items_count: u32,
    pub customer: Option<String>,
    pub placed_at: OffsetDateTime,
}

impl From<OrderDto> for OrderRecord {
    fn from(dto: OrderDto) -> Self {
        Self {
            id: dto.id,
            status: dto.status,
            channel: dto.channel.unwrap_or(OrderChannel::DineIn),
            total: dto.total,
            items_count: dto.items_count.unwrap_or(0),
            customer: dto.customer,
            placed_at: dto.placed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesDayRecord {
    pub date: Date,
    pub total: f64,
    pub order_count: u32,
    pub avg_ticket: f64,
}

impl From<SalesDayDto> for SalesDayRecord {
    fn from(dto: SalesDayDto) -> Self {
        let avg_ticket = dto.avg_ticket.unwrap_or_else(|| {
            if dto.order_count == 0 {
                0.0
            } else {
                dto.total / f64::from(dto.order_count)
            }
        });
        Self {
            date: dto.date,
            total: dto.total,
            order_count: dto.order_count,
            avg_ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesTotalsRecord {
    pub start_date: Date,
    pub end_date: Date,
    pub total: f64,
    pub order_count: u32,
    pub by_day: Vec<SalesDayRecord>,
}

impl From<SalesTotalsDto> for SalesTotalsRecord {
    fn from(dto: SalesTotalsDto) -> Self {
        Self {
            start_date: dto.start_date,
            end_date: dto.end_date,
            total: dto.total,
            order_count: dto.order_count,
            by_day: dto
                .by_day
                .unwrap_or_default()
                .into_iter()
                .map(SalesDayRecord::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeIngredientRecord {
    pub sku: String,
    pub qty: f64,
}

impl From<RecipeIngredientDto> for RecipeIngredientRecord {
    fn from(dto: RecipeIngredientDto) -> Self {
        Self {
            sku: dto.sku,
            qty: dto.qty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub active: bool,
    pub ingredients: Vec<RecipeIngredientRecord>,
    pub updated_at: Option<OffsetDateTime>,
}

impl From<RecipeDto> for RecipeRecord {
    fn from(dto: RecipeDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            category: dto
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            price: dto.price.unwrap_or(0.0),
            active: dto.active.unwrap_or(true),
            ingredients: dto
                .ingredients
                .unwrap_or_default()
                .into_iter()
                .map(RecipeIngredientRecord::from)
                .collect(),
            updated_at: dto.updated_at,
        }
    }
}
