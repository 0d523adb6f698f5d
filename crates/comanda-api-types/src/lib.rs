//! Shared request and response types for the Comanda restaurant operations API.
//!
//! Every endpoint wraps its payload in [`ApiEnvelope`]; clients unwrap the
//! `data` field before caching or display. The DTOs here deliberately keep
//! server-optional fields as `Option`; normalization into fully-populated
//! domain records happens on the client side.

use serde::{Deserialize, Serialize};

mod cookbook;
mod inventory;
mod orders;
mod sales;
mod types;

pub use cookbook::{RecipeDto, RecipeIngredientDto, UpdateRecipeRequest};
pub use inventory::{InventoryItemDto, RestockItemDto, UpdateStockRequest, UpdateStockResponse};
pub use orders::{OrderDto, SyncOrdersRequest, SyncOrdersResponse};
pub use sales::{SalesDayDto, SalesTotalsDto};
pub use types::{OrderChannel, OrderStatus, RestockPriority, RestockStatus};

/// Standard response envelope: `{ "data": ..., "message": "..." }`.
///
/// `message` is informational and optional; it is surfaced to operators but
/// never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }
}
