//! Shared test fixture: a scriptable in-memory backend.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use comanda::cache::DateWindow;
use comanda::client::{ClientError, DataBackend};
use comanda::domain::entities::{
    InventoryItemRecord, OrderRecord, RecipeRecord, RestockItemRecord, SalesDayRecord,
    SalesTotalsRecord,
};
use comanda_api_types::{
    SyncOrdersRequest, SyncOrdersResponse, UpdateRecipeRequest, UpdateStockRequest,
    UpdateStockResponse,
};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

pub fn item(sku: &str, qty: f64) -> InventoryItemRecord {
    InventoryItemRecord {
        sku: sku.to_string(),
        name: format!("Item {sku}"),
        category: "pantry".to_string(),
        unit: "kg".to_string(),
        available_qty: qty,
        reorder_point: 10.0,
        critical_point: 3.0,
        unit_cost: 1.0,
        updated_at: None,
    }
}

/// One scripted reply: an optional artificial latency plus an outcome.
pub struct Scripted<T> {
    pub delay: Duration,
    pub outcome: Result<T, String>,
}

impl<T> Scripted<T> {
    pub fn ok(value: T) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(value),
        }
    }

    pub fn ok_after(delay: Duration, value: T) -> Self {
        Self {
            delay,
            outcome: Ok(value),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(message.to_string()),
        }
    }
}

/// In-memory [`DataBackend`] with per-endpoint call counters and an optional
/// reply script for the inventory endpoint. Unscripted calls serve the
/// current canned state.
#[derive(Default)]
pub struct FakeBackend {
    pub inventory: Mutex<Vec<InventoryItemRecord>>,
    pub inventory_script: Mutex<VecDeque<Scripted<Vec<InventoryItemRecord>>>>,
    pub inventory_calls: AtomicUsize,
    pub restock_calls: AtomicUsize,
    pub recipes_calls: AtomicUsize,
    pub orders_calls: AtomicUsize,
    pub sales_calls: AtomicUsize,
    pub reject_writes: AtomicBool,
}

impl FakeBackend {
    pub fn with_inventory(items: Vec<InventoryItemRecord>) -> Self {
        Self {
            inventory: Mutex::new(items),
            ..Default::default()
        }
    }

    pub fn push_inventory_reply(&self, reply: Scripted<Vec<InventoryItemRecord>>) {
        self.inventory_script
            .lock()
            .expect("script lock")
            .push_back(reply);
    }

    pub fn inventory_call_count(&self) -> usize {
        self.inventory_calls.load(Ordering::SeqCst)
    }

    fn backend_error(message: String) -> ClientError {
        ClientError::Status {
            status: 500,
            body: message,
        }
    }
}

#[async_trait]
impl DataBackend for FakeBackend {
    async fn list_inventory(&self) -> Result<Vec<InventoryItemRecord>, ClientError> {
        self.inventory_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.inventory_script.lock().expect("script lock").pop_front();
        match scripted {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.outcome.map_err(Self::backend_error)
            }
            None => Ok(self.inventory.lock().expect("inventory lock").clone()),
        }
    }

    async fn list_restock(&self) -> Result<Vec<RestockItemRecord>, ClientError> {
        self.restock_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>, ClientError> {
        self.recipes_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn list_orders(&self, _window: DateWindow) -> Result<Vec<OrderRecord>, ClientError> {
        self.orders_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn sales_day(&self, date: Date) -> Result<SalesDayRecord, ClientError> {
        self.sales_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SalesDayRecord {
            date,
            total: 0.0,
            order_count: 0,
            avg_ticket: 0.0,
        })
    }

    async fn sales_totals(&self, window: DateWindow) -> Result<SalesTotalsRecord, ClientError> {
        self.sales_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SalesTotalsRecord {
            start_date: window.start(),
            end_date: window.end(),
            total: 0.0,
            order_count: 0,
            by_day: Vec::new(),
        })
    }

    async fn update_stock(
        &self,
        request: UpdateStockRequest,
    ) -> Result<UpdateStockResponse, ClientError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Validation {
                message: "quantity must be non-negative".to_string(),
            });
        }

        let mut inventory = self.inventory.lock().expect("inventory lock");
        if let Some(existing) = inventory.iter_mut().find(|i| i.sku == request.sku) {
            existing.available_qty = request.available_qty;
        } else {
            inventory.push(item(&request.sku, request.available_qty));
        }

        Ok(UpdateStockResponse {
            sku: request.sku,
            available_qty: request.available_qty,
            updated_at: OffsetDateTime::now_utc(),
        })
    }

    async fn sync_orders(
        &self,
        _request: SyncOrdersRequest,
    ) -> Result<SyncOrdersResponse, ClientError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Validation {
                message: "sync window too large".to_string(),
            });
        }
        Ok(SyncOrdersResponse { imported: 3 })
    }

    async fn update_recipe(
        &self,
        recipe_id: Uuid,
        request: UpdateRecipeRequest,
    ) -> Result<RecipeRecord, ClientError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Validation {
                message: "price must be positive".to_string(),
            });
        }
        Ok(RecipeRecord {
            id: recipe_id,
            name: request.name.unwrap_or_else(|| "Margherita".to_string()),
            category: "pizza".to_string(),
            price: request.price.unwrap_or(11.5),
            active: request.active.unwrap_or(true),
            ingredients: Vec::new(),
            updated_at: Some(OffsetDateTime::now_utc()),
        })
    }
}
