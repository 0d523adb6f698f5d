//! Backend seam between the sync engine and the wire client.
//!
//! The engine depends on this trait rather than on [`ApiClient`] directly so
//! tests can wire in fakes and alternative transports stay possible. The
//! trait returns normalized domain records: DTO-to-record conversion happens
//! on this boundary, never further in.

use async_trait::async_trait;
use comanda_api_types::{
    SyncOrdersRequest, SyncOrdersResponse, UpdateRecipeRequest, UpdateStockRequest,
    UpdateStockResponse,
};
use time::Date;
use uuid::Uuid;

use crate::cache::DateWindow;
use crate::domain::entities::{
    InventoryItemRecord, OrderRecord, RecipeRecord, RestockItemRecord, SalesDayRecord,
    SalesTotalsRecord,
};

use super::error::ClientError;
use super::http::ApiClient;

/// Typed access to every backend operation the data layer needs.
#[async_trait]
pub trait DataBackend: Send + Sync {
    async fn list_inventory(&self) -> Result<Vec<InventoryItemRecord>, ClientError>;
    async fn list_restock(&self) -> Result<Vec<RestockItemRecord>, ClientError>;
    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>, ClientError>;
    async fn list_orders(&self, window: DateWindow) -> Result<Vec<OrderRecord>, ClientError>;
    async fn sales_day(&self, date: Date) -> Result<SalesDayRecord, ClientError>;
    async fn sales_totals(&self, window: DateWindow) -> Result<SalesTotalsRecord, ClientError>;

    async fn update_stock(
        &self,
        request: UpdateStockRequest,
    ) -> Result<UpdateStockResponse, ClientError>;
    async fn sync_orders(
        &self,
        request: SyncOrdersRequest,
    ) -> Result<SyncOrdersResponse, ClientError>;
    async fn update_recipe(
        &self,
        recipe_id: Uuid,
        request: UpdateRecipeRequest,
    ) -> Result<RecipeRecord, ClientError>;
}

#[async_trait]
impl DataBackend for ApiClient {
    async fn list_inventory(&self) -> Result<Vec<InventoryItemRecord>, ClientError> {
        let items = self.list_inventory_raw().await?;
        Ok(items.into_iter().map(InventoryItemRecord::from).collect())
    }

    async fn list_restock(&self) -> Result<Vec<RestockItemRecord>, ClientError> {
        let items = self.list_restock_raw().await?;
        Ok(items.into_iter().map(RestockItemRecord::from).collect())
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>, ClientError> {
        let recipes = self.list_recipes_raw().await?;
        Ok(recipes.into_iter().map(RecipeRecord::from).collect())
    }

    async fn list_orders(&self, window: DateWindow) -> Result<Vec<OrderRecord>, ClientError> {
        let orders = self.list_orders_raw(window).await?;
        Ok(orders.into_iter().map(OrderRecord::from).collect())
    }

    async fn sales_day(&self, date: Date) -> Result<SalesDayRecord, ClientError> {
        Ok(self.sales_day_raw(date).await?.into())
    }

    async fn sales_totals(&self, window: DateWindow) -> Result<SalesTotalsRecord, ClientError> {
        Ok(self.sales_totals_raw(window).await?.into())
    }

    async fn update_stock(
        &self,
        request: UpdateStockRequest,
    ) -> Result<UpdateStockResponse, ClientError> {
        self.update_stock_raw(&request).await
    }

    async fn sync_orders(
        &self,
        request: SyncOrdersRequest,
    ) -> Result<SyncOrdersResponse, ClientError> {
        self.sync_orders_raw(&request).await
    }

    async fn update_recipe(
        &self,
        recipe_id: Uuid,
        request: UpdateRecipeRequest,
    ) -> Result<RecipeRecord, ClientError> {
        Ok(self.update_recipe_raw(recipe_id, &request).await?.into())
    }
}
