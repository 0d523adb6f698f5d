//! The fetch orchestrator.
//!
//! Read path per resource: check the cached entry against its TTL, serve a
//! fresh hit directly, otherwise join (or lead) the single in-flight fetch
//! for that key, commit the outcome, and return a snapshot. An explicit
//! `refetch_*` bypasses both the freshness check and the in-flight join:
//! it issues a new generation, and the store discards any older fetch that
//! resolves afterwards.
//!
//! Write path: the mutation goes to the backend first; only a confirmed
//! write publishes its event, which invalidates the affected tags before
//! the mutation call returns. A rejected mutation propagates to the caller
//! and never touches cached read state.

use std::sync::Arc;

use comanda_api_types::{
    SyncOrdersRequest, SyncOrdersResponse, UpdateRecipeRequest, UpdateStockRequest,
    UpdateStockResponse,
};
use metrics::counter;
use time::{Date, OffsetDateTime};
use tokio::sync::watch;
use uuid::Uuid;

use crate::cache::{
    CacheConfig, CacheConsumer, CacheTrigger, ChangeHub, DateWindow, EventQueue, FlightError,
    InFlightTable, ResourceKey, ResourceStore, Revision,
};
use crate::client::{ClientError, DataBackend};
use crate::domain::entities::{
    InventoryItemRecord, OrderRecord, RecipeRecord, RestockItemRecord, SalesDayRecord,
    SalesTotalsRecord,
};

use super::refresh::RefreshLease;
use super::view::ResourceView;

const METRIC_HIT: &str = "comanda_cache_hit_total";
const METRIC_MISS: &str = "comanda_cache_miss_total";

/// Client-side data layer composition root.
pub struct SyncEngine {
    config: CacheConfig,
    backend: Arc<dyn DataBackend>,
    store: Arc<ResourceStore>,
    hub: Arc<ChangeHub>,
    trigger: CacheTrigger,

    inventory_flights: InFlightTable<ResourceKey, Vec<InventoryItemRecord>>,
    restock_flights: InFlightTable<ResourceKey, Vec<RestockItemRecord>>,
    recipes_flights: InFlightTable<ResourceKey, Vec<RecipeRecord>>,
    orders_flights: InFlightTable<ResourceKey, Vec<OrderRecord>>,
    sales_day_flights: InFlightTable<ResourceKey, SalesDayRecord>,
    sales_totals_flights: InFlightTable<ResourceKey, SalesTotalsRecord>,
}

impl SyncEngine {
    /// Wire up a complete engine around one backend.
    pub fn new(config: CacheConfig, backend: Arc<dyn DataBackend>) -> Arc<Self> {
        let hub = Arc::new(ChangeHub::new());
        let store = Arc::new(ResourceStore::new(&config, Arc::clone(&hub)));
        let queue = Arc::new(EventQueue::new(config.event_queue_limit));
        let consumer = Arc::new(CacheConsumer::new(
            config.clone(),
            Arc::clone(&store),
            Arc::clone(&queue),
            Arc::clone(&backend),
        ));
        let trigger = CacheTrigger::new(config.clone(), queue, consumer);

        Arc::new(Self {
            config,
            backend,
            store,
            hub,
            trigger,
            inventory_flights: InFlightTable::new(),
            restock_flights: InFlightTable::new(),
            recipes_flights: InFlightTable::new(),
            orders_flights: InFlightTable::new(),
            sales_day_flights: InFlightTable::new(),
            sales_totals_flights: InFlightTable::new(),
        })
    }

    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.store
    }

    pub fn trigger(&self) -> &CacheTrigger {
        &self.trigger
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Subscribe to revision changes for one key. Dropping the receiver is
    /// the unsubscription; a fetch resolving afterwards notifies nobody and
    /// still populates the cache for future consumers.
    pub fn subscribe(&self, key: ResourceKey) -> watch::Receiver<Revision> {
        self.hub.subscribe(key)
    }

    /// Prime hot resources; typically called once at startup.
    pub async fn prime(&self) {
        self.trigger.prime_on_startup().await;
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn inventory(&self) -> ResourceView<Vec<InventoryItemRecord>> {
        self.read_inventory(false).await
    }

    pub async fn refetch_inventory(&self) -> ResourceView<Vec<InventoryItemRecord>> {
        self.read_inventory(true).await
    }

    /// Non-blocking snapshot; never triggers a fetch.
    pub fn peek_inventory(&self) -> ResourceView<Vec<InventoryItemRecord>> {
        ResourceView::from_entry(self.store.inventory())
    }

    pub async fn restock(&self) -> ResourceView<Vec<RestockItemRecord>> {
        self.read_restock(false).await
    }

    pub async fn refetch_restock(&self) -> ResourceView<Vec<RestockItemRecord>> {
        self.read_restock(true).await
    }

    pub fn peek_restock(&self) -> ResourceView<Vec<RestockItemRecord>> {
        ResourceView::from_entry(self.store.restock())
    }

    pub async fn recipes(&self) -> ResourceView<Vec<RecipeRecord>> {
        self.read_recipes(false).await
    }

    pub async fn refetch_recipes(&self) -> ResourceView<Vec<RecipeRecord>> {
        self.read_recipes(true).await
    }

    pub fn peek_recipes(&self) -> ResourceView<Vec<RecipeRecord>> {
        ResourceView::from_entry(self.store.recipes())
    }

    pub async fn orders(&self, window: DateWindow) -> ResourceView<Vec<OrderRecord>> {
        self.read_orders(window, false).await
    }

    pub async fn refetch_orders(&self, window: DateWindow) -> ResourceView<Vec<OrderRecord>> {
        self.read_orders(window, true).await
    }

    pub async fn sales_day(&self, date: Date) -> ResourceView<SalesDayRecord> {
        self.read_sales_day(date, false).await
    }

    pub async fn refetch_sales_day(&self, date: Date) -> ResourceView<SalesDayRecord> {
        self.read_sales_day(date, true).await
    }

    pub async fn sales_totals(&self, window: DateWindow) -> ResourceView<SalesTotalsRecord> {
        self.read_sales_totals(window, false).await
    }

    pub async fn refetch_sales_totals(&self, window: DateWindow) -> ResourceView<SalesTotalsRecord> {
        self.read_sales_totals(window, true).await
    }

    /// Refetch whichever resource a key names; used by refresh leases.
    pub async fn refetch(&self, key: ResourceKey) {
        match key {
            ResourceKey::Inventory => {
                self.refetch_inventory().await;
            }
            ResourceKey::Restock => {
                self.refetch_restock().await;
            }
            ResourceKey::Recipes => {
                self.refetch_recipes().await;
            }
            ResourceKey::Orders(window) => {
                self.refetch_orders(window).await;
            }
            ResourceKey::SalesDay(date) => {
                self.refetch_sales_day(date).await;
            }
            ResourceKey::SalesTotals(window) => {
                self.refetch_sales_totals(window).await;
            }
        }
    }

    /// Acquire an auto-refresh lease: the key is refetched at the given
    /// interval until the lease is dropped.
    pub fn refresh_every(self: &Arc<Self>, key: ResourceKey, every: std::time::Duration) -> RefreshLease {
        RefreshLease::spawn(Arc::clone(self), key, every)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Update one SKU's stock level. A confirmed write invalidates the
    /// `Inventory` tag before this returns; a rejected one propagates
    /// without touching cached read state.
    pub async fn update_stock(
        &self,
        request: UpdateStockRequest,
    ) -> Result<UpdateStockResponse, ClientError> {
        let response = self.backend.update_stock(request).await?;
        self.trigger.stock_updated(&response.sku).await;
        Ok(response)
    }

    /// Pull fresh orders from the upstream point-of-sale, then invalidate
    /// order and sales state.
    pub async fn sync_orders(
        &self,
        request: SyncOrdersRequest,
    ) -> Result<SyncOrdersResponse, ClientError> {
        let response = self.backend.sync_orders(request).await?;
        self.trigger.orders_synced(response.imported).await;
        Ok(response)
    }

    /// Update a recipe, then invalidate the cookbook.
    pub async fn update_recipe(
        &self,
        recipe_id: Uuid,
        request: UpdateRecipeRequest,
    ) -> Result<RecipeRecord, ClientError> {
        let recipe = self.backend.update_recipe(recipe_id, request).await?;
        self.trigger.recipe_updated(recipe_id).await;
        Ok(recipe)
    }

    // ========================================================================
    // Read plumbing, one block per resource family
    // ========================================================================

    fn is_fresh_hit<T>(&self, entry: &crate::cache::CacheEntry<T>, key: ResourceKey) -> bool {
        self.config.enabled
            && entry.is_fresh(self.config.ttl_for(key.tag()), OffsetDateTime::now_utc())
    }

    async fn read_inventory(&self, force: bool) -> ResourceView<Vec<InventoryItemRecord>> {
        let key = ResourceKey::Inventory;
        if !force {
            let entry = self.store.inventory();
            if self.is_fresh_hit(&entry, key) {
                counter!(METRIC_HIT).increment(1);
                return ResourceView::from_entry(entry);
            }
        }
        counter!(METRIC_MISS).increment(1);
        if force {
            let _ = self.run_inventory_fetch().await;
        } else {
            let _ = self
                .inventory_flights
                .fetch_or_join(key, self.run_inventory_fetch())
                .await;
        }
        ResourceView::from_entry(self.store.inventory())
    }

    async fn run_inventory_fetch(&self) -> Result<Vec<InventoryItemRecord>, FlightError> {
        let generation = self.store.begin_inventory_fetch();
        let result = self
            .backend
            .list_inventory()
            .await
            .map_err(|err| err.to_string());
        self.store
            .commit_inventory(generation, result.clone(), self.config.keep_stale_on_error);
        result.map_err(FlightError::failed)
    }

    async fn read_restock(&self, force: bool) -> ResourceView<Vec<RestockItemRecord>> {
        let key = ResourceKey::Restock;
        if !force {
            let entry = self.store.restock();
            if self.is_fresh_hit(&entry, key) {
                counter!(METRIC_HIT).increment(1);
                return ResourceView::from_entry(entry);
            }
        }
        counter!(METRIC_MISS).increment(1);
        if force {
            let _ = self.run_restock_fetch().await;
        } else {
            let _ = self
                .restock_flights
                .fetch_or_join(key, self.run_restock_fetch())
                .await;
        }
        ResourceView::from_entry(self.store.restock())
    }

    async fn run_restock_fetch(&self) -> Result<Vec<RestockItemRecord>, FlightError> {
        let generation = self.store.begin_restock_fetch();
        let result = self
            .backend
            .list_restock()
            .await
            .map_err(|err| err.to_string());
        self.store
            .commit_restock(generation, result.clone(), self.config.keep_stale_on_error);
        result.map_err(FlightError::failed)
    }

    async fn read_recipes(&self, force: bool) -> ResourceView<Vec<RecipeRecord>> {
        let key = ResourceKey::Recipes;
        if !force {
            let entry = self.store.recipes();
            if self.is_fresh_hit(&entry, key) {
                counter!(METRIC_HIT).increment(1);
                return ResourceView::from_entry(entry);
            }
        }
        counter!(METRIC_MISS).increment(1);
        if force {
            let _ = self.run_recipes_fetch().await;
        } else {
            let _ = self
                .recipes_flights
                .fetch_or_join(key, self.run_recipes_fetch())
                .await;
        }
        ResourceView::from_entry(self.store.recipes())
    }

    async fn run_recipes_fetch(&self) -> Result<Vec<RecipeRecord>, FlightError> {
        let generation = self.store.begin_recipes_fetch();
        let result = self
            .backend
            .list_recipes()
            .await
            .map_err(|err| err.to_string());
        self.store
            .commit_recipes(generation, result.clone(), self.config.keep_stale_on_error);
        result.map_err(FlightError::failed)
    }

    async fn read_orders(&self, window: DateWindow, force: bool) -> ResourceView<Vec<OrderRecord>> {
        let key = ResourceKey::Orders(window);
        if !force {
            let entry = self.store.orders(window);
            if self.is_fresh_hit(&entry, key) {
                counter!(METRIC_HIT).increment(1);
                return ResourceView::from_entry(entry);
            }
        }
        counter!(METRIC_MISS).increment(1);
        if force {
            let _ = self.run_orders_fetch(window).await;
        } else {
            let _ = self
                .orders_flights
                .fetch_or_join(key, self.run_orders_fetch(window))
                .await;
        }
        ResourceView::from_entry(self.store.orders(window))
    }

    async fn run_orders_fetch(&self, window: DateWindow) -> Result<Vec<OrderRecord>, FlightError> {
        let generation = self.store.begin_orders_fetch(window);
        let result = self
            .backend
            .list_orders(window)
            .await
            .map_err(|err| err.to_string());
        self.store.commit_orders(
            window,
            generation,
            result.clone(),
            self.config.keep_stale_on_error,
        );
        result.map_err(FlightError::failed)
    }

    async fn read_sales_day(&self, date: Date, force: bool) -> ResourceView<SalesDayRecord> {
        let key = ResourceKey::SalesDay(date);
        if !force {
            let entry = self.store.sales_day(date);
            if self.is_fresh_hit(&entry, key) {
                counter!(METRIC_HIT).increment(1);
                return ResourceView::from_entry(entry);
            }
        }
        counter!(METRIC_MISS).increment(1);
        if force {
            let _ = self.run_sales_day_fetch(date).await;
        } else {
            let _ = self
                .sales_day_flights
                .fetch_or_join(key, self.run_sales_day_fetch(date))
                .await;
        }
        ResourceView::from_entry(self.store.sales_day(date))
    }

    async fn run_sales_day_fetch(&self, date: Date) -> Result<SalesDayRecord, FlightError> {
        let generation = self.store.begin_sales_day_fetch(date);
        let result = self
            .backend
            .sales_day(date)
            .await
            .map_err(|err| err.to_string());
        self.store.commit_sales_day(
            date,
            generation,
            result.clone(),
            self.config.keep_stale_on_error,
        );
        result.map_err(FlightError::failed)
    }

    async fn read_sales_totals(
        &self,
        window: DateWindow,
        force: bool,
    ) -> ResourceView<SalesTotalsRecord> {
        let key = ResourceKey::SalesTotals(window);
        if !force {
            let entry = self.store.sales_totals(window);
            if self.is_fresh_hit(&entry, key) {
                counter!(METRIC_HIT).increment(1);
                return ResourceView::from_entry(entry);
            }
        }
        counter!(METRIC_MISS).increment(1);
        if force {
            let _ = self.run_sales_totals_fetch(window).await;
        } else {
            let _ = self
                .sales_totals_flights
                .fetch_or_join(key, self.run_sales_totals_fetch(window))
                .await;
        }
        ResourceView::from_entry(self.store.sales_totals(window))
    }

    async fn run_sales_totals_fetch(
        &self,
        window: DateWindow,
    ) -> Result<SalesTotalsRecord, FlightError> {
        let generation = self.store.begin_sales_totals_fetch(window);
        let result = self
            .backend
            .sales_totals(window)
            .await
            .map_err(|err| err.to_string());
        self.store.commit_sales_totals(
            window,
            generation,
            result.clone(),
            self.config.keep_stale_on_error,
        );
        result.map_err(FlightError::failed)
    }
}
