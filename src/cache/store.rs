//! Resource cache storage.
//!
//! One typed section per fetchable resource family: singleton slots for the
//! list resources (inventory, restock, cookbook) and LRU sections for
//! parameterized queries (order windows, sales days/totals). Every mutation
//! replaces the entry wholesale and publishes the new revision to the change
//! hub before returning, so subscribers always observe a committed state.
//!
//! Commits carry the generation issued by `begin_*_fetch`; a commit whose
//! generation is older than the newest issued one is discarded: a slow
//! response must never overwrite a fresher result.

use std::sync::{Arc, RwLock};

use lru::LruCache;
use metrics::counter;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::domain::entities::{
    InventoryItemRecord, OrderRecord, RecipeRecord, RestockItemRecord, SalesDayRecord,
    SalesTotalsRecord,
};

use super::config::CacheConfig;
use super::entry::{CacheEntry, Generation};
use super::hub::ChangeHub;
use super::keys::{DateWindow, ResourceKey, ResourceTag};
use super::lock::{read_guard, write_guard};

const SOURCE: &str = "cache::store";

const METRIC_SUPERSEDED: &str = "comanda_cache_superseded_total";
const METRIC_EVICT: &str = "comanda_cache_evict_total";

/// Result of presenting a generation at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The entry was replaced and subscribers were notified.
    Committed,
    /// A newer fetch was issued meanwhile; this result was discarded.
    Superseded,
}

/// Client-side cache for every fetchable resource.
pub struct ResourceStore {
    // Singleton list resources
    inventory: RwLock<CacheEntry<Vec<InventoryItemRecord>>>,
    restock: RwLock<CacheEntry<Vec<RestockItemRecord>>>,
    recipes: RwLock<CacheEntry<Vec<RecipeRecord>>>,

    // Parameterized sections (LRU eviction)
    orders: RwLock<LruCache<DateWindow, CacheEntry<Vec<OrderRecord>>>>,
    sales_days: RwLock<LruCache<Date, CacheEntry<SalesDayRecord>>>,
    sales_totals: RwLock<LruCache<DateWindow, CacheEntry<SalesTotalsRecord>>>,

    hub: Arc<ChangeHub>,
}

impl ResourceStore {
    /// Create a store with the given configuration, publishing changes to
    /// `hub`.
    pub fn new(config: &CacheConfig, hub: Arc<ChangeHub>) -> Self {
        Self {
            inventory: RwLock::new(CacheEntry::idle()),
            restock: RwLock::new(CacheEntry::idle()),
            recipes: RwLock::new(CacheEntry::idle()),
            orders: RwLock::new(LruCache::new(config.orders_window_limit_non_zero())),
            sales_days: RwLock::new(LruCache::new(config.sales_day_limit_non_zero())),
            sales_totals: RwLock::new(LruCache::new(config.sales_totals_limit_non_zero())),
            hub,
        }
    }

    pub fn hub(&self) -> &Arc<ChangeHub> {
        &self.hub
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn inventory(&self) -> CacheEntry<Vec<InventoryItemRecord>> {
        read_guard(&self.inventory, SOURCE, "inventory").clone()
    }

    pub fn restock(&self) -> CacheEntry<Vec<RestockItemRecord>> {
        read_guard(&self.restock, SOURCE, "restock").clone()
    }

    pub fn recipes(&self) -> CacheEntry<Vec<RecipeRecord>> {
        read_guard(&self.recipes, SOURCE, "recipes").clone()
    }

    pub fn orders(&self, window: DateWindow) -> CacheEntry<Vec<OrderRecord>> {
        let mut section = write_guard(&self.orders, SOURCE, "orders");
        section.get(&window).cloned().unwrap_or_default()
    }

    pub fn sales_day(&self, date: Date) -> CacheEntry<SalesDayRecord> {
        let mut section = write_guard(&self.sales_days, SOURCE, "sales_day");
        section.get(&date).cloned().unwrap_or_default()
    }

    pub fn sales_totals(&self, window: DateWindow) -> CacheEntry<SalesTotalsRecord> {
        let mut section = write_guard(&self.sales_totals, SOURCE, "sales_totals");
        section.get(&window).cloned().unwrap_or_default()
    }

    // ========================================================================
    // Fetch lifecycle: begin marks Loading and issues a generation; commit
    // applies the outcome if no newer generation was issued meanwhile.
    // ========================================================================

    pub fn begin_inventory_fetch(&self) -> Generation {
        Self::begin_slot(&self.hub, &self.inventory, ResourceKey::Inventory, "begin_inventory")
    }

    pub fn commit_inventory(
        &self,
        generation: Generation,
        result: Result<Vec<InventoryItemRecord>, String>,
        keep_stale: bool,
    ) -> CommitOutcome {
        Self::commit_slot(
            &self.hub,
            &self.inventory,
            ResourceKey::Inventory,
            generation,
            result,
            keep_stale,
            "commit_inventory",
        )
    }

    pub fn begin_restock_fetch(&self) -> Generation {
        Self::begin_slot(&self.hub, &self.restock, ResourceKey::Restock, "begin_restock")
    }

    pub fn commit_restock(
        &self,
        generation: Generation,
        result: Result<Vec<RestockItemRecord>, String>,
        keep_stale: bool,
    ) -> CommitOutcome {
        Self::commit_slot(
            &self.hub,
            &self.restock,
            ResourceKey::Restock,
            generation,
            result,
            keep_stale,
            "commit_restock",
        )
    }

    pub fn begin_recipes_fetch(&self) -> Generation {
        Self::begin_slot(&self.hub, &self.recipes, ResourceKey::Recipes, "begin_recipes")
    }

    pub fn commit_recipes(
        &self,
        generation: Generation,
        result: Result<Vec<RecipeRecord>, String>,
        keep_stale: bool,
    ) -> CommitOutcome {
        Self::commit_slot(
            &self.hub,
            &self.recipes,
            ResourceKey::Recipes,
            generation,
            result,
            keep_stale,
            "commit_recipes",
        )
    }

    pub fn begin_orders_fetch(&self, window: DateWindow) -> Generation {
        Self::begin_section(
            &self.hub,
            &self.orders,
            window,
            ResourceKey::Orders(window),
            "begin_orders",
        )
    }

    pub fn commit_orders(
        &self,
        window: DateWindow,
        generation: Generation,
        result: Result<Vec<OrderRecord>, String>,
        keep_stale: bool,
    ) -> CommitOutcome {
        Self::commit_section(
            &self.hub,
            &self.orders,
            window,
            ResourceKey::Orders(window),
            generation,
            result,
            keep_stale,
            "commit_orders",
        )
    }

    pub fn begin_sales_day_fetch(&self, date: Date) -> Generation {
        Self::begin_section(
            &self.hub,
            &self.sales_days,
            date,
            ResourceKey::SalesDay(date),
            "begin_sales_day",
        )
    }

    pub fn commit_sales_day(
        &self,
        date: Date,
        generation: Generation,
        result: Result<SalesDayRecord, String>,
        keep_stale: bool,
    ) -> CommitOutcome {
        Self::commit_section(
            &self.hub,
            &self.sales_days,
            date,
            ResourceKey::SalesDay(date),
            generation,
            result,
            keep_stale,
            "commit_sales_day",
        )
    }

    pub fn begin_sales_totals_fetch(&self, window: DateWindow) -> Generation {
        Self::begin_section(
            &self.hub,
            &self.sales_totals,
            window,
            ResourceKey::SalesTotals(window),
            "begin_sales_totals",
        )
    }

    pub fn commit_sales_totals(
        &self,
        window: DateWindow,
        generation: Generation,
        result: Result<SalesTotalsRecord, String>,
        keep_stale: bool,
    ) -> CommitOutcome {
        Self::commit_section(
            &self.hub,
            &self.sales_totals,
            window,
            ResourceKey::SalesTotals(window),
            generation,
            result,
            keep_stale,
            "commit_sales_totals",
        )
    }

    // ========================================================================
    // Invalidation
    // ========================================================================

    /// Reset one key to `Idle`, forcing a refetch on next access.
    pub fn invalidate(&self, key: ResourceKey) {
        match key {
            ResourceKey::Inventory => {
                Self::invalidate_slot(&self.hub, &self.inventory, key, "invalidate_inventory");
            }
            ResourceKey::Restock => {
                Self::invalidate_slot(&self.hub, &self.restock, key, "invalidate_restock");
            }
            ResourceKey::Recipes => {
                Self::invalidate_slot(&self.hub, &self.recipes, key, "invalidate_recipes");
            }
            ResourceKey::Orders(window) => {
                Self::invalidate_section_key(&self.hub, &self.orders, window, key, "invalidate_orders");
            }
            ResourceKey::SalesDay(date) => {
                Self::invalidate_section_key(
                    &self.hub,
                    &self.sales_days,
                    date,
                    key,
                    "invalidate_sales_day",
                );
            }
            ResourceKey::SalesTotals(window) => {
                Self::invalidate_section_key(
                    &self.hub,
                    &self.sales_totals,
                    window,
                    key,
                    "invalidate_sales_totals",
                );
            }
        }
    }

    /// Reset every key under a tag. Multiple cached keys can reference the
    /// same server-side state; a write to that state invalidates them all.
    pub fn invalidate_tag(&self, tag: ResourceTag) {
        debug!(tag = tag.as_str(), "Invalidating cache tag");
        match tag {
            ResourceTag::Inventory => {
                Self::invalidate_slot(
                    &self.hub,
                    &self.inventory,
                    ResourceKey::Inventory,
                    "invalidate_tag.inventory",
                );
                Self::invalidate_slot(
                    &self.hub,
                    &self.restock,
                    ResourceKey::Restock,
                    "invalidate_tag.restock",
                );
            }
            ResourceTag::Cookbook => {
                Self::invalidate_slot(
                    &self.hub,
                    &self.recipes,
                    ResourceKey::Recipes,
                    "invalidate_tag.recipes",
                );
            }
            ResourceTag::Orders => {
                Self::invalidate_section(&self.hub, &self.orders, ResourceKey::Orders, "invalidate_tag.orders");
            }
            ResourceTag::Sales => {
                Self::invalidate_section(
                    &self.hub,
                    &self.sales_days,
                    ResourceKey::SalesDay,
                    "invalidate_tag.sales_days",
                );
                Self::invalidate_section(
                    &self.hub,
                    &self.sales_totals,
                    ResourceKey::SalesTotals,
                    "invalidate_tag.sales_totals",
                );
            }
        }
    }

    /// Drop all cached data, stale copies included.
    pub fn clear(&self) {
        Self::clear_slot(&self.hub, &self.inventory, ResourceKey::Inventory, "clear.inventory");
        Self::clear_slot(&self.hub, &self.restock, ResourceKey::Restock, "clear.restock");
        Self::clear_slot(&self.hub, &self.recipes, ResourceKey::Recipes, "clear.recipes");
        write_guard(&self.orders, SOURCE, "clear.orders").clear();
        write_guard(&self.sales_days, SOURCE, "clear.sales_days").clear();
        write_guard(&self.sales_totals, SOURCE, "clear.sales_totals").clear();
    }

    // ========================================================================
    // Generic slot/section plumbing
    // ========================================================================

    fn begin_slot<T: Clone>(
        hub: &ChangeHub,
        slot: &RwLock<CacheEntry<T>>,
        key: ResourceKey,
        op: &'static str,
    ) -> Generation {
        let mut guard = write_guard(slot, SOURCE, op);
        let (next, generation) = guard.begin_fetch();
        let revision = next.revision();
        *guard = next;
        drop(guard);
        hub.publish(&key, revision);
        generation
    }

    #[allow(clippy::too_many_arguments)]
    fn commit_slot<T: Clone>(
        hub: &ChangeHub,
        slot: &RwLock<CacheEntry<T>>,
        key: ResourceKey,
        generation: Generation,
        result: Result<T, String>,
        keep_stale: bool,
        op: &'static str,
    ) -> CommitOutcome {
        let mut guard = write_guard(slot, SOURCE, op);
        if guard.issued() != generation {
            drop(guard);
            Self::note_superseded(key, generation);
            return CommitOutcome::Superseded;
        }
        let next = match result {
            Ok(data) => guard.commit_success(data, OffsetDateTime::now_utc()),
            Err(message) => guard.commit_error(message, keep_stale),
        };
        let revision = next.revision();
        *guard = next;
        drop(guard);
        hub.publish(&key, revision);
        CommitOutcome::Committed
    }

    fn invalidate_slot<T: Clone>(
        hub: &ChangeHub,
        slot: &RwLock<CacheEntry<T>>,
        key: ResourceKey,
        op: &'static str,
    ) {
        let mut guard = write_guard(slot, SOURCE, op);
        if let Some(next) = guard.invalidated() {
            let revision = next.revision();
            *guard = next;
            drop(guard);
            hub.publish(&key, revision);
        }
    }

    fn clear_slot<T: Clone>(
        hub: &ChangeHub,
        slot: &RwLock<CacheEntry<T>>,
        key: ResourceKey,
        op: &'static str,
    ) {
        let mut guard = write_guard(slot, SOURCE, op);
        if let Some(next) = guard.cleared() {
            let revision = next.revision();
            *guard = next;
            drop(guard);
            hub.publish(&key, revision);
        }
    }

    fn begin_section<K, T>(
        hub: &ChangeHub,
        section: &RwLock<LruCache<K, CacheEntry<T>>>,
        section_key: K,
        key: ResourceKey,
        op: &'static str,
    ) -> Generation
    where
        K: Eq + std::hash::Hash + Clone,
        T: Clone,
    {
        let mut guard = write_guard(section, SOURCE, op);
        if !guard.contains(&section_key) {
            if let Some((_evicted, _)) = guard.push(section_key.clone(), CacheEntry::idle()) {
                counter!(METRIC_EVICT).increment(1);
            }
        }
        let entry = guard
            .get_mut(&section_key)
            .unwrap_or_else(|| unreachable!("entry inserted above"));
        let (next, generation) = entry.begin_fetch();
        let revision = next.revision();
        *entry = next;
        drop(guard);
        hub.publish(&key, revision);
        generation
    }

    #[allow(clippy::too_many_arguments)]
    fn commit_section<K, T>(
        hub: &ChangeHub,
        section: &RwLock<LruCache<K, CacheEntry<T>>>,
        section_key: K,
        key: ResourceKey,
        generation: Generation,
        result: Result<T, String>,
        keep_stale: bool,
        op: &'static str,
    ) -> CommitOutcome
    where
        K: Eq + std::hash::Hash + Clone,
        T: Clone,
    {
        let mut guard = write_guard(section, SOURCE, op);
        // A `None` from the section means the entry was evicted while the
        // fetch was in flight; treated like a superseded generation.
        let committed_revision = match guard.get_mut(&section_key) {
            Some(entry) if entry.issued() == generation => {
                let next = match result {
                    Ok(data) => entry.commit_success(data, OffsetDateTime::now_utc()),
                    Err(message) => entry.commit_error(message, keep_stale),
                };
                let revision = next.revision();
                *entry = next;
                Some(revision)
            }
            _ => None,
        };
        drop(guard);
        match committed_revision {
            Some(revision) => {
                hub.publish(&key, revision);
                CommitOutcome::Committed
            }
            None => {
                Self::note_superseded(key, generation);
                CommitOutcome::Superseded
            }
        }
    }

    fn invalidate_section_key<K, T>(
        hub: &ChangeHub,
        section: &RwLock<LruCache<K, CacheEntry<T>>>,
        section_key: K,
        key: ResourceKey,
        op: &'static str,
    ) where
        K: Eq + std::hash::Hash + Clone,
        T: Clone,
    {
        let mut guard = write_guard(section, SOURCE, op);
        let Some(entry) = guard.get_mut(&section_key) else {
            return;
        };
        if let Some(next) = entry.invalidated() {
            let revision = next.revision();
            *entry = next;
            drop(guard);
            hub.publish(&key, revision);
        }
    }

    fn invalidate_section<K, T>(
        hub: &ChangeHub,
        section: &RwLock<LruCache<K, CacheEntry<T>>>,
        make_key: impl Fn(K) -> ResourceKey,
        op: &'static str,
    ) where
        K: Eq + std::hash::Hash + Clone,
        T: Clone,
    {
        let mut guard = write_guard(section, SOURCE, op);
        let mut notifications = Vec::new();
        for (section_key, entry) in guard.iter_mut() {
            if let Some(next) = entry.invalidated() {
                notifications.push((make_key(section_key.clone()), next.revision()));
                *entry = next;
            }
        }
        drop(guard);
        for (key, revision) in notifications {
            hub.publish(&key, revision);
        }
    }

    fn note_superseded(key: ResourceKey, generation: Generation) {
        counter!(METRIC_SUPERSEDED).increment(1);
        debug!(%key, generation, "Discarded superseded fetch result");
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::cache::entry::EntryStatus;

    use super::*;

    fn sample_item(sku: &str, qty: f64) -> InventoryItemRecord {
        InventoryItemRecord {
            sku: sku.to_string(),
            name: format!("Item {sku}"),
            category: "pantry".to_string(),
            unit: "kg".to_string(),
            available_qty: qty,
            reorder_point: 10.0,
            critical_point: 3.0,
            unit_cost: 1.5,
            updated_at: None,
        }
    }

    fn store() -> ResourceStore {
        ResourceStore::new(&CacheConfig::default(), Arc::new(ChangeHub::new()))
    }

    #[test]
    fn inventory_lifecycle_round_trip() {
        let store = store();
        assert_eq!(store.inventory().status(), EntryStatus::Idle);

        let generation = store.begin_inventory_fetch();
        assert_eq!(store.inventory().status(), EntryStatus::Loading);

        let outcome = store.commit_inventory(generation, Ok(vec![sample_item("TOM-001", 5.0)]), true);
        assert_eq!(outcome, CommitOutcome::Committed);

        let entry = store.inventory();
        assert_eq!(entry.status(), EntryStatus::Success);
        assert_eq!(entry.data().map(Vec::len), Some(1));
        assert!(entry.fetched_at().is_some());
    }

    #[test]
    fn stale_generation_is_discarded() {
        let store = store();

        let first = store.begin_inventory_fetch();
        let second = store.begin_inventory_fetch();

        // Newest generation commits first.
        assert_eq!(
            store.commit_inventory(second, Ok(vec![sample_item("NEW-001", 2.0)]), true),
            CommitOutcome::Committed
        );

        // The slow, older response must not overwrite it.
        assert_eq!(
            store.commit_inventory(first, Ok(vec![sample_item("OLD-001", 9.0)]), true),
            CommitOutcome::Superseded
        );

        let entry = store.inventory();
        assert_eq!(entry.data().map(|items| items[0].sku.clone()),
            Some("NEW-001".to_string())
        );
    }

    #[test]
    fn error_commit_keeps_stale_data_when_asked() {
        let store = store();

        let generation = store.begin_inventory_fetch();
        store.commit_inventory(generation, Ok(vec![sample_item("TOM-001", 5.0)]), true);

        let generation = store.begin_inventory_fetch();
        store.commit_inventory(generation, Err("connection refused".to_string()), true);

        let entry = store.inventory();
        assert_eq!(entry.status(), EntryStatus::Error);
        assert_eq!(entry.error(), Some("connection refused"));
        assert_eq!(entry.data().map(Vec::len), Some(1));
    }

    #[test]
    fn tag_invalidation_resets_inventory_and_restock() {
        let store = store();

        let generation = store.begin_inventory_fetch();
        store.commit_inventory(generation, Ok(vec![sample_item("TOM-001", 5.0)]), true);
        let generation = store.begin_restock_fetch();
        store.commit_restock(generation, Ok(Vec::new()), true);

        store.invalidate_tag(ResourceTag::Inventory);

        assert_eq!(store.inventory().status(), EntryStatus::Idle);
        assert_eq!(store.restock().status(), EntryStatus::Idle);
        // Stale data stays visible for stale-while-revalidate consumers.
        assert_eq!(store.inventory().data().map(Vec::len), Some(1));
    }

    #[test]
    fn tag_invalidation_covers_every_cached_window() {
        let store = store();
        let w1 = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 07)).expect("window");
        let w2 = DateWindow::new(date!(2026 - 03 - 08), date!(2026 - 03 - 14)).expect("window");

        for window in [w1, w2] {
            let generation = store.begin_orders_fetch(window);
            store.commit_orders(window, generation, Ok(Vec::new()), true);
            assert_eq!(store.orders(window).status(), EntryStatus::Success);
        }

        store.invalidate_tag(ResourceTag::Orders);

        assert_eq!(store.orders(w1).status(), EntryStatus::Idle);
        assert_eq!(store.orders(w2).status(), EntryStatus::Idle);
    }

    #[test]
    fn invalidate_twice_matches_invalidate_once() {
        let store = store();
        let generation = store.begin_inventory_fetch();
        store.commit_inventory(generation, Ok(vec![sample_item("TOM-001", 5.0)]), true);

        store.invalidate(ResourceKey::Inventory);
        let after_first = store.inventory();
        store.invalidate(ResourceKey::Inventory);
        let after_second = store.inventory();

        assert_eq!(after_first.status(), EntryStatus::Idle);
        assert_eq!(after_second.status(), EntryStatus::Idle);
        assert_eq!(after_first.revision(), after_second.revision());
    }

    #[test]
    fn unknown_window_snapshot_is_idle() {
        let store = store();
        let window = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 07)).expect("window");
        let entry = store.orders(window);
        assert_eq!(entry.status(), EntryStatus::Idle);
        assert!(entry.data().is_none());
    }

    #[test]
    fn clear_drops_stale_data() {
        let store = store();
        let generation = store.begin_inventory_fetch();
        store.commit_inventory(generation, Ok(vec![sample_item("TOM-001", 5.0)]), true);

        store.clear();

        let entry = store.inventory();
        assert_eq!(entry.status(), EntryStatus::Idle);
        assert!(entry.data().is_none());
    }

    #[test]
    fn commit_after_eviction_is_superseded() {
        let config = CacheConfig {
            orders_window_limit: 1,
            ..Default::default()
        };
        let store = ResourceStore::new(&config, Arc::new(ChangeHub::new()));

        let w1 = DateWindow::new(date!(2026 - 03 - 01), date!(2026 - 03 - 07)).expect("window");
        let w2 = DateWindow::new(date!(2026 - 03 - 08), date!(2026 - 03 - 14)).expect("window");

        let generation = store.begin_orders_fetch(w1);
        // Second window evicts the first from the capacity-1 section.
        let _ = store.begin_orders_fetch(w2);

        assert_eq!(
            store.commit_orders(w1, generation, Ok(Vec::new()), true),
            CommitOutcome::Superseded
        );
    }
}
