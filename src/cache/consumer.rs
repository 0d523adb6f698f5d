//! Write-event consumer.
//!
//! Drains the event queue, merges the batch into an [`InvalidationPlan`],
//! and executes it: invalidate affected tags first, then prime hot
//! resources through the backend so the next render finds fresh data.

use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use metrics::histogram;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::client::DataBackend;

use super::config::CacheConfig;
use super::events::EventQueue;
use super::planner::InvalidationPlan;
use super::store::ResourceStore;

const METRIC_CONSUME_MS: &str = "comanda_cache_consume_ms";
const METRIC_PRIME_MS: &str = "comanda_cache_prime_ms";

/// Consumer that keeps the read cache consistent with completed writes.
pub struct CacheConsumer {
    config: CacheConfig,
    store: Arc<ResourceStore>,
    queue: Arc<EventQueue>,
    backend: Option<Arc<dyn DataBackend>>,
    #[cfg(test)]
    prime_invocations: AtomicUsize,
}

impl CacheConsumer {
    /// Create a consumer with backend access for priming.
    pub fn new(
        config: CacheConfig,
        store: Arc<ResourceStore>,
        queue: Arc<EventQueue>,
        backend: Arc<dyn DataBackend>,
    ) -> Self {
        Self {
            config,
            store,
            queue,
            backend: Some(backend),
            #[cfg(test)]
            prime_invocations: AtomicUsize::new(0),
        }
    }

    /// Create a consumer without backend access (priming disabled).
    pub fn new_without_backend(
        config: CacheConfig,
        store: Arc<ResourceStore>,
        queue: Arc<EventQueue>,
    ) -> Self {
        Self {
            config,
            store,
            queue,
            backend: None,
            #[cfg(test)]
            prime_invocations: AtomicUsize::new(0),
        }
    }

    /// Consume pending events and execute the full plan.
    ///
    /// Returns true if any events were processed.
    #[instrument(skip(self))]
    pub async fn consume(&self) -> bool {
        self.consume_with_mode(true).await
    }

    /// Consume pending events, running only invalidation actions.
    ///
    /// Used on latency-sensitive write paths where priming is deferred.
    #[instrument(skip(self))]
    pub async fn consume_invalidate_only(&self) -> bool {
        self.consume_with_mode(false).await
    }

    async fn consume_with_mode(&self, include_prime: bool) -> bool {
        let consume_started_at = Instant::now();
        let events = self.queue.drain(self.config.consume_batch_limit);
        if events.is_empty() {
            return false;
        }

        let event_count = events.len();
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let plan = InvalidationPlan::from_events(events);

        info!(
            event_count,
            event_ids = ?event_ids,
            plan = %plan,
            include_prime,
            "Cache consumption starting"
        );

        for tag in &plan.invalidate_tags {
            self.store.invalidate_tag(*tag);
        }

        if include_prime && plan.has_prime_actions() {
            self.prime(&plan).await;
        }

        info!(
            event_count,
            invalidated = plan.invalidate_tags.len(),
            "Cache consumption complete"
        );

        histogram!(
            METRIC_CONSUME_MS,
            "mode" => if include_prime { "full" } else { "invalidate_only" }
        )
        .record(consume_started_at.elapsed().as_secs_f64() * 1000.0);

        true
    }

    /// Refetch hot resources so views find fresh data immediately.
    ///
    /// Skipped when no backend was wired in. A prime fetch failing commits
    /// its error like any other fetch; it must not leave an entry stuck in
    /// `Loading`.
    async fn prime(&self, plan: &InvalidationPlan) {
        let prime_started_at = Instant::now();
        #[cfg(test)]
        self.prime_invocations.fetch_add(1, Ordering::Relaxed);

        let Some(backend) = &self.backend else {
            debug!("Priming skipped: no backend access");
            histogram!(METRIC_PRIME_MS).record(prime_started_at.elapsed().as_secs_f64() * 1000.0);
            return;
        };
        let keep_stale = self.config.keep_stale_on_error;

        if plan.prime_inventory {
            let generation = self.store.begin_inventory_fetch();
            let result = backend
                .list_inventory()
                .await
                .map_err(|err| err.to_string());
            self.store.commit_inventory(generation, result, keep_stale);
            debug!("Primed: inventory");
        }

        if plan.prime_restock {
            let generation = self.store.begin_restock_fetch();
            let result = backend.list_restock().await.map_err(|err| err.to_string());
            self.store.commit_restock(generation, result, keep_stale);
            debug!("Primed: restock");
        }

        if plan.prime_recipes {
            let generation = self.store.begin_recipes_fetch();
            let result = backend.list_recipes().await.map_err(|err| err.to_string());
            self.store.commit_recipes(generation, result, keep_stale);
            debug!("Primed: recipes");
        }

        histogram!(METRIC_PRIME_MS).record(prime_started_at.elapsed().as_secs_f64() * 1000.0);
    }

    /// Get reference to the event queue.
    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    /// Get reference to the resource store.
    pub fn store(&self) -> &Arc<ResourceStore> {
        &self.store
    }

    #[cfg(test)]
    fn prime_invocation_count(&self) -> usize {
        self.prime_invocations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::entry::EntryStatus;
    use crate::cache::events::WriteKind;
    use crate::cache::hub::ChangeHub;
    use crate::domain::entities::InventoryItemRecord;

    use super::*;

    fn create_consumer() -> CacheConsumer {
        let config = CacheConfig::default();
        let hub = Arc::new(ChangeHub::new());
        let store = Arc::new(ResourceStore::new(&config, hub));
        let queue = Arc::new(EventQueue::new(config.event_queue_limit));

        CacheConsumer::new_without_backend(config, store, queue)
    }

    fn sample_item(sku: &str) -> InventoryItemRecord {
        InventoryItemRecord {
            sku: sku.to_string(),
            name: format!("Item {sku}"),
            category: "pantry".to_string(),
            unit: "kg".to_string(),
            available_qty: 5.0,
            reorder_point: 10.0,
            critical_point: 3.0,
            unit_cost: 1.0,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn consume_empty_queue_returns_false() {
        let consumer = create_consumer();
        assert!(!consumer.consume().await);
    }

    #[tokio::test]
    async fn consume_processes_events() {
        let consumer = create_consumer();

        consumer.queue.publish(WriteKind::OrdersSynced { imported: 1 });
        consumer.queue.publish(WriteKind::OrdersSynced { imported: 2 });

        assert_eq!(consumer.queue.len(), 2);
        assert!(consumer.consume().await);
        assert!(consumer.queue.is_empty());
    }

    #[tokio::test]
    async fn consume_respects_batch_limit() {
        let config = CacheConfig {
            consume_batch_limit: 2,
            ..Default::default()
        };
        let hub = Arc::new(ChangeHub::new());
        let store = Arc::new(ResourceStore::new(&config, hub));
        let queue = Arc::new(EventQueue::new(config.event_queue_limit));
        let consumer = CacheConsumer::new_without_backend(config, store, queue);

        for _ in 0..5 {
            consumer.queue.publish(WriteKind::OrdersSynced { imported: 1 });
        }

        assert_eq!(consumer.queue.len(), 5);
        consumer.consume().await;
        assert_eq!(consumer.queue.len(), 3);
    }

    #[tokio::test]
    async fn consume_invalidate_only_skips_prime_phase() {
        let consumer = create_consumer();

        consumer.queue.publish(WriteKind::PrimeOnStartup);
        assert!(consumer.consume_invalidate_only().await);
        assert_eq!(consumer.prime_invocation_count(), 0);

        consumer.queue.publish(WriteKind::PrimeOnStartup);
        assert!(consumer.consume().await);
        assert_eq!(consumer.prime_invocation_count(), 1);
    }

    #[tokio::test]
    async fn stock_event_invalidates_inventory_tag() {
        let consumer = create_consumer();

        let generation = consumer.store.begin_inventory_fetch();
        consumer
            .store
            .commit_inventory(generation, Ok(vec![sample_item("TOM-001")]), true);
        assert_eq!(consumer.store.inventory().status(), EntryStatus::Success);

        consumer.queue.publish(WriteKind::StockUpdated {
            sku: "TOM-001".to_string(),
        });
        consumer.consume().await;

        // Idle forces the next read to refetch.
        assert_eq!(consumer.store.inventory().status(), EntryStatus::Idle);
    }

    #[tokio::test]
    async fn orders_event_leaves_inventory_untouched() {
        let consumer = create_consumer();

        let generation = consumer.store.begin_inventory_fetch();
        consumer
            .store
            .commit_inventory(generation, Ok(vec![sample_item("TOM-001")]), true);

        consumer.queue.publish(WriteKind::OrdersSynced { imported: 3 });
        consumer.consume().await;

        assert_eq!(consumer.store.inventory().status(), EntryStatus::Success);
    }
}
