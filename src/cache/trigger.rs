//! Cache trigger service.
//!
//! High-level API for publishing write events and optionally consuming them
//! immediately. Mutation paths call the convenience methods after the
//! server confirms the write.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::config::CacheConfig;
use super::consumer::CacheConsumer;
use super::events::{EventQueue, WriteKind};

/// Publishes write events and drives the consumer.
///
/// # Usage
///
/// ```ignore
/// // After a confirmed stock update:
/// trigger.stock_updated(&response.sku).await;
/// ```
pub struct CacheTrigger {
    config: CacheConfig,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(config: CacheConfig, queue: Arc<EventQueue>, consumer: Arc<CacheConsumer>) -> Self {
        Self {
            config,
            queue,
            consumer,
        }
    }

    /// Publish an event and optionally consume immediately.
    ///
    /// With `consume_now` the caller observes invalidated state as soon as
    /// this returns; otherwise events wait for the next explicit
    /// consumption.
    pub async fn trigger(&self, kind: WriteKind, consume_now: bool) {
        if !self.config.enabled {
            debug!(event_kind = ?kind, "Cache trigger skipped: cache disabled");
            return;
        }

        self.queue.publish(kind);

        if consume_now {
            self.consumer.consume().await;
        }
    }

    /// Trigger invalidation after a confirmed stock update.
    pub async fn stock_updated(&self, sku: &str) {
        self.trigger(
            WriteKind::StockUpdated {
                sku: sku.to_string(),
            },
            true,
        )
        .await;
    }

    /// Trigger invalidation after an order sync completes.
    pub async fn orders_synced(&self, imported: u32) {
        self.trigger(WriteKind::OrdersSynced { imported }, true).await;
    }

    /// Trigger invalidation after a recipe update.
    pub async fn recipe_updated(&self, recipe_id: Uuid) {
        self.trigger(WriteKind::RecipeUpdated { recipe_id }, true)
            .await;
    }

    /// Prime hot resources on application startup.
    pub async fn prime_on_startup(&self) {
        self.trigger(WriteKind::PrimeOnStartup, true).await;
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    pub fn consumer(&self) -> &Arc<CacheConsumer> {
        &self.consumer
    }
}
