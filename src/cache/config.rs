//! Cache configuration.
//!
//! Controls freshness windows, LRU section sizes, and the write-event queue
//! via `comanda.toml`.

use std::num::NonZeroUsize;

use serde::Deserialize;
use time::Duration;

use super::keys::ResourceTag;

// Default values for cache configuration
const DEFAULT_INVENTORY_TTL_SECS: u64 = 30;
const DEFAULT_ORDERS_TTL_SECS: u64 = 60;
const DEFAULT_SALES_TTL_SECS: u64 = 300;
const DEFAULT_COOKBOOK_TTL_SECS: u64 = 3600;
const DEFAULT_ORDERS_WINDOW_LIMIT: usize = 32;
const DEFAULT_SALES_DAY_LIMIT: usize = 64;
const DEFAULT_SALES_TOTALS_LIMIT: usize = 16;
const DEFAULT_EVENT_QUEUE_LIMIT: usize = 256;
const DEFAULT_CONSUME_BATCH_LIMIT: usize = 100;

/// Cache configuration from `comanda.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; disabled means every read goes to the network.
    pub enabled: bool,
    /// Freshness window for the inventory and restock lists.
    pub inventory_ttl_secs: u64,
    /// Freshness window for order windows.
    pub orders_ttl_secs: u64,
    /// Freshness window for sales summaries.
    pub sales_ttl_secs: u64,
    /// Freshness window for the cookbook.
    pub cookbook_ttl_secs: u64,
    /// Keep the last good data visible when a refetch fails.
    pub keep_stale_on_error: bool,
    /// Maximum distinct order windows held in the LRU section.
    pub orders_window_limit: usize,
    /// Maximum distinct sales days held in the LRU section.
    pub sales_day_limit: usize,
    /// Maximum distinct sales-total windows held in the LRU section.
    pub sales_totals_limit: usize,
    /// Write-event queue capacity; events beyond it are dropped and counted.
    pub event_queue_limit: usize,
    /// Maximum events merged per consumption batch.
    pub consume_batch_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            inventory_ttl_secs: DEFAULT_INVENTORY_TTL_SECS,
            orders_ttl_secs: DEFAULT_ORDERS_TTL_SECS,
            sales_ttl_secs: DEFAULT_SALES_TTL_SECS,
            cookbook_ttl_secs: DEFAULT_COOKBOOK_TTL_SECS,
            keep_stale_on_error: true,
            orders_window_limit: DEFAULT_ORDERS_WINDOW_LIMIT,
            sales_day_limit: DEFAULT_SALES_DAY_LIMIT,
            sales_totals_limit: DEFAULT_SALES_TOTALS_LIMIT,
            event_queue_limit: DEFAULT_EVENT_QUEUE_LIMIT,
            consume_batch_limit: DEFAULT_CONSUME_BATCH_LIMIT,
        }
    }
}

impl CacheConfig {
    /// Freshness window for every key under a tag.
    ///
    /// One uniform TTL per resource class; the alternative (per-call
    /// policies) makes staleness unpredictable across views.
    pub fn ttl_for(&self, tag: ResourceTag) -> Duration {
        let secs = match tag {
            ResourceTag::Inventory => self.inventory_ttl_secs,
            ResourceTag::Orders => self.orders_ttl_secs,
            ResourceTag::Sales => self.sales_ttl_secs,
            ResourceTag::Cookbook => self.cookbook_ttl_secs,
        };
        Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Orders section capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn orders_window_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.orders_window_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Sales-day section capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn sales_day_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.sales_day_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Sales-totals section capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn sales_totals_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.sales_totals_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
