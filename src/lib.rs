//! Comanda: client-side data layer for restaurant operations dashboards.
//!
//! The crate turns a restaurant backend (inventory, orders, sales, cookbook)
//! into typed, cached, subscription-friendly resources:
//!
//! - [`client`]: reqwest-backed API client with envelope unwrapping and the
//!   [`client::DataBackend`] seam for test fakes
//! - [`cache`]: resource store, single-flight deduplication, keyed change
//!   notifications, and the write-event invalidation pipeline
//! - [`sync`]: the [`sync::SyncEngine`] orchestrator with TTL-based freshness,
//!   generation-guarded commits, stale-while-revalidate, refresh leases
//! - [`view`]: pure filter/sort pipeline and CSV export
//! - [`prefs`]: small TOML-persisted operator preferences
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use comanda::cache::CacheConfig;
//! use comanda::client::ApiClient;
//! use comanda::sync::SyncEngine;
//!
//! # async fn demo() -> Result<(), comanda::client::ClientError> {
//! let client = ApiClient::new("https://pos.example.com", "trattoria-01", None)?;
//! let engine = SyncEngine::new(CacheConfig::default(), Arc::new(client));
//!
//! let inventory = engine.inventory().await;
//! println!("{} items", inventory.data.map_or(0, |items| items.len()));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod infra;
pub mod prefs;
pub mod sync;
pub mod view;
