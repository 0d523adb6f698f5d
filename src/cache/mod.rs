//! Comanda Cache System
//!
//! Client-side resource cache for the restaurant operations backend:
//!
//! - **Resource store**: typed cache entries per fetchable resource, with
//!   singleton slots for list resources and LRU sections for parameterized
//!   queries (order windows, sales days)
//! - **Change hub**: per-key revision pub/sub so views re-render only when
//!   the resource they depend on changes
//! - **In-flight table**: single-flight deduplication of concurrent
//!   identical fetches
//! - **Write events**: mutations publish events that are merged into an
//!   invalidation plan and executed against the store
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `comanda.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! inventory_ttl_secs = 30
//! orders_ttl_secs = 60
//! # ... see config.rs for all options
//! ```

mod config;
mod consumer;
mod entry;
mod events;
mod hub;
mod inflight;
mod keys;
mod lock;
mod planner;
mod store;
mod trigger;

pub use config::CacheConfig;
pub use consumer::CacheConsumer;
pub use entry::{CacheEntry, EntryStatus, Generation, Revision};
pub use events::{Epoch, EventQueue, WriteEvent, WriteKind};
pub use hub::ChangeHub;
pub use inflight::{FlightError, InFlightTable};
pub use keys::{DateWindow, ResourceKey, ResourceTag};
pub use planner::InvalidationPlan;
pub use store::{CommitOutcome, ResourceStore};
pub use trigger::CacheTrigger;
