//! Derived list views.
//!
//! Pure transforms applied after the cache hands data to a view: filtering,
//! stable sorting, stock classification, and CSV export. Nothing here
//! fetches or mutates shared state.

pub mod export;
pub mod filter;

pub use export::{ExportError, export_inventory_csv, export_orders_csv, export_restock_csv};
pub use filter::{FilterSpec, SortKey, filter_inventory, filter_orders, filter_restock};
