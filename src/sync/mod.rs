//! Fetch orchestration.
//!
//! [`SyncEngine`] is the composition root of the data layer: it owns the
//! resource store, the change hub, the in-flight tables, and the write-event
//! pipeline, and exposes one async operation per fetchable resource plus the
//! mutations. Views (or the CLI) talk to the engine and to nothing below it.

mod engine;
mod refresh;
mod view;

pub use engine::SyncEngine;
pub use refresh::RefreshLease;
pub use view::{CombinedView, ResourceView, ViewState};
