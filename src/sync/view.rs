//! View-facing read models.
//!
//! A [`ResourceView`] is a value snapshot of one cache entry (no locks, no
//! references into the store) so rendering code can hold it as long as it
//! likes. [`CombinedView`] folds several views into the single loading/error
//! state a composite screen renders.

use time::OffsetDateTime;

use crate::cache::{CacheEntry, EntryStatus, Revision};

/// Snapshot of one resource for rendering.
#[derive(Debug, Clone)]
pub struct ResourceView<T> {
    pub data: Option<T>,
    pub status: EntryStatus,
    pub error: Option<String>,
    pub fetched_at: Option<OffsetDateTime>,
    pub revision: Revision,
}

impl<T> ResourceView<T> {
    pub(crate) fn from_entry(entry: CacheEntry<T>) -> Self {
        let status = entry.status();
        let error = entry.error().map(str::to_string);
        let fetched_at = entry.fetched_at();
        let revision = entry.revision();
        Self {
            data: entry.into_data(),
            status,
            error,
            fetched_at,
            revision,
        }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// Anything that can report a loading flag and an error for aggregation.
pub trait ViewState {
    fn is_loading(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

impl<T> ViewState for ResourceView<T> {
    /// Loading covers both an in-flight fetch and a never-fetched entry: a
    /// screen must not flash "no data" before the first resolution.
    fn is_loading(&self) -> bool {
        match self.status {
            EntryStatus::Loading => true,
            EntryStatus::Idle => self.data.is_none(),
            EntryStatus::Success | EntryStatus::Error => false,
        }
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Unified state for a screen depending on several resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedView {
    /// True while any child is still loading.
    pub loading: bool,
    /// First error among the children, in declaration order.
    pub error: Option<String>,
}

impl CombinedView {
    pub fn of(parts: &[&dyn ViewState]) -> Self {
        Self {
            loading: parts.iter().any(|part| part.is_loading()),
            error: parts
                .iter()
                .find_map(|part| part.error_message().map(str::to_string)),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(status: EntryStatus, data: Option<u32>, error: Option<&str>) -> ResourceView<u32> {
        ResourceView {
            data,
            status,
            error: error.map(str::to_string),
            fetched_at: None,
            revision: 0,
        }
    }

    #[test]
    fn loading_is_or_of_children() {
        let ready = view(EntryStatus::Success, Some(1), None);
        let pending = view(EntryStatus::Loading, None, None);

        let combined = CombinedView::of(&[&ready, &pending]);
        assert!(combined.loading);
        assert!(combined.error.is_none());
    }

    #[test]
    fn first_error_wins() {
        let first = view(EntryStatus::Error, None, Some("inventory unreachable"));
        let second = view(EntryStatus::Error, None, Some("orders unreachable"));

        let combined = CombinedView::of(&[&first, &second]);
        assert_eq!(combined.error.as_deref(), Some("inventory unreachable"));
        assert!(!combined.loading);
    }

    #[test]
    fn never_fetched_counts_as_loading() {
        let idle = view(EntryStatus::Idle, None, None);
        assert!(idle.is_loading());

        // Invalidated-with-stale-data does not: the screen can keep rendering.
        let stale = view(EntryStatus::Idle, Some(3), None);
        assert!(!stale.is_loading());
    }

    #[test]
    fn all_ready_is_ready() {
        let a = view(EntryStatus::Success, Some(1), None);
        let b = view(EntryStatus::Success, Some(2), None);
        assert!(CombinedView::of(&[&a, &b]).is_ready());
    }

    #[test]
    fn error_state_is_distinct_from_empty_success() {
        // "couldn't load items" and "no items" must never collapse into one.
        let empty_success: ResourceView<Vec<u32>> = ResourceView {
            data: Some(Vec::new()),
            status: EntryStatus::Success,
            error: None,
            fetched_at: None,
            revision: 1,
        };
        let failed: ResourceView<Vec<u32>> = ResourceView {
            data: None,
            status: EntryStatus::Error,
            error: Some("boom".to_string()),
            fetched_at: None,
            revision: 1,
        };

        assert!(!empty_success.is_loading());
        assert!(empty_success.error_message().is_none());
        assert!(failed.error_message().is_some());
        assert_ne!(empty_success.status, failed.status);
    }
}
