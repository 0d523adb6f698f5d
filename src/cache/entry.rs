//! Cache entry state machine.
//!
//! An entry moves `Idle → Loading → {Success, Error}`; `invalidate` and
//! `refetch` return it to `Idle`/`Loading`. Entries are immutable values:
//! every transition produces a replacement with a bumped revision, so
//! revision comparison is a reliable change-detection identity.

use time::{Duration, OffsetDateTime};

/// Monotonic per-key fetch counter. Only the newest issued generation may
/// commit its result.
pub type Generation = u64;

/// Monotonic per-key replacement counter used for change detection.
pub type Revision = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Idle => "idle",
            EntryStatus::Loading => "loading",
            EntryStatus::Success => "success",
            EntryStatus::Error => "error",
        }
    }
}

/// One cached result for a resource key.
///
/// Invariants: `Success` implies data present and no error; `Error` implies
/// an error message. Reading `data` in any state is safe; it is simply
/// `None` until the first successful fetch.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    data: Option<T>,
    status: EntryStatus,
    error: Option<String>,
    fetched_at: Option<OffsetDateTime>,
    issued: Generation,
    revision: Revision,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> CacheEntry<T> {
    /// Fresh entry: nothing fetched, nothing in flight.
    pub fn idle() -> Self {
        Self {
            data: None,
            status: EntryStatus::Idle,
            error: None,
            fetched_at: None,
            issued: 0,
            revision: 0,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.fetched_at
    }

    pub fn issued(&self) -> Generation {
        self.issued
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// A successful result younger than `ttl` counts as fresh and is served
    /// without refetching. The comparison is strict so a zero TTL disables
    /// caching entirely.
    pub fn is_fresh(&self, ttl: Duration, now: OffsetDateTime) -> bool {
        self.status == EntryStatus::Success
            && self
                .fetched_at
                .is_some_and(|fetched_at| now - fetched_at < ttl)
    }

    /// Take ownership of the cached data, leaving the bookkeeping intact.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T: Clone> CacheEntry<T> {
    /// Transition into `Loading` for a newly issued fetch.
    ///
    /// Previous data is carried along so stale-while-revalidate consumers
    /// keep rendering; the previous error is dropped because a retry is now
    /// in progress. Returns the replacement entry and the generation the
    /// caller must present at commit time.
    pub fn begin_fetch(&self) -> (Self, Generation) {
        let issued = self.issued + 1;
        let next = Self {
            data: self.data.clone(),
            status: EntryStatus::Loading,
            error: None,
            fetched_at: self.fetched_at,
            issued,
            revision: self.revision + 1,
        };
        (next, issued)
    }

    /// Commit a successful fetch.
    pub fn commit_success(&self, data: T, now: OffsetDateTime) -> Self {
        Self {
            data: Some(data),
            status: EntryStatus::Success,
            error: None,
            fetched_at: Some(now),
            issued: self.issued,
            revision: self.revision + 1,
        }
    }

    /// Commit a failed fetch. `keep_stale` retains the last good data so
    /// views can distinguish "error with fallback" from "error, nothing to
    /// show".
    pub fn commit_error(&self, message: impl Into<String>, keep_stale: bool) -> Self {
        Self {
            data: if keep_stale { self.data.clone() } else { None },
            status: EntryStatus::Error,
            error: Some(message.into()),
            fetched_at: self.fetched_at,
            issued: self.issued,
            revision: self.revision + 1,
        }
    }

    /// Force the entry back to `Idle` so the next read refetches.
    ///
    /// Data is retained for stale display; the status transition alone is
    /// what invalidation means. Returns `None` when the entry is already
    /// `Idle`: invalidation is idempotent and a second call must not churn
    /// revisions or wake subscribers.
    pub fn invalidated(&self) -> Option<Self> {
        if self.status == EntryStatus::Idle {
            return None;
        }
        Some(Self {
            data: self.data.clone(),
            status: EntryStatus::Idle,
            error: None,
            fetched_at: self.fetched_at,
            issued: self.issued,
            revision: self.revision + 1,
        })
    }

    /// Drop everything, including stale data. Used when the cached state
    /// must not survive (tenant switch, explicit reset). `None` when there
    /// is nothing to drop.
    pub fn cleared(&self) -> Option<Self> {
        if self.status == EntryStatus::Idle && self.data.is_none() {
            return None;
        }
        Some(Self {
            data: None,
            status: EntryStatus::Idle,
            error: None,
            fetched_at: None,
            issued: self.issued,
            revision: self.revision + 1,
        })
    }
}
