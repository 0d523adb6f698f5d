//! Keyed revision pub/sub.
//!
//! Each resource key gets its own watch channel carrying the entry's latest
//! revision. Views subscribe to exactly the keys they read, so a commit to
//! one key never wakes subscribers of another. Dropping the receiver is the
//! unsubscription; there is nothing to deregister and nothing dangling
//! after teardown.

use dashmap::DashMap;
use tokio::sync::watch;

use super::entry::Revision;
use super::keys::ResourceKey;

/// Per-key change notification fan-out.
#[derive(Default)]
pub struct ChangeHub {
    topics: DashMap<ResourceKey, watch::Sender<Revision>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    /// Subscribe to one key's revision stream.
    ///
    /// The receiver immediately holds the last published revision (0 when
    /// nothing was published yet); `changed().await` wakes on the next
    /// commit or invalidation of that key.
    pub fn subscribe(&self, key: ResourceKey) -> watch::Receiver<Revision> {
        self.topics
            .entry(key)
            .or_insert_with(|| watch::channel(0).0)
            .subscribe()
    }

    /// Publish a new revision for a key.
    ///
    /// Synchronous: subscribers observe the value as soon as this returns.
    /// Publishing to a key nobody ever subscribed to, or whose receivers
    /// were all dropped, is a no-op by design.
    pub fn publish(&self, key: &ResourceKey, revision: Revision) {
        if let Some(sender) = self.topics.get(key) {
            sender.send_replace(revision);
        }
    }

    /// Number of keys with a live topic (subscribed at least once).
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}
