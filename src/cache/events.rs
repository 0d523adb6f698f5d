//! Write-event system.
//!
//! Mutations publish events here; the consumer drains them and keeps the
//! read cache consistent. The queue is bounded (a stuck consumer must not
//! grow memory without limit) and overflow is dropped loudly (warning plus
//! counter) rather than silently.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{counter, gauge};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::lock::lock_guard;

const SOURCE: &str = "cache::events";

const METRIC_QUEUE_LEN: &str = "comanda_cache_event_queue_len";
const METRIC_DROPPED: &str = "comanda_cache_event_dropped_total";

/// Monotonic epoch for ordering events within this process.
pub type Epoch = u64;

/// One write event with idempotency and ordering support.
#[derive(Debug, Clone)]
pub struct WriteEvent {
    /// Unique identifier for idempotency.
    pub id: Uuid,
    /// Monotonic epoch; higher epochs describe later writes.
    pub epoch: Epoch,
    /// What was written.
    pub kind: WriteKind,
    /// When the event was created.
    pub timestamp: OffsetDateTime,
}

impl WriteEvent {
    pub fn new(kind: WriteKind, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            kind,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Write operations that require cache invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteKind {
    /// A stock level was changed through `update-stock`.
    StockUpdated { sku: String },
    /// Orders were synced from the upstream point-of-sale.
    OrdersSynced { imported: u32 },
    /// A recipe was updated in the cookbook.
    RecipeUpdated { recipe_id: Uuid },
    /// Prime hot resources after startup.
    PrimeOnStartup,
}

/// Bounded in-memory write-event queue.
pub struct EventQueue {
    queue: Mutex<VecDeque<WriteEvent>>,
    epoch_counter: AtomicU64,
    limit: usize,
}

impl EventQueue {
    /// Create a queue holding at most `limit` pending events.
    pub fn new(limit: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
            limit: limit.max(1),
        }
    }

    /// Get the next epoch number.
    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Publish an event to the queue.
    ///
    /// Returns false when the queue is full and the event was dropped.
    pub fn publish(&self, kind: WriteKind) -> bool {
        let epoch = self.next_epoch();
        let event = WriteEvent::new(kind.clone(), epoch);

        let mut queue = lock_guard(&self.queue, SOURCE, "publish");
        if queue.len() >= self.limit {
            drop(queue);
            counter!(METRIC_DROPPED).increment(1);
            warn!(
                event_kind = ?kind,
                limit = self.limit,
                "Write event dropped: queue full"
            );
            return false;
        }

        info!(
            event_id = %event.id,
            event_epoch = event.epoch,
            event_kind = ?kind,
            "Write event enqueued"
        );
        queue.push_back(event);
        let len = queue.len();
        drop(queue);
        gauge!(METRIC_QUEUE_LEN).set(len as f64);
        true
    }

    /// Drain up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<WriteEvent> {
        let mut queue = lock_guard(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        let events: Vec<WriteEvent> = queue.drain(..count).collect();
        let len = queue.len();
        drop(queue);
        gauge!(METRIC_QUEUE_LEN).set(len as f64);
        events
    }

    /// Current queue length.
    pub fn len(&self) -> usize {
        lock_guard(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all pending events.
    pub fn clear(&self) {
        lock_guard(&self.queue, SOURCE, "clear").clear();
        gauge!(METRIC_QUEUE_LEN).set(0.0);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    #[test]
    fn epoch_monotonicity() {
        let queue = EventQueue::new(16);

        let e1 = queue.next_epoch();
        let e2 = queue.next_epoch();
        let e3 = queue.next_epoch();

        assert!(e1 < e2);
        assert!(e2 < e3);
    }

    #[test]
    fn publish_and_drain_fifo() {
        let queue = EventQueue::new(16);

        queue.publish(WriteKind::StockUpdated {
            sku: "TOM-001".to_string(),
        });
        queue.publish(WriteKind::OrdersSynced { imported: 4 });
        queue.publish(WriteKind::PrimeOnStartup);

        assert_eq!(queue.len(), 3);

        let events = queue.drain(2);
        assert_eq!(events.len(), 2);
        assert_eq!(queue.len(), 1);

        assert_eq!(
            events[0].kind,
            WriteKind::StockUpdated {
                sku: "TOM-001".to_string()
            }
        );
        assert_eq!(events[1].kind, WriteKind::OrdersSynced { imported: 4 });
    }

    #[test]
    fn overflow_drops_newest_event() {
        let queue = EventQueue::new(1);

        assert!(queue.publish(WriteKind::PrimeOnStartup));
        assert!(!queue.publish(WriteKind::OrdersSynced { imported: 1 }));
        assert_eq!(queue.len(), 1);

        let events = queue.drain(10);
        assert_eq!(events[0].kind, WriteKind::PrimeOnStartup);
    }

    #[test]
    fn drain_more_than_available() {
        let queue = EventQueue::new(16);
        queue.publish(WriteKind::PrimeOnStartup);

        let events = queue.drain(100);
        assert_eq!(events.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_queue() {
        let queue = EventQueue::new(16);
        queue.publish(WriteKind::PrimeOnStartup);
        queue.publish(WriteKind::OrdersSynced { imported: 2 });
        assert!(!queue.is_empty());

        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn event_queue_recovers_from_poisoned_lock() {
        let queue = EventQueue::new(16);

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = queue.queue.lock().expect("queue lock should be acquired");
            panic!("poison queue lock");
        }));

        queue.publish(WriteKind::PrimeOnStartup);
        assert_eq!(queue.len(), 1);
    }
}
