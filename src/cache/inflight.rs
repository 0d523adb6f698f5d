//! Single-flight request deduplication.
//!
//! Concurrent fetches for the same key collapse into one execution: the
//! first caller becomes the leader and runs the future; everyone else joins
//! the leader's watch channel and receives the same outcome, success or
//! failure. The slot is removed when the flight settles (a drop guard keeps
//! that true even if the leader's task is cancelled), so a later call starts
//! a fresh flight instead of observing a stale rejection.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::watch;

/// Terminal failure of an in-flight fetch, cloneable so one rejection can
/// fan out to every joined caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlightError {
    #[error("{0}")]
    Failed(String),
    #[error("in-flight request was abandoned before completing")]
    Abandoned,
}

impl FlightError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

type FlightOutcome<T> = Result<T, FlightError>;
type FlightSlot<T> = watch::Sender<Option<FlightOutcome<T>>>;

/// Deduplication table for one resource family.
pub struct InFlightTable<K, T>
where
    K: Eq + Hash + Clone,
{
    flights: Arc<DashMap<K, FlightSlot<T>>>,
}

impl<K, T> Default for InFlightTable<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> InFlightTable<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    pub fn new() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
        }
    }

    /// Run `fut` unless an identical fetch is already in flight, in which
    /// case await that flight's outcome instead.
    ///
    /// For N concurrent callers with one key the future executes exactly
    /// once; all N observe the same resolution or the same rejection.
    pub async fn fetch_or_join<F>(&self, key: K, fut: F) -> FlightOutcome<T>
    where
        F: Future<Output = FlightOutcome<T>>,
    {
        let (tx, _keepalive) = watch::channel(None);
        let slot = match self.flights.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => {
                let rx = occupied.get().subscribe();
                drop(occupied);
                return Self::await_outcome(rx).await;
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(tx.clone());
                tx
            }
        };

        // Removal must survive cancellation of the leader, otherwise joiners
        // would hang on a slot nobody will ever settle.
        let _guard = FlightGuard {
            key,
            flights: Arc::clone(&self.flights),
        };

        let outcome = fut.await;
        let _ = slot.send(Some(outcome.clone()));
        outcome
    }

    /// Number of flights currently in progress.
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    async fn await_outcome(mut rx: watch::Receiver<Option<FlightOutcome<T>>>) -> FlightOutcome<T> {
        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return outcome;
            }
            if rx.changed().await.is_err() {
                // Leader dropped without publishing; check for a value that
                // raced with the drop before giving up.
                return match rx.borrow().clone() {
                    Some(outcome) => outcome,
                    None => Err(FlightError::Abandoned),
                };
            }
        }
    }
}

struct FlightGuard<K, T>
where
    K: Eq + Hash + Clone,
{
    key: K,
    flights: Arc<DashMap<K, FlightSlot<T>>>,
}

impl<K, T> Drop for FlightGuard<K, T>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        self.flights.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Barrier;

    use super::*;

    #[tokio::test]
    async fn concurrent_callers_share_one_execution() {
        let table = Arc::new(InFlightTable::<&'static str, u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let table = Arc::clone(&table);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                table
                    .fetch_or_join("inventory", async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok(99)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.expect("task"), Ok(99));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn rejection_fans_out_and_slot_clears() {
        let table = Arc::new(InFlightTable::<&'static str, u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let leader = {
            let table = Arc::clone(&table);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                table
                    .fetch_or_join("orders", async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Err(FlightError::failed("connection refused"))
                    })
                    .await
            })
        };

        let outcome = leader.await.expect("task");
        assert_eq!(outcome, Err(FlightError::failed("connection refused")));

        // The failed flight is gone; a retry issues a fresh execution.
        let retry = table
            .fetch_or_join("orders", async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(retry, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn different_keys_do_not_join() {
        let table = InFlightTable::<&'static str, u32>::new();
        let first = table.fetch_or_join("a", async { Ok(1) }).await;
        let second = table.fetch_or_join("b", async { Ok(2) }).await;
        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(2));
    }

    #[tokio::test]
    async fn abandoned_leader_unblocks_joiners() {
        let table = Arc::new(InFlightTable::<&'static str, u32>::new());

        let leader = {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                table
                    .fetch_or_join("slow", async {
                        std::future::pending::<()>().await;
                        unreachable!()
                    })
                    .await
            })
        };
        // Let the leader claim the slot before joining.
        tokio::task::yield_now().await;
        assert_eq!(table.len(), 1);

        let joiner = {
            let table = Arc::clone(&table);
            tokio::spawn(async move { table.fetch_or_join("slow", async { Ok(1) }).await })
        };
        tokio::task::yield_now().await;

        leader.abort();
        let outcome = joiner.await.expect("joiner survives leader abort");
        assert_eq!(outcome, Err(FlightError::Abandoned));
        assert!(table.is_empty());
    }
}
