//! Directory listing mediation: request deduplication, in-flight sharing,
//! and short-lived retention.
//!
//! Queries are keyed by `(path, refresh_key)`. At most one backend fetch
//! runs per key; late callers for the same key attach to the in-flight fetch
//! instead of issuing another. Settled successes are retained for a short
//! TTL so a resize-driven re-render doesn't hit the disk twice; this is a
//! dedup layer, not a persistent cache. Stale-result suppression ("last
//! navigate wins") happens at the application point in
//! [`crate::browser::FileBrowser::load_pane`], which re-checks the pane's
//! live key after the fetch resolves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task;

use crate::error::ServiceError;
use crate::fs::service::{DirectoryContents, DirectoryService};

/// Cache key: the pane's path plus its refresh generation.
pub type QueryKey = (String, u64);

/// Shared fetch outcome. An `Arc` so every attached caller gets the same
/// allocation, including errors (which are not `Clone`).
pub type QueryOutcome = Arc<Result<DirectoryContents, ServiceError>>;

enum Slot {
    /// A fetch is running; attach by subscribing to the sender.
    InFlight(broadcast::Sender<QueryOutcome>),
    /// A successful fetch settled at `at`; served until the TTL lapses.
    Ready { outcome: QueryOutcome, at: Instant },
}

/// Deduplicating front for [`DirectoryService::list_directory`].
pub struct DirectoryQueryCache {
    service: Arc<dyn DirectoryService>,
    slots: Mutex<HashMap<QueryKey, Slot>>,
    ttl: Duration,
}

impl DirectoryQueryCache {
    pub fn new(service: Arc<dyn DirectoryService>, ttl: Duration) -> Self {
        Self {
            service,
            slots: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch the listing for `path` under refresh generation `refresh_key`.
    ///
    /// Returns the retained result when the key settled within the TTL,
    /// attaches to an in-flight fetch for the same key, or performs the
    /// fetch itself (off-thread, via `spawn_blocking`).
    pub async fn query(&self, path: &str, refresh_key: u64) -> QueryOutcome {
        let key = (path.to_string(), refresh_key);

        enum Plan {
            Serve(QueryOutcome),
            Attach(broadcast::Receiver<QueryOutcome>),
            Fetch,
        }

        let plan = {
            let mut slots = self.slots.lock().expect("query cache lock poisoned");
            match slots.get(&key) {
                Some(Slot::Ready { outcome, at }) if at.elapsed() <= self.ttl => {
                    Plan::Serve(outcome.clone())
                }
                Some(Slot::InFlight(tx)) => Plan::Attach(tx.subscribe()),
                _ => {
                    let (tx, _) = broadcast::channel(1);
                    slots.insert(key.clone(), Slot::InFlight(tx));
                    Plan::Fetch
                }
            }
        };

        match plan {
            Plan::Serve(outcome) => outcome,
            Plan::Attach(mut rx) => rx.recv().await.unwrap_or_else(|_| {
                // The slot was invalidated while we waited.
                Arc::new(Err(ServiceError::Superseded(key.0)))
            }),
            Plan::Fetch => self.fetch(key).await,
        }
    }

    async fn fetch(&self, key: QueryKey) -> QueryOutcome {
        let service = self.service.clone();
        let path = key.0.clone();
        let joined = task::spawn_blocking(move || service.list_directory(&path)).await;
        let outcome: QueryOutcome = Arc::new(match joined {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Superseded(key.0.clone())),
        });

        let mut slots = self.slots.lock().expect("query cache lock poisoned");
        // If the slot vanished the key was invalidated mid-fetch; the result
        // is delivered to our own caller only and nothing is retained.
        if let Some(Slot::InFlight(tx)) = slots.remove(&key) {
            let _ = tx.send(outcome.clone());
            // Only successes are retained.
            if outcome.is_ok() {
                slots.insert(
                    key,
                    Slot::Ready {
                        outcome: outcome.clone(),
                        at: Instant::now(),
                    },
                );
            }
        }
        outcome
    }

    /// Drop every entry for `path`, attached waiters included. Called when a
    /// pane showing `path` is torn down so nothing is served across a
    /// teardown/recreate.
    pub fn invalidate(&self, path: &str) {
        self.slots
            .lock()
            .expect("query cache lock poisoned")
            .retain(|key, _| key.0 != path);
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.slots
            .lock()
            .expect("query cache lock poisoned")
            .clear();
    }

    /// Number of live slots (settled and in-flight), for diagnostics.
    pub fn len(&self) -> usize {
        self.slots.lock().expect("query cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
