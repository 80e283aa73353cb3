//! Per-player serialization of score submissions.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by player storage key. Entries exist only while a submission holds or
/// waits for them.
#[derive(Default)]
pub struct SubmissionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SubmissionLocks {
    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: String) -> SubmissionGuard<'_> {
        let lock = self.locks.entry(key.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        SubmissionGuard {
            owner: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no submission is in flight.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held for the whole read-compare-write sequence of one submission.
pub struct SubmissionGuard<'a> {
    owner: &'a SubmissionLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table still references the lock: nobody holds or awaits it.
        self.owner
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
