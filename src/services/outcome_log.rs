//! Non-blocking outcome log for score and leaderboard operations.
//!
//! Services push [`OutcomeRecord`]s with `try_send` and move on; a background task drains the
//! queue into `tracing`. A full or closed queue drops the record and bumps a counter, so
//! logging never delays or fails a request.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{info, warn};

/// Something worth reporting about a completed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeRecord {
    /// A submitted score replaced the stored high score.
    ScoreAccepted {
        namespace: String,
        player_id: String,
        previous: Option<f64>,
        score: f64,
    },
    /// A submitted score did not beat the stored high score.
    ScoreUnchanged {
        namespace: String,
        player_id: String,
        current: f64,
        submitted: f64,
    },
    /// A submission failed.
    ScoreRejected {
        namespace: String,
        player_id: String,
        score: f64,
        reason: String,
    },
    /// A player was removed from the global view.
    ScoreDeleted {
        namespace: String,
        player_id: String,
        removed: bool,
    },
    /// A read path answered with a degraded result instead of failing.
    QueryDegraded {
        operation: &'static str,
        namespace: String,
        reason: String,
    },
}

impl OutcomeRecord {
    fn emit(&self) {
        match self {
            OutcomeRecord::ScoreAccepted {
                namespace,
                player_id,
                previous,
                score,
            } => info!(%namespace, %player_id, ?previous, score, "high score accepted"),
            OutcomeRecord::ScoreUnchanged {
                namespace,
                player_id,
                current,
                submitted,
            } => info!(
                %namespace,
                %player_id,
                current,
                submitted,
                "score not above current high score"
            ),
            OutcomeRecord::ScoreRejected {
                namespace,
                player_id,
                score,
                reason,
            } => warn!(%namespace, %player_id, score, %reason, "score submission failed"),
            OutcomeRecord::ScoreDeleted {
                namespace,
                player_id,
                removed,
            } => info!(%namespace, %player_id, removed, "score removed from global view"),
            OutcomeRecord::QueryDegraded {
                operation,
                namespace,
                reason,
            } => warn!(%namespace, operation, %reason, "query answered with degraded result"),
        }
    }
}

/// Cloneable handle used by services to report outcomes.
#[derive(Clone, Debug)]
pub struct OutcomeSink {
    tx: mpsc::Sender<OutcomeRecord>,
    dropped: Arc<AtomicU64>,
}

impl OutcomeSink {
    /// Create a sink and the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutcomeRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (sink, rx)
    }

    /// Create a sink whose records are drained into `tracing` by a spawned task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(capacity: usize) -> (Self, JoinHandle<()>) {
        let (sink, mut rx) = Self::channel(capacity);
        let handle = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                record.emit();
            }
        });
        (sink, handle)
    }

    /// Queue a record without waiting.
    pub fn record(&self, record: OutcomeRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Records discarded because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deleted(player_id: &str) -> OutcomeRecord {
        OutcomeRecord::ScoreDeleted {
            namespace: "g".into(),
            player_id: player_id.into(),
            removed: true,
        }
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let (sink, mut rx) = OutcomeSink::channel(1);
        sink.record(deleted("p1"));
        sink.record(deleted("p2"));

        assert_eq!(sink.dropped(), 1);
        assert_eq!(rx.recv().await, Some(deleted("p1")));
    }

    #[tokio::test]
    async fn closed_queue_counts_drops() {
        let (sink, rx) = OutcomeSink::channel(4);
        drop(rx);
        sink.record(deleted("p1"));
        assert_eq!(sink.dropped(), 1);
    }

    #[tokio::test]
    async fn spawned_drain_consumes_records() {
        let (sink, handle) = OutcomeSink::spawn(8);
        sink.record(deleted("p1"));
        drop(sink);
        handle.await.unwrap();
    }
}
