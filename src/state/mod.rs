pub mod submissions;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{
    config::AppConfig,
    dao::ranked_store::RankedStore,
    error::ServiceError,
    services::{
        buckets::{BucketCalendar, Clock},
        outcome_log::OutcomeSink,
    },
};

use self::submissions::SubmissionLocks;

pub type SharedState = Arc<AppState>;

/// Central application state: the ranked store handle plus everything derived from config.
pub struct AppState {
    ranked_store: RwLock<Option<Arc<dyn RankedStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
    calendar: BucketCalendar,
    outcomes: OutcomeSink,
    submissions: SubmissionLocks,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a ranked store is installed. Outcome
    /// records are drained by a task spawned on the current Tokio runtime.
    pub fn new(config: AppConfig) -> SharedState {
        let (outcomes, _drain) = OutcomeSink::spawn(config.outcome_queue_capacity);
        Self::with_parts(config, Clock::System, outcomes)
    }

    /// Construct a state with an explicit clock and outcome sink.
    pub fn with_parts(config: AppConfig, clock: Clock, outcomes: OutcomeSink) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let calendar = BucketCalendar::new(config.leaderboard.granularity, clock);
        Arc::new(Self {
            ranked_store: RwLock::new(None),
            degraded: degraded_tx,
            config,
            calendar,
            outcomes,
            submissions: SubmissionLocks::default(),
        })
    }

    /// Obtain a handle to the current ranked store, if one is installed.
    pub async fn ranked_store(&self) -> Option<Arc<dyn RankedStore>> {
        let guard = self.ranked_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the ranked store or fail with [`ServiceError::Degraded`].
    pub async fn require_ranked_store(&self) -> Result<Arc<dyn RankedStore>, ServiceError> {
        self.ranked_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new ranked store implementation and leave degraded mode.
    pub async fn install_ranked_store(&self, store: Arc<dyn RankedStore>) {
        {
            let mut guard = self.ranked_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current ranked store and enter degraded mode.
    pub async fn clear_ranked_store(&self) {
        {
            let mut guard = self.ranked_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Bucket naming for the time-bucketed views.
    pub fn calendar(&self) -> &BucketCalendar {
        &self.calendar
    }

    /// Outcome log handle.
    pub fn outcomes(&self) -> &OutcomeSink {
        &self.outcomes
    }

    /// Per-player submission locks.
    pub fn submissions(&self) -> &SubmissionLocks {
        &self.submissions
    }
}
