#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use leaderboard_back::{
    config::AppConfig,
    dao::{
        models::{PlayerProfile, RankedEntry},
        ranked_store::{RankedStore, memory::MemoryRankedStore},
        storage::{StorageError, StorageResult},
    },
    services::{
        buckets::Clock,
        outcome_log::{OutcomeRecord, OutcomeSink},
        player_service,
    },
    state::{AppState, SharedState},
};
use time::{Date, Month};
use tokio::sync::mpsc;

pub const NS: &str = "tetris";

/// A single store call the [`FlakyStore`] should fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    Put,
    AddIfGreater { set: String },
    Score { member: String },
    Rank,
    Top,
}

/// Memory store wrapper that fails the calls matching its configured faults.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryRankedStore,
    faults: Arc<Mutex<Vec<Fault>>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fault: Fault) {
        self.faults.lock().unwrap().push(fault);
    }

    pub fn heal(&self) {
        self.faults.lock().unwrap().clear();
    }

    pub fn memory(&self) -> &MemoryRankedStore {
        &self.inner
    }

    fn check(&self, fault: Fault) -> StorageResult<()> {
        if self.faults.lock().unwrap().contains(&fault) {
            return Err(StorageError::unavailable(
                format!("injected {fault:?}"),
                std::io::Error::other("injected failure"),
            ));
        }
        Ok(())
    }

    fn guarded<T: Send + 'static>(
        &self,
        fault: Fault,
        call: BoxFuture<'static, StorageResult<T>>,
    ) -> BoxFuture<'static, StorageResult<T>> {
        match self.check(fault) {
            Ok(()) => call,
            Err(err) => Box::pin(async move { Err(err) }),
        }
    }
}

impl RankedStore for FlakyStore {
    fn get(&self, key: String) -> BoxFuture<'static, StorageResult<Option<String>>> {
        self.inner.get(key)
    }

    fn put(&self, key: String, value: String) -> BoxFuture<'static, StorageResult<()>> {
        self.guarded(Fault::Put, self.inner.put(key, value))
    }

    fn delete(&self, key: String) -> BoxFuture<'static, StorageResult<u64>> {
        self.inner.delete(key)
    }

    fn set_add(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.set_add(set, member, score)
    }

    fn set_add_if_greater(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let fault = Fault::AddIfGreater { set: set.clone() };
        self.guarded(fault, self.inner.set_add_if_greater(set, member, score))
    }

    fn set_remove(&self, set: String, member: String) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.set_remove(set, member)
    }

    fn set_score(
        &self,
        set: String,
        member: String,
    ) -> BoxFuture<'static, StorageResult<Option<f64>>> {
        let fault = Fault::Score {
            member: member.clone(),
        };
        self.guarded(fault, self.inner.set_score(set, member))
    }

    fn set_rank(&self, set: String, member: String) -> BoxFuture<'static, StorageResult<Option<u64>>> {
        self.guarded(Fault::Rank, self.inner.set_rank(set, member))
    }

    fn set_top(
        &self,
        set: String,
        count: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<RankedEntry>>> {
        self.guarded(Fault::Top, self.inner.set_top(set, count))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.health_check()
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.try_reconnect()
    }
}

/// Reference date used by tests that pin the clock.
pub fn today() -> Date {
    Date::from_calendar_date(2026, Month::October, 16).unwrap()
}

/// State over `store` with a pinned clock, plus the receiving end of its outcome log.
pub async fn state_on(
    store: Arc<dyn RankedStore>,
    config: AppConfig,
    clock: Clock,
) -> (SharedState, mpsc::Receiver<OutcomeRecord>) {
    let (outcomes, rx) = OutcomeSink::channel(256);
    let state = AppState::with_parts(config, clock, outcomes);
    state.install_ranked_store(store).await;
    (state, rx)
}

/// State over a fresh memory store.
pub async fn memory_state() -> SharedState {
    let store: Arc<dyn RankedStore> = Arc::new(MemoryRankedStore::new());
    state_on(store, AppConfig::default(), Clock::Fixed(today()))
        .await
        .0
}

pub async fn register(state: &SharedState, player_id: &str) {
    player_service::store_player_data(state, NS, PlayerProfile::new(player_id))
        .await
        .unwrap();
}

/// Drain every record currently queued.
pub fn drain(rx: &mut mpsc::Receiver<OutcomeRecord>) -> Vec<OutcomeRecord> {
    let mut records = Vec::new();
    while let Ok(record) = rx.try_recv() {
        records.push(record);
    }
    records
}
