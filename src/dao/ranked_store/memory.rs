//! Process-local [`RankedStore`] backed by concurrent maps.
//!
//! Every operation touches a single key, and each key is guarded by its `DashMap` shard lock, so
//! individual operations are atomic. Sorted sets keep a member index alongside an ordered index
//! that mirrors the ordering of a Redis `ZREVRANGE`: descending score, ties broken by descending
//! member id.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{models::RankedEntry, ranked_store::RankedStore, storage::StorageResult};

#[derive(Clone, Default)]
/// In-memory ranked store. Clones share the same data.
pub struct MemoryRankedStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    values: DashMap<String, String>,
    sets: DashMap<String, SortedSet>,
}

impl MemoryRankedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
struct IndexKey {
    score: f64,
    member: String,
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.member.cmp(&self.member))
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for IndexKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for IndexKey {}

#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, f64>,
    ordered: BTreeSet<IndexKey>,
}

impl SortedSet {
    fn insert(&mut self, member: String, score: f64) -> bool {
        let inserted = match self.scores.insert(member.clone(), score) {
            Some(previous) => {
                self.ordered.remove(&IndexKey {
                    score: previous,
                    member: member.clone(),
                });
                false
            }
            None => true,
        };
        self.ordered.insert(IndexKey { score, member });
        inserted
    }

    fn raise(&mut self, member: String, score: f64) -> bool {
        match self.scores.get(&member) {
            Some(&current) if current >= score => false,
            _ => {
                self.insert(member, score);
                true
            }
        }
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&IndexKey {
                    score,
                    member: member.to_owned(),
                });
                true
            }
            None => false,
        }
    }

    fn rank(&self, member: &str) -> Option<u64> {
        let score = *self.scores.get(member)?;
        let key = IndexKey {
            score,
            member: member.to_owned(),
        };
        Some(self.ordered.range(..key).count() as u64)
    }

    fn top(&self, count: usize) -> Vec<RankedEntry> {
        self.ordered
            .iter()
            .take(count)
            .map(|key| RankedEntry::new(key.member.clone(), key.score))
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl MemoryInner {
    fn set_remove(&self, set: &str, member: &str) -> bool {
        let (removed, empty) = match self.sets.get_mut(set) {
            Some(mut entry) => {
                let removed = entry.remove(member);
                (removed, entry.is_empty())
            }
            None => (false, false),
        };
        if empty {
            self.sets.remove_if(set, |_, entry| entry.is_empty());
        }
        removed
    }
}

impl RankedStore for MemoryRankedStore {
    fn get(&self, key: String) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.values.get(&key).map(|value| value.clone())) })
    }

    fn put(&self, key: String, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.values.insert(key, value);
            Ok(())
        })
    }

    fn delete(&self, key: String) -> BoxFuture<'static, StorageResult<u64>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(u64::from(inner.values.remove(&key).is_some())) })
    }

    fn set_add(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.sets.entry(set).or_default().insert(member, score)) })
    }

    fn set_add_if_greater(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.sets.entry(set).or_default().raise(member, score)) })
    }

    fn set_remove(&self, set: String, member: String) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.set_remove(&set, &member)) })
    }

    fn set_score(
        &self,
        set: String,
        member: String,
    ) -> BoxFuture<'static, StorageResult<Option<f64>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .sets
                .get(&set)
                .and_then(|entry| entry.scores.get(&member).copied()))
        })
    }

    fn set_rank(
        &self,
        set: String,
        member: String,
    ) -> BoxFuture<'static, StorageResult<Option<u64>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.sets.get(&set).and_then(|entry| entry.rank(&member))) })
    }

    fn set_top(
        &self,
        set: String,
        count: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<RankedEntry>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .sets
                .get(&set)
                .map(|entry| entry.top(count))
                .unwrap_or_default())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
