/// In-memory backend used for local runs and tests.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::{models::RankedEntry, storage::StorageResult};
use futures::future::BoxFuture;

/// Abstraction over a key-value store that also offers sorted sets ranked by descending score.
///
/// Lookups that find nothing resolve to `Ok(None)`; `Err` is reserved for backend failures.
pub trait RankedStore: Send + Sync {
    /// Read a plain value.
    fn get(&self, key: String) -> BoxFuture<'static, StorageResult<Option<String>>>;
    /// Store a plain value without expiry, replacing any previous one.
    fn put(&self, key: String, value: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Remove a plain value and return how many keys were removed.
    fn delete(&self, key: String) -> BoxFuture<'static, StorageResult<u64>>;
    /// Upsert `member` with `score`. Returns `true` when the member was newly inserted.
    fn set_add(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Atomically raise `member` to `score` unless it already holds a score at least as high.
    /// Returns `true` when the stored score changed.
    fn set_add_if_greater(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove `member` from the set. Returns `true` when it was present.
    fn set_remove(&self, set: String, member: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Score currently held by `member`.
    fn set_score(&self, set: String, member: String)
    -> BoxFuture<'static, StorageResult<Option<f64>>>;
    /// Zero-based position of `member` when the set is ordered by descending score.
    fn set_rank(&self, set: String, member: String)
    -> BoxFuture<'static, StorageResult<Option<u64>>>;
    /// Up to `count` entries, highest score first.
    fn set_top(&self, set: String, count: usize)
    -> BoxFuture<'static, StorageResult<Vec<RankedEntry>>>;
    /// Cheap round trip used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
