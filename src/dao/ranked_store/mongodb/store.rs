use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoMemberDocument, MongoValueDocument, ahead_of, member_filter, value_id},
};
use crate::dao::{models::RankedEntry, ranked_store::RankedStore, storage::StorageResult};

const VALUE_COLLECTION_NAME: &str = "values";
const MEMBER_COLLECTION_NAME: &str = "ranked_members";

/// MongoDB-backed [`RankedStore`]. Values and ranked set members live in two collections.
#[derive(Clone)]
pub struct MongoRankedStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: RwLock<Database>,
    config: MongoConfig,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (_client, database) = establish_connection(
            &self.config.options,
            &self.config.database_name,
            self.config.ping_retry,
        )
        .await?;
        *self.database.write().await = database;
        Ok(())
    }
}

impl MongoRankedStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name, config.ping_retry)
                .await?;

        let inner = Arc::new(MongoInner {
            database: RwLock::new(database),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let members = self.members().await;

        let unique_member = mongodb::IndexModel::builder()
            .keys(doc! { "set": 1, "member": 1 })
            .options(
                IndexOptions::builder()
                    .name(Some("set_member_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        members
            .create_index(unique_member)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MEMBER_COLLECTION_NAME,
                index: "set,member",
                source,
            })?;

        // Serves both top-N scans and rank counting.
        let by_score = mongodb::IndexModel::builder()
            .keys(doc! { "set": 1, "score": -1, "member": -1 })
            .options(
                IndexOptions::builder()
                    .name(Some("set_score_idx".to_owned()))
                    .build(),
            )
            .build();
        members
            .create_index(by_score)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: MEMBER_COLLECTION_NAME,
                index: "set,score,member",
                source,
            })?;

        Ok(())
    }

    async fn values(&self) -> Collection<MongoValueDocument> {
        let guard = self.inner.database.read().await;
        guard.collection::<MongoValueDocument>(VALUE_COLLECTION_NAME)
    }

    async fn members(&self) -> Collection<MongoMemberDocument> {
        let guard = self.inner.database.read().await;
        guard.collection::<MongoMemberDocument>(MEMBER_COLLECTION_NAME)
    }

    async fn get(&self, key: String) -> MongoResult<Option<String>> {
        let document = self
            .values()
            .await
            .find_one(value_id(&key))
            .await
            .map_err(|source| MongoDaoError::ReadValue { key, source })?;
        Ok(document.map(|document| document.value))
    }

    async fn put(&self, key: String, value: String) -> MongoResult<()> {
        let document = MongoValueDocument {
            key: key.clone(),
            value,
        };
        self.values()
            .await
            .replace_one(value_id(&key), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::WriteValue { key, source })?;
        Ok(())
    }

    async fn delete(&self, key: String) -> MongoResult<u64> {
        let result = self
            .values()
            .await
            .delete_one(value_id(&key))
            .await
            .map_err(|source| MongoDaoError::WriteValue { key, source })?;
        Ok(result.deleted_count)
    }

    async fn set_add(&self, set: String, member: String, score: f64) -> MongoResult<bool> {
        let result = self
            .members()
            .await
            .update_one(
                member_filter(&set, &member),
                doc! { "$set": { "score": score } },
            )
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::WriteMember {
                set,
                member,
                source,
            })?;
        Ok(result.upserted_id.is_some())
    }

    async fn set_add_if_greater(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> MongoResult<bool> {
        // `$max` only writes when the new value is greater, and upserts create the member.
        let result = self
            .members()
            .await
            .update_one(
                member_filter(&set, &member),
                doc! { "$max": { "score": score } },
            )
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::WriteMember {
                set,
                member,
                source,
            })?;
        Ok(result.upserted_id.is_some() || result.modified_count > 0)
    }

    async fn set_remove(&self, set: String, member: String) -> MongoResult<bool> {
        let result = self
            .members()
            .await
            .delete_one(member_filter(&set, &member))
            .await
            .map_err(|source| MongoDaoError::WriteMember {
                set,
                member,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_member(&self, set: &str, member: &str) -> MongoResult<Option<MongoMemberDocument>> {
        self.members()
            .await
            .find_one(member_filter(set, member))
            .await
            .map_err(|source| MongoDaoError::QuerySet {
                set: set.to_owned(),
                source,
            })
    }

    async fn set_score(&self, set: String, member: String) -> MongoResult<Option<f64>> {
        let document = self.find_member(&set, &member).await?;
        Ok(document.map(|document| document.score))
    }

    async fn set_rank(&self, set: String, member: String) -> MongoResult<Option<u64>> {
        let Some(document) = self.find_member(&set, &member).await? else {
            return Ok(None);
        };

        let ahead = self
            .members()
            .await
            .count_documents(ahead_of(&set, &member, document.score))
            .await
            .map_err(|source| MongoDaoError::QuerySet { set, source })?;
        Ok(Some(ahead))
    }

    async fn set_top(&self, set: String, count: usize) -> MongoResult<Vec<RankedEntry>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let documents: Vec<MongoMemberDocument> = self
            .members()
            .await
            .find(doc! { "set": set.as_str() })
            .sort(doc! { "score": -1, "member": -1 })
            .limit(limit)
            .await
            .map_err(|source| MongoDaoError::QuerySet {
                set: set.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::QuerySet { set, source })?;

        Ok(documents.into_iter().map(RankedEntry::from).collect())
    }
}

impl RankedStore for MongoRankedStore {
    fn get(&self, key: String) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let store = self.clone();
        Box::pin(async move { store.get(key).await.map_err(Into::into) })
    }

    fn put(&self, key: String, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.put(key, value).await.map_err(Into::into) })
    }

    fn delete(&self, key: String) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.delete(key).await.map_err(Into::into) })
    }

    fn set_add(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.set_add(set, member, score).await.map_err(Into::into) })
    }

    fn set_add_if_greater(
        &self,
        set: String,
        member: String,
        score: f64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .set_add_if_greater(set, member, score)
                .await
                .map_err(Into::into)
        })
    }

    fn set_remove(&self, set: String, member: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.set_remove(set, member).await.map_err(Into::into) })
    }

    fn set_score(
        &self,
        set: String,
        member: String,
    ) -> BoxFuture<'static, StorageResult<Option<f64>>> {
        let store = self.clone();
        Box::pin(async move { store.set_score(set, member).await.map_err(Into::into) })
    }

    fn set_rank(
        &self,
        set: String,
        member: String,
    ) -> BoxFuture<'static, StorageResult<Option<u64>>> {
        let store = self.clone();
        Box::pin(async move { store.set_rank(set, member).await.map_err(Into::into) })
    }

    fn set_top(
        &self,
        set: String,
        count: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<RankedEntry>>> {
        let store = self.clone();
        Box::pin(async move { store.set_top(set, count).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
