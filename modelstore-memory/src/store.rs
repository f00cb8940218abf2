//! In-memory collection backend.
//!
//! Documents are stored as BSON documents in nested HashMaps behind an
//! async-safe read-write lock, keyed by collection name and then by the
//! string identity under `_id`.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::Document;
use futures::{StreamExt, stream};
use mea::rwlock::RwLock;

use modelstore_core::{
    backend::{DocumentCollection, DocumentStream, StoreBackend, StoreBackendBuilder},
    error::{ModelStoreError, ModelStoreResult},
    query::{CountOptions, QueryOptions},
    record::ID_FIELD,
};

use crate::evaluator::{FilterEvaluator, compare_documents};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// `InMemoryBackend` is cloneable and uses an `Arc`-wrapped internal state,
/// so clones share the same underlying data across async tasks.
///
/// # Performance
///
/// Queries scan all documents in a collection (no indexing). For development
/// and test datasets this is acceptable; for larger deployments use the
/// MongoDB backend.
#[derive(Default, Clone, Debug)]
pub struct InMemoryBackend {
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self { store: Arc::new(RwLock::new(StoreMap::new())) }
    }

    /// Creates a builder for constructing an `InMemoryBackend`.
    pub fn builder() -> InMemoryBackendBuilder {
        InMemoryBackendBuilder::default()
    }
}

impl StoreBackend for InMemoryBackend {
    type Collection = MemoryCollection;

    fn collection(&self, name: &str) -> MemoryCollection {
        MemoryCollection {
            name: name.to_string(),
            store: Arc::clone(&self.store),
        }
    }
}

/// A handle on one in-memory collection.
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    name: String,
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryCollection {
    fn identity_of(document: &Document) -> ModelStoreResult<String> {
        document
            .get_str(ID_FIELD)
            .map(str::to_string)
            .map_err(|_| ModelStoreError::MissingIdentity)
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find_one(&self, filter: Document) -> ModelStoreResult<Option<Document>> {
        let store = self.store.read().await;
        Ok(store.get(&self.name).and_then(|collection| {
            collection
                .values()
                .find(|document| FilterEvaluator::matches(&filter, document))
                .cloned()
        }))
    }

    async fn find(
        &self,
        filter: Document,
        options: QueryOptions,
    ) -> ModelStoreResult<DocumentStream> {
        let mut matches: Vec<Document> = {
            let store = self.store.read().await;
            store
                .get(&self.name)
                .map(|collection| {
                    collection
                        .values()
                        .filter(|document| FilterEvaluator::matches(&filter, document))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(sort) = &options.sort {
            matches.sort_by(|a, b| compare_documents(a, b, sort));
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let limit = options.limit.map(|limit| limit as usize).unwrap_or(usize::MAX);

        Ok(stream::iter(
            matches
                .into_iter()
                .skip(skip)
                .take(limit)
                .map(Ok)
                .collect::<Vec<_>>(),
        )
        .boxed())
    }

    async fn count_documents(
        &self,
        filter: Document,
        options: CountOptions,
    ) -> ModelStoreResult<u64> {
        let store = self.store.read().await;
        let matching = store
            .get(&self.name)
            .map(|collection| {
                collection
                    .values()
                    .filter(|document| FilterEvaluator::matches(&filter, document))
                    .count() as u64
            })
            .unwrap_or(0);

        let after_skip = matching.saturating_sub(options.skip.unwrap_or(0));
        Ok(match options.limit {
            Some(limit) => after_skip.min(limit),
            None => after_skip,
        })
    }

    async fn insert_one(&self, document: Document) -> ModelStoreResult<()> {
        let id = Self::identity_of(&document)?;
        let mut store = self.store.write().await;
        store
            .entry(self.name.clone())
            .or_default()
            .insert(id, document);

        Ok(())
    }

    async fn insert_many(&self, documents: Vec<Document>) -> ModelStoreResult<()> {
        let mut store = self.store.write().await;
        let collection = store.entry(self.name.clone()).or_default();

        for document in documents {
            let id = Self::identity_of(&document)?;
            collection.insert(id, document);
        }

        Ok(())
    }

    async fn delete_one(&self, filter: Document) -> ModelStoreResult<()> {
        let mut store = self.store.write().await;
        if let Some(collection) = store.get_mut(&self.name) {
            let key = collection
                .iter()
                .find(|(_, document)| FilterEvaluator::matches(&filter, document))
                .map(|(key, _)| key.clone());

            if let Some(key) = key {
                collection.remove(&key);
            }
        }

        Ok(())
    }
}

/// Builder for constructing [`InMemoryBackend`] instances.
#[derive(Default)]
pub struct InMemoryBackendBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryBackendBuilder {
    type Backend = InMemoryBackend;

    /// Builds and returns a new [`InMemoryBackend`] instance.
    ///
    /// This always succeeds and returns a freshly initialized backend.
    async fn build(self) -> ModelStoreResult<Self::Backend> {
        Ok(InMemoryBackend::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use futures::TryStreamExt;

    use super::*;

    fn collection() -> MemoryCollection {
        InMemoryBackend::new().collection("persons")
    }

    #[tokio::test]
    async fn insert_is_create_or_replace_by_identity() {
        let persons = collection();
        persons.insert_one(doc! { ID_FIELD: "p1", "age": 22 }).await.unwrap();
        persons.insert_one(doc! { ID_FIELD: "p1", "age": 23 }).await.unwrap();

        let found = persons.find_one(doc! { ID_FIELD: "p1" }).await.unwrap().unwrap();
        assert_eq!(found.get_i32("age").unwrap(), 23);
        let total = persons
            .count_documents(doc! {}, CountOptions::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn insert_rejects_documents_without_identity() {
        let persons = collection();
        let result = persons.insert_one(doc! { "age": 22 }).await;
        assert!(matches!(result, Err(ModelStoreError::MissingIdentity)));
    }

    #[tokio::test]
    async fn find_applies_sort_skip_and_limit() {
        let persons = collection();
        persons
            .insert_many(vec![
                doc! { ID_FIELD: "p1", "age": 30 },
                doc! { ID_FIELD: "p2", "age": 20 },
                doc! { ID_FIELD: "p3", "age": 40 },
                doc! { ID_FIELD: "p4", "age": 10 },
            ])
            .await
            .unwrap();

        let options = QueryOptions {
            sort: Some(doc! { "age": 1 }),
            limit: Some(2),
            skip: Some(1),
        };
        let found: Vec<Document> = persons
            .find(doc! {}, options)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        let ages: Vec<i32> = found.iter().map(|d| d.get_i32("age").unwrap()).collect();
        assert_eq!(ages, vec![20, 30]);
    }

    #[tokio::test]
    async fn count_honors_skip_and_limit() {
        let persons = collection();
        persons
            .insert_many(vec![
                doc! { ID_FIELD: "p1", "age": 30 },
                doc! { ID_FIELD: "p2", "age": 20 },
                doc! { ID_FIELD: "p3", "age": 40 },
            ])
            .await
            .unwrap();

        let total = persons
            .count_documents(doc! { "age": { "$gte": 25 } }, CountOptions::default())
            .await
            .unwrap();
        assert_eq!(total, 2);

        let bounded = persons
            .count_documents(
                doc! {},
                CountOptions { limit: Some(2), skip: Some(2) },
            )
            .await
            .unwrap();
        assert_eq!(bounded, 1);
    }

    #[tokio::test]
    async fn delete_one_is_idempotent() {
        let persons = collection();
        persons.insert_one(doc! { ID_FIELD: "p1", "age": 22 }).await.unwrap();

        persons.delete_one(doc! { ID_FIELD: "p1" }).await.unwrap();
        assert!(persons.find_one(doc! { ID_FIELD: "p1" }).await.unwrap().is_none());
        // Deleting the same identity again is the same non-error outcome.
        persons.delete_one(doc! { ID_FIELD: "p1" }).await.unwrap();
        assert!(persons.find_one(doc! { ID_FIELD: "p1" }).await.unwrap().is_none());
    }
}
