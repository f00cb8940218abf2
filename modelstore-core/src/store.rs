//! Storage facade orchestrating the codecs, the predicate compiler, and the
//! query translator against a collection backend.
//!
//! [`ModelStore`] is the main entry point: it resolves entity schemas from
//! an immutable [`Model`], builds native query parameters, and marshals
//! whole records per document. It holds no mutable state of its own; write
//! atomicity, retries, and cancellation belong to the backend.
//!
//! # Example
//!
//! ```ignore
//! use modelstore_core::store::ModelStore;
//!
//! let store = ModelStore::new(backend, model);
//! let person = store.fetch_by_id("Person", &"p1".into()).await?;
//! ```

use std::collections::HashMap;

use bson::{doc, Document};
use futures::{StreamExt, TryStreamExt, stream::BoxStream};

use crate::{
    backend::{DocumentCollection, StoreBackend},
    error::{ModelStoreError, ModelStoreResult},
    query::{CountOptions, FetchRequest, QueryOptions},
    record::{ID_FIELD, ModelData},
    schema::{EntityDescription, Model},
    value::ObjectID,
};

/// A lazy, finite, non-restartable stream of decoded records.
///
/// Decode failure of any element terminates the stream with that error.
pub type RecordStream = BoxStream<'static, ModelStoreResult<ModelData>>;

/// A model store bound to a backend and an immutable entity model.
#[derive(Debug)]
pub struct ModelStore<B: StoreBackend> {
    backend: B,
    model: Model,
}

impl<B: StoreBackend> ModelStore<B> {
    /// Creates a store over the given backend and model.
    pub fn new(backend: B, model: Model) -> Self {
        Self { backend, model }
    }

    /// Returns the entity model this store resolves schemas from.
    pub fn model(&self) -> &Model {
        &self.model
    }

    fn entity(&self, name: &str) -> ModelStoreResult<&EntityDescription> {
        self.model
            .entity(name)
            .ok_or_else(|| ModelStoreError::UnknownEntity(name.to_string()))
    }

    fn collection(&self, entity: &EntityDescription) -> B::Collection {
        self.backend.collection(&entity.collection_name())
    }

    fn filter(request: &FetchRequest) -> ModelStoreResult<Document> {
        match &request.predicate {
            Some(predicate) => predicate
                .to_filter()
                .ok_or(ModelStoreError::UnsupportedPredicate),
            None => Ok(Document::new()),
        }
    }

    fn identity_filter(id: &ObjectID) -> Document {
        doc! { ID_FIELD: id.as_str() }
    }

    /// Fetches a single record by identity.
    ///
    /// Zero matches is `None`, not an error; a matching document that fails
    /// to decode is an error. The two are never conflated.
    pub async fn fetch_by_id(
        &self,
        entity: &str,
        id: &ObjectID,
    ) -> ModelStoreResult<Option<ModelData>> {
        let entity = self.entity(entity)?;
        match self
            .collection(entity)
            .find_one(Self::identity_filter(id))
            .await?
        {
            Some(document) => Ok(Some(ModelData::from_document(entity, &document)?)),
            None => Ok(None),
        }
    }

    /// Fetches every record matching the request.
    ///
    /// Decode failure of any one document fails the whole call; there are
    /// no partial result sets.
    pub async fn fetch(&self, request: &FetchRequest) -> ModelStoreResult<Vec<ModelData>> {
        self.fetch_stream(request).await?.try_collect().await
    }

    /// Fetches the records matching the request as a lazy stream.
    ///
    /// Documents decode as they are yielded; the stream is finite, not
    /// restartable, and terminates with the first decode or transport
    /// error.
    pub async fn fetch_stream(&self, request: &FetchRequest) -> ModelStoreResult<RecordStream> {
        let entity = self.entity(&request.entity)?.clone();
        let filter = Self::filter(request)?;
        let options = QueryOptions::from(request);
        let documents = self.collection(&entity).find(filter, options).await?;
        Ok(documents
            .map(move |document| {
                document.and_then(|document| ModelData::from_document(&entity, &document))
            })
            .boxed())
    }

    /// Counts the records matching the request without decoding them.
    pub async fn count(&self, request: &FetchRequest) -> ModelStoreResult<u64> {
        let entity = self.entity(&request.entity)?;
        let filter = Self::filter(request)?;
        self.collection(entity)
            .count_documents(filter, CountOptions::from(request))
            .await
    }

    /// Creates or replaces a single record, keyed by its identity.
    pub async fn insert(&self, record: &ModelData) -> ModelStoreResult<()> {
        let entity = self.entity(&record.entity)?;
        self.collection(entity)
            .insert_one(record.to_document())
            .await
    }

    /// Creates or replaces many records, grouped by entity.
    ///
    /// Records are grouped into one write per distinct entity, preserving
    /// input order within each entity. No ordering is guaranteed across
    /// entities.
    pub async fn insert_batch(&self, records: &[ModelData]) -> ModelStoreResult<()> {
        let mut groups: HashMap<&str, Vec<Document>> = HashMap::new();
        for record in records {
            groups
                .entry(record.entity.as_str())
                .or_default()
                .push(record.to_document());
        }
        for (entity, documents) in groups {
            let entity = self.entity(entity)?;
            self.collection(entity).insert_many(documents).await?;
        }
        Ok(())
    }

    /// Deletes at most one record by identity. Deleting a nonexistent
    /// identity is not an error.
    pub async fn delete(&self, entity: &str, id: &ObjectID) -> ModelStoreResult<()> {
        let entity = self.entity(entity)?;
        self.collection(entity)
            .delete_one(Self::identity_filter(id))
            .await
    }
}
