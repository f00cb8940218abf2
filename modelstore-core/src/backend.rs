//! Collaborator abstraction over the backing document database.
//!
//! The translation core never talks to a wire protocol itself: it builds
//! native filter documents and query options and hands them to a
//! [`DocumentCollection`], the narrow interface a storage backend must
//! provide per collection. Backends are exchangeable (a persistent MongoDB
//! implementation, an in-memory interpreter for tests) and own connection
//! management, cursors, retries, and cancellation entirely.

use async_trait::async_trait;
use bson::Document;
use futures::stream::BoxStream;

use crate::{
    error::ModelStoreResult,
    query::{CountOptions, QueryOptions},
};

/// A finite, non-restartable stream of stored documents.
///
/// Yields each matching document lazily; a failed element terminates the
/// stream with that error.
pub type DocumentStream = BoxStream<'static, ModelStoreResult<Document>>;

/// One collection of documents in the backing store.
///
/// Filters passed in are native filter documents as produced by
/// [`Predicate::to_filter`](crate::predicate::Predicate::to_filter) or built
/// directly from an identity equality. Implementations must be safe to call
/// from concurrent tasks.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Returns at most one document matching the filter.
    async fn find_one(&self, filter: Document) -> ModelStoreResult<Option<Document>>;

    /// Returns the documents matching the filter as a lazy stream, honoring
    /// the sort, limit, and skip options.
    async fn find(&self, filter: Document, options: QueryOptions)
        -> ModelStoreResult<DocumentStream>;

    /// Counts the documents matching the filter, honoring the limit and
    /// skip options.
    async fn count_documents(
        &self,
        filter: Document,
        options: CountOptions,
    ) -> ModelStoreResult<u64>;

    /// Stores one document, replacing any existing document with the same
    /// identity (create-or-replace keyed by the `_id` field).
    async fn insert_one(&self, document: Document) -> ModelStoreResult<()>;

    /// Stores many documents in input order, each with create-or-replace
    /// semantics keyed by the `_id` field.
    async fn insert_many(&self, documents: Vec<Document>) -> ModelStoreResult<()>;

    /// Deletes at most one document matching the filter. Deleting with a
    /// filter nothing matches is not an error.
    async fn delete_one(&self, filter: Document) -> ModelStoreResult<()>;
}

/// A storage backend handing out collection handles by name.
pub trait StoreBackend: Send + Sync {
    /// The collection handle type this backend provides.
    type Collection: DocumentCollection;

    /// Returns a handle on the named collection, creating it lazily if the
    /// backend requires that.
    fn collection(&self, name: &str) -> Self::Collection;
}

/// Factory trait for constructing backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> ModelStoreResult<Self::Backend>;
}
