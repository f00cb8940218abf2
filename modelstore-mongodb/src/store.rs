use async_trait::async_trait;
use bson::{Document, doc};
use futures::{StreamExt, TryStreamExt, stream::iter};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, CountOptions as MongoCountOptions, FindOptions},
};

use modelstore_core::{
    backend::{DocumentCollection, DocumentStream, StoreBackend, StoreBackendBuilder},
    error::{ModelStoreError, ModelStoreResult},
    query::{CountOptions, QueryOptions},
    record::ID_FIELD,
};

/// MongoDB-backed storage for model records.
///
/// Hands out collection handles scoped to a single database; connection
/// pooling, retries, and cancellation are the driver's responsibility.
#[derive(Debug, Clone)]
pub struct MongoBackend {
    client: Client,
    database: String,
}

impl MongoBackend {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoBackendBuilder {
        MongoBackendBuilder::new(dsn, database)
    }
}

impl StoreBackend for MongoBackend {
    type Collection = MongoModelCollection;

    fn collection(&self, name: &str) -> MongoModelCollection {
        MongoModelCollection {
            collection: self
                .client
                .database(&self.database)
                .collection::<Document>(name),
        }
    }
}

/// A handle on one MongoDB collection of record documents.
#[derive(Debug, Clone)]
pub struct MongoModelCollection {
    collection: MongoCollection<Document>,
}

impl MongoModelCollection {
    fn identity_of(document: &Document) -> ModelStoreResult<String> {
        document
            .get_str(ID_FIELD)
            .map(str::to_string)
            .map_err(|_| ModelStoreError::MissingIdentity)
    }
}

#[async_trait]
impl DocumentCollection for MongoModelCollection {
    async fn find_one(&self, filter: Document) -> ModelStoreResult<Option<Document>> {
        self.collection
            .find_one(filter)
            .await
            .map_err(|e| ModelStoreError::Backend(e.to_string()))
    }

    async fn find(
        &self,
        filter: Document,
        options: QueryOptions,
    ) -> ModelStoreResult<DocumentStream> {
        let mut find_options = FindOptions::default();
        if let Some(limit) = options.limit {
            find_options.limit = Some(limit as i64);
        }
        if let Some(skip) = options.skip {
            find_options.skip = Some(skip);
        }
        if let Some(sort) = options.sort {
            find_options.sort = Some(sort);
        }

        Ok(self
            .collection
            .find(filter)
            .with_options(find_options)
            .await
            .map_err(|e| ModelStoreError::Backend(e.to_string()))?
            .map_err(|e| ModelStoreError::Backend(e.to_string()))
            .boxed())
    }

    async fn count_documents(
        &self,
        filter: Document,
        options: CountOptions,
    ) -> ModelStoreResult<u64> {
        let mut count_options = MongoCountOptions::default();
        count_options.limit = options.limit;
        count_options.skip = options.skip;

        self.collection
            .count_documents(filter)
            .with_options(count_options)
            .await
            .map_err(|e| ModelStoreError::Backend(e.to_string()))
    }

    async fn insert_one(&self, document: Document) -> ModelStoreResult<()> {
        let id = Self::identity_of(&document)?;
        self.collection
            .replace_one(doc! { ID_FIELD: id }, document)
            .upsert(true)
            .await
            .map_err(|e| ModelStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn insert_many(&self, documents: Vec<Document>) -> ModelStoreResult<()> {
        iter(documents)
            .then(async |document| self.insert_one(document).await)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(())
    }

    async fn delete_one(&self, filter: Document) -> ModelStoreResult<()> {
        self.collection
            .delete_one(filter)
            .await
            .map_err(|e| ModelStoreError::Backend(e.to_string()))?;

        Ok(())
    }
}

/// Builder constructing a [`MongoBackend`] from a connection string.
pub struct MongoBackendBuilder {
    dsn: String,
    database: String,
}

impl MongoBackendBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoBackendBuilder {
    type Backend = MongoBackend;

    async fn build(self) -> ModelStoreResult<Self::Backend> {
        Ok(MongoBackend::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| ModelStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| ModelStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
