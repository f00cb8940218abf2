//! Main modelstore crate providing a schema-driven object-document mapping
//! layer over schemaless document stores.
//!
//! This crate is the primary entry point for users of the modelstore
//! framework. It re-exports the translation core and provides convenient
//! access to the storage backends.
//!
//! # Features
//!
//! - **Schema-driven records** - Entities, typed attributes, and relationships described
//!   by immutable value descriptors, stored as plain documents
//! - **Structured queries** - Predicate trees compiled into the native filter language,
//!   with sort/limit/offset translation
//! - **Multiple backends** - An in-memory backend for development and testing, and a
//!   MongoDB backend behind the `mongodb` feature
//!
//! # Quick Start
//!
//! ```ignore
//! use modelstore::{memory::InMemoryBackend, prelude::*};
//!
//! #[tokio::main]
//! async fn main() {
//!     let model = Model::new([EntityDescription::new("Person")
//!         .with_attribute("name", AttributeType::String)
//!         .with_attribute("age", AttributeType::Int16)]);
//!     let store = ModelStore::new(InMemoryBackend::new(), model);
//!
//!     let person = ModelData::new("Person", "p1")
//!         .with_attribute("name", AttributeValue::String("Jane".into()))
//!         .with_attribute("age", AttributeValue::Int16(22));
//!     store.insert(&person).await.unwrap();
//!
//!     let adults = store
//!         .fetch(
//!             &FetchRequest::builder("Person")
//!                 .filter(Filter::gte("age", AttributeValue::Int16(18)))
//!                 .sort(SortDescriptor::ascending("name"))
//!                 .build(),
//!         )
//!         .await
//!         .unwrap();
//!
//!     println!("Fetched records: {adults:?}");
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use modelstore_core::{
    backend, codec, error, filter, predicate, query, record, schema, store, value,
};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use modelstore_memory::{InMemoryBackend, InMemoryBackendBuilder, MemoryCollection};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use modelstore_mongodb::{MongoBackend, MongoBackendBuilder, MongoModelCollection};
}
