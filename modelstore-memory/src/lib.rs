//! In-memory collection backend for modelstore.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! collection abstraction that interprets the compiled native filter
//! documents directly. It uses async-aware read-write locks for concurrent
//! access and is ideal for development and testing.
//!
//! # Quick Start
//!
//! ```ignore
//! use modelstore_core::{
//!     record::ModelData,
//!     schema::{AttributeType, EntityDescription, Model},
//!     store::ModelStore,
//!     value::AttributeValue,
//! };
//! use modelstore_memory::InMemoryBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = Model::new([EntityDescription::new("Person")
//!         .with_attribute("age", AttributeType::Int16)]);
//!     let store = ModelStore::new(InMemoryBackend::new(), model);
//!
//!     let person = ModelData::new("Person", "p1")
//!         .with_attribute("age", AttributeValue::Int16(22));
//!     store.insert(&person).await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as modelstore_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryBackend, InMemoryBackendBuilder, MemoryCollection};
