//! A schema-driven object-document mapping core that stores typed entities,
//! attributes, and relationships in a schemaless document database.
//!
//! This crate is the core of the modelstore project and provides:
//!
//! - **Schema descriptors** ([`schema`]) - Immutable entity/attribute/relationship descriptions
//! - **Value types** ([`value`]) - Typed scalar values, relationship references, and identities
//! - **Value codec** ([`codec`]) - Bidirectional conversion between typed values and BSON
//! - **Predicate trees** ([`predicate`]) - Structured comparison/compound query expressions
//! - **Filter compilation** ([`filter`]) - Predicate-to-native-filter compilation
//! - **Fetch requests** ([`query`]) - Sort, limit, and offset translation into query options
//! - **Record marshaling** ([`record`]) - Whole-record conversion to and from documents
//! - **Backend abstraction** ([`backend`]) - Traits for the backing collection implementations
//! - **Storage facade** ([`store`]) - Fetch/count/insert/delete over typed records
//! - **Error handling** ([`error`]) - Error taxonomy and result types
//!
//! # Example
//!
//! ```ignore
//! use modelstore_core::{
//!     query::FetchRequest,
//!     record::ModelData,
//!     schema::{AttributeType, EntityDescription, Model},
//!     store::ModelStore,
//!     value::AttributeValue,
//! };
//!
//! let model = Model::new([EntityDescription::new("Person")
//!     .with_attribute("name", AttributeType::String)
//!     .with_attribute("age", AttributeType::Int16)]);
//! let store = ModelStore::new(backend, model);
//!
//! let person = ModelData::new("Person", "p1")
//!     .with_attribute("name", AttributeValue::String("Jane".into()))
//!     .with_attribute("age", AttributeValue::Int16(22));
//! store.insert(&person).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as modelstore_core;

pub mod backend;
pub mod codec;
pub mod error;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;
