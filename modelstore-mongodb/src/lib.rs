//! MongoDB backend implementation for modelstore.
//!
//! This crate provides a MongoDB-based implementation of the collection
//! abstraction, persisting records through the official async driver. The
//! compiled filter documents and query options of `modelstore-core` map
//! directly onto the driver's find/count/replace operations.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! modelstore = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! A backend is built from a MongoDB connection string and a database name:
//!
//! ```ignore
//! use modelstore_core::backend::StoreBackendBuilder;
//! use modelstore_mongodb::MongoBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MongoBackend::builder("mongodb://localhost:27017", "test")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as modelstore_mongodb;

pub mod store;

pub use store::{MongoBackend, MongoBackendBuilder, MongoModelCollection};
