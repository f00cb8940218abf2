//! Error types and result types for model store operations.
//!
//! This module provides the error taxonomy for all translation and storage
//! operations. Use [`ModelStoreResult<T>`] as the return type for fallible
//! operations.

use thiserror::Error;

use crate::schema::{AttributeType, RelationshipType};

/// Represents all possible errors that can occur when translating records or
/// talking to a document store.
///
/// Codec and compiler failures are detected eagerly and stop the enclosing
/// operation: there is no partial decoding of a record and no partial filter.
/// Native storage errors pass through opaquely in [`Backend`](Self::Backend)
/// and are never interpreted or retried by this crate.
#[derive(Error, Debug)]
pub enum ModelStoreError {
    /// A stored value could not be decoded as the attribute type declared in
    /// the entity schema. Carries the entity, the attribute, the declared
    /// type, and the kind of the native value actually found.
    #[error("attribute {entity}.{attribute} expected {expected}, found {found}")]
    AttributeTypeMismatch {
        entity: String,
        attribute: String,
        expected: AttributeType,
        found: &'static str,
    },
    /// A stored value could not be decoded as the relationship type declared
    /// in the entity schema. A single bad element invalidates a whole
    /// to-many list.
    #[error("relationship {entity}.{relationship} expected {expected}")]
    RelationshipTypeMismatch {
        entity: String,
        relationship: String,
        expected: RelationshipType,
    },
    /// The document carries no identity field, or the identity field holds a
    /// native kind no identity can be read from.
    #[error("document is missing its identity field")]
    MissingIdentity,
    /// The request named an entity the model does not declare.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    /// The predicate cannot be expressed in the native filter language.
    /// Fetches fail rather than silently under-filter.
    #[error("predicate cannot be expressed as a native filter")]
    UnsupportedPredicate,
    /// Error during store initialization or connection setup.
    #[error("initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for model store operations.
pub type ModelStoreResult<T> = Result<T, ModelStoreError>;
