//! Convenient re-exports of commonly used types from modelstore.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use modelstore::prelude::*;
//! ```
//!
//! This provides access to:
//! - Schema descriptors and value types
//! - Predicate and fetch request construction
//! - The storage facade and backend traits
//! - Error types

pub use modelstore_core::{
    backend::{DocumentCollection, DocumentStream, StoreBackend, StoreBackendBuilder},
    error::{ModelStoreError, ModelStoreResult},
    filter::{ComparisonQueryOperator, LogicalQueryOperator},
    predicate::{
        Comparison, ComparisonModifier, ComparisonOperator, ComparisonOption, Compound,
        Expression, Filter, LogicalType, Predicate,
    },
    query::{CountOptions, FetchRequest, FetchRequestBuilder, QueryOptions, SortDescriptor},
    record::{ID_FIELD, ModelData},
    schema::{
        AttributeDescription, AttributeType, EntityDescription, Model, RelationshipDescription,
        RelationshipType,
    },
    store::{ModelStore, RecordStream},
    value::{AttributeValue, ObjectID, RelationshipValue},
};
