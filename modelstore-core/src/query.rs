//! Fetch requests and their translation into native query options.
//!
//! A [`FetchRequest`] bundles an entity name with an optional predicate,
//! ordered sort descriptors, and pagination bounds. The translator in this
//! module turns sort/limit/offset metadata into the native option types
//! consumed by the collection abstraction; the predicate itself compiles
//! separately through [`crate::filter`].
//!
//! # Building requests
//!
//! ```ignore
//! use modelstore_core::query::{FetchRequest, SortDescriptor};
//! use modelstore_core::predicate::Filter;
//! use modelstore_core::value::AttributeValue;
//!
//! let request = FetchRequest::builder("Person")
//!     .filter(Filter::gte("age", AttributeValue::Int16(18)))
//!     .sort(SortDescriptor::ascending("name"))
//!     .limit(10)
//!     .build();
//! ```

use bson::Document;

use crate::predicate::Predicate;

/// Sort order for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDescriptor {
    /// The key path of the field to sort by.
    pub key: String,
    /// `true` for ascending order, `false` for descending.
    pub ascending: bool,
}

impl SortDescriptor {
    /// Creates an ascending sort on the given field.
    pub fn ascending(key: impl Into<String>) -> Self {
        Self { key: key.into(), ascending: true }
    }

    /// Creates a descending sort on the given field.
    pub fn descending(key: impl Into<String>) -> Self {
        Self { key: key.into(), ascending: false }
    }
}

/// A structured fetch over a single entity's records.
///
/// Limit and offset are explicit options: zero is a real bound, absence is
/// `None`, and the two are never conflated.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// The entity whose collection is queried.
    pub entity: String,
    /// Optional predicate restricting the result set.
    pub predicate: Option<Predicate>,
    /// Sort descriptors, applied in order.
    pub sort_descriptors: Vec<SortDescriptor>,
    /// Maximum number of records to return.
    pub limit: Option<u64>,
    /// Number of records to skip.
    pub offset: Option<u64>,
}

impl FetchRequest {
    /// Creates an unrestricted fetch of every record of the entity.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            predicate: None,
            sort_descriptors: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Creates a builder for fluent construction.
    pub fn builder(entity: impl Into<String>) -> FetchRequestBuilder {
        FetchRequestBuilder { request: FetchRequest::new(entity) }
    }
}

/// Builder for [`FetchRequest`].
#[derive(Debug, Clone)]
pub struct FetchRequestBuilder {
    request: FetchRequest,
}

impl FetchRequestBuilder {
    /// Sets the predicate restricting the result set.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.request.predicate = Some(predicate);
        self
    }

    /// Appends a sort descriptor.
    pub fn sort(mut self, descriptor: SortDescriptor) -> Self {
        self.request.sort_descriptors.push(descriptor);
        self
    }

    /// Sets the maximum number of records to return.
    pub fn limit(mut self, limit: u64) -> Self {
        self.request.limit = Some(limit);
        self
    }

    /// Sets the number of records to skip.
    pub fn offset(mut self, offset: u64) -> Self {
        self.request.offset = Some(offset);
        self
    }

    /// Builds and returns the final request.
    pub fn build(self) -> FetchRequest {
        self.request
    }
}

/// Compiles sort descriptors into a native sort document.
///
/// Fields map to `1` (ascending) or `-1` (descending) in descriptor order.
/// When two descriptors name the same field, the later direction overwrites
/// the earlier one. An empty list yields `None` rather than an empty
/// document, which the backing engine could interpret differently.
pub fn sort_document(descriptors: &[SortDescriptor]) -> Option<Document> {
    if descriptors.is_empty() {
        return None;
    }
    let mut document = Document::new();
    for descriptor in descriptors {
        document.insert(descriptor.key.clone(), if descriptor.ascending { 1_i32 } else { -1_i32 });
    }
    Some(document)
}

/// Native options for a `find` over a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Sort document, absent when the request carries no sort.
    pub sort: Option<Document>,
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
    /// Number of documents to skip.
    pub skip: Option<u64>,
}

impl From<&FetchRequest> for QueryOptions {
    fn from(request: &FetchRequest) -> Self {
        Self {
            sort: sort_document(&request.sort_descriptors),
            limit: request.limit,
            skip: request.offset,
        }
    }
}

/// Native options for a `countDocuments` over a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountOptions {
    /// Maximum count to report.
    pub limit: Option<u64>,
    /// Number of documents to skip before counting.
    pub skip: Option<u64>,
}

impl From<&FetchRequest> for CountOptions {
    fn from(request: &FetchRequest) -> Self {
        Self { limit: request.limit, skip: request.offset }
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;
    use crate::{predicate::Filter, value::AttributeValue};

    #[test]
    fn sort_descriptors_compile_in_order() {
        let sort = sort_document(&[
            SortDescriptor::ascending("name"),
            SortDescriptor::descending("age"),
        ]);
        assert_eq!(sort, Some(doc! { "name": 1, "age": -1 }));
    }

    #[test]
    fn later_descriptor_wins_a_field_collision() {
        let sort = sort_document(&[
            SortDescriptor::ascending("age"),
            SortDescriptor::descending("age"),
        ]);
        assert_eq!(sort.unwrap().get_i32("age").unwrap(), -1);
    }

    #[test]
    fn empty_sort_list_compiles_to_no_sort_clause() {
        assert_eq!(sort_document(&[]), None);
        let options = QueryOptions::from(&FetchRequest::new("Person"));
        assert_eq!(options.sort, None);
    }

    #[test]
    fn limit_and_offset_pass_through_including_zero() {
        let request = FetchRequest::builder("Person")
            .filter(Filter::gte("age", AttributeValue::Int16(18)))
            .limit(0)
            .offset(5)
            .build();
        let options = QueryOptions::from(&request);
        assert_eq!(options.limit, Some(0));
        assert_eq!(options.skip, Some(5));
        let count = CountOptions::from(&request);
        assert_eq!(count.limit, Some(0));
        assert_eq!(count.skip, Some(5));
        // Absence stays distinguishable from zero.
        let unbounded = QueryOptions::from(&FetchRequest::new("Person"));
        assert_eq!(unbounded.limit, None);
        assert_eq!(unbounded.skip, None);
    }
}
