//! Native filter interpretation for in-memory document matching.
//!
//! This module evaluates the compiled filter documents (`$and`/`$or`/`$nor`
//! combinators over `{ field: { operator: value } }` clauses) against stored
//! documents, plus the multi-key sort comparison used by `find`.

use std::cmp::Ordering;

use bson::{Bson, Document, datetime::DateTime};

/// Type-erased, comparable representation of BSON values.
///
/// Wraps BSON values for filter comparisons, normalizing all numeric types
/// to f64 so int32/int64/double stored forms compare interchangeably.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null, and every kind with no comparison semantics.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64).
    Number(f64),
    /// DateTime value.
    DateTime(DateTime),
    /// String value.
    String(&'a str),
    /// Binary payload (UUIDs and raw data).
    Bytes(&'a [u8]),
    /// Array of comparable values.
    Array(Vec<Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(f64::from(*value)),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Binary(binary) => Comparable::Bytes(&binary.bytes),
            Bson::Array(array) => {
                Comparable::Array(array.iter().map(Comparable::from).collect())
            }
            _ => Comparable::Null,
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Bytes(a), Comparable::Bytes(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            (Comparable::Bytes(a), Comparable::Bytes(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Evaluates compiled filter documents against stored documents.
pub(crate) struct FilterEvaluator;

impl FilterEvaluator {
    /// Returns whether the document satisfies every clause of the filter.
    ///
    /// An empty filter matches everything. Top-level keys are either logical
    /// combinators over subfilter arrays or field clauses; a field clause is
    /// an operator map, or a bare value shorthand for equality (the form
    /// identity filters use).
    pub fn matches(filter: &Document, document: &Document) -> bool {
        filter.iter().all(|(key, condition)| match key.as_str() {
            "$and" => Self::subfilters(condition)
                .is_some_and(|subs| subs.iter().all(|sub| Self::matches(sub, document))),
            "$or" => Self::subfilters(condition)
                .is_some_and(|subs| subs.iter().any(|sub| Self::matches(sub, document))),
            "$nor" => Self::subfilters(condition)
                .is_some_and(|subs| !subs.iter().any(|sub| Self::matches(sub, document))),
            field => match condition {
                Bson::Document(operators) => operators
                    .iter()
                    .all(|(operator, operand)| {
                        Self::compare(document.get(field), operator, operand)
                    }),
                literal => {
                    Comparable::from(document.get(field).unwrap_or(&Bson::Null))
                        == Comparable::from(literal)
                }
            },
        })
    }

    fn subfilters(condition: &Bson) -> Option<Vec<&Document>> {
        match condition {
            Bson::Array(items) => items.iter().map(Bson::as_document).collect(),
            _ => None,
        }
    }

    fn compare(value: Option<&Bson>, operator: &str, operand: &Bson) -> bool {
        let left = value.map(Comparable::from).unwrap_or(Comparable::Null);
        match operator {
            "$eq" => left == Comparable::from(operand),
            "$ne" => left != Comparable::from(operand),
            "$gt" | "$gte" | "$lt" | "$lte" => {
                match left.partial_cmp(&Comparable::from(operand)) {
                    Some(ordering) => match operator {
                        "$gt" => ordering == Ordering::Greater,
                        "$gte" => ordering != Ordering::Less,
                        "$lt" => ordering == Ordering::Less,
                        "$lte" => ordering != Ordering::Greater,
                        _ => unreachable!(),
                    },
                    None => false,
                }
            }
            "$in" => match operand {
                Bson::Array(candidates) => {
                    candidates.iter().any(|candidate| left == Comparable::from(candidate))
                }
                _ => false,
            },
            "$nin" => match operand {
                Bson::Array(candidates) => {
                    !candidates.iter().any(|candidate| left == Comparable::from(candidate))
                }
                _ => false,
            },
            _ => false,
        }
    }
}

/// Orders two documents by a native sort document.
///
/// Sort fields apply in order; a `-1` direction flips the comparison.
/// Values with no defined ordering compare as equal.
pub(crate) fn compare_documents(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (field, direction) in sort.iter() {
        let left = a.get(field).map(Comparable::from).unwrap_or(Comparable::Null);
        let right = b.get(field).map(Comparable::from).unwrap_or(Comparable::Null);
        let ordering = left.partial_cmp(&right).unwrap_or(Ordering::Equal);
        let ordering = match direction.as_i32() {
            Some(-1) => ordering.reverse(),
            _ => ordering,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn field_clauses_compare_by_operator() {
        let document = doc! { "name": "Jane", "age": 22 };
        assert!(FilterEvaluator::matches(&doc! { "age": { "$gte": 18 } }, &document));
        assert!(FilterEvaluator::matches(&doc! { "age": { "$ne": 30 } }, &document));
        assert!(!FilterEvaluator::matches(&doc! { "age": { "$lt": 22 } }, &document));
        assert!(FilterEvaluator::matches(
            &doc! { "name": { "$in": ["Jane", "John"] } },
            &document,
        ));
        assert!(!FilterEvaluator::matches(
            &doc! { "name": { "$nin": ["Jane", "John"] } },
            &document,
        ));
    }

    #[test]
    fn numeric_comparisons_span_integer_widths() {
        let document = doc! { "age": Bson::Int64(22) };
        assert!(FilterEvaluator::matches(&doc! { "age": { "$eq": 22_i32 } }, &document));
        assert!(FilterEvaluator::matches(&doc! { "age": { "$lte": 22.0 } }, &document));
    }

    #[test]
    fn bare_values_are_equality_shorthand() {
        let document = doc! { "_id": "p1", "age": 22 };
        assert!(FilterEvaluator::matches(&doc! { "_id": "p1" }, &document));
        assert!(!FilterEvaluator::matches(&doc! { "_id": "p2" }, &document));
    }

    #[test]
    fn logical_combinators_nest() {
        let document = doc! { "name": "Jane", "age": 22 };
        let filter = doc! { "$and": [
            { "age": { "$gte": 18 } },
            { "$or": [
                { "name": { "$eq": "Jane" } },
                { "name": { "$eq": "John" } },
            ] },
        ] };
        assert!(FilterEvaluator::matches(&filter, &document));
        let filter = doc! { "$nor": [
            { "age": { "$lt": 18 } },
            { "name": { "$eq": "John" } },
        ] };
        assert!(FilterEvaluator::matches(&filter, &document));
    }

    #[test]
    fn missing_fields_compare_as_null() {
        let document = doc! { "name": "Jane" };
        assert!(FilterEvaluator::matches(&doc! { "age": { "$eq": Bson::Null } }, &document));
        assert!(!FilterEvaluator::matches(&doc! { "age": { "$gt": 0 } }, &document));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(FilterEvaluator::matches(&doc! {}, &doc! { "a": 1 }));
    }

    #[test]
    fn sort_comparison_applies_fields_in_order() {
        let sort = doc! { "age": 1, "name": -1 };
        let younger = doc! { "name": "Jane", "age": 20 };
        let older = doc! { "name": "John", "age": 30 };
        let older_alpha = doc! { "name": "Ada", "age": 30 };
        assert_eq!(compare_documents(&younger, &older, &sort), Ordering::Less);
        assert_eq!(compare_documents(&older, &older_alpha, &sort), Ordering::Less);
    }
}
