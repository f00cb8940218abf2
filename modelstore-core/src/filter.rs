//! Compilation of predicate trees into native filter documents.
//!
//! The compiler is a pure function from [`Predicate`] to
//! `Option<Document>`: `None` signals the predicate cannot be expressed in
//! the filter language, and the enclosing fetch must fail rather than
//! silently under-filter. Compilation is all-or-nothing; a compound with one
//! inexpressible subpredicate produces no partial filter.

use bson::{doc, Bson, Document};

use crate::{
    codec::{encode_attribute, encode_relationship},
    predicate::{
        Comparison, ComparisonModifier, ComparisonOperator, Compound, Expression, LogicalType,
        Predicate,
    },
};

/// Comparison query operators of the native filter language.
///
/// Comparison operators return data based on value comparisons. The token
/// mapping is a fixed bijection and part of the storage contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonQueryOperator {
    /// Matches values that are equal to a specified value.
    EqualTo,
    /// Matches all values that are not equal to a specified value.
    NotEqualTo,
    /// Matches values that are greater than a specified value.
    GreaterThan,
    /// Matches values that are greater than or equal to a specified value.
    GreaterThanOrEqualTo,
    /// Matches values that are less than a specified value.
    LessThan,
    /// Matches values that are less than or equal to a specified value.
    LessThanOrEqualTo,
    /// Matches any of the values specified in an array.
    In,
    /// Matches none of the values specified in an array.
    NotIn,
}

impl ComparisonQueryOperator {
    /// The operator's token in the filter language.
    pub fn token(self) -> &'static str {
        match self {
            ComparisonQueryOperator::EqualTo => "$eq",
            ComparisonQueryOperator::NotEqualTo => "$ne",
            ComparisonQueryOperator::GreaterThan => "$gt",
            ComparisonQueryOperator::GreaterThanOrEqualTo => "$gte",
            ComparisonQueryOperator::LessThan => "$lt",
            ComparisonQueryOperator::LessThanOrEqualTo => "$lte",
            ComparisonQueryOperator::In => "$in",
            ComparisonQueryOperator::NotIn => "$nin",
        }
    }

    /// Maps a predicate operator into the native set.
    ///
    /// String-matching operators (`contains`, `beginsWith`, `endsWith`,
    /// `like`, `matches`) have no counterpart here and yield `None`.
    pub fn from_comparison(operator: ComparisonOperator) -> Option<Self> {
        match operator {
            ComparisonOperator::EqualTo => Some(ComparisonQueryOperator::EqualTo),
            ComparisonOperator::NotEqualTo => Some(ComparisonQueryOperator::NotEqualTo),
            ComparisonOperator::GreaterThan => Some(ComparisonQueryOperator::GreaterThan),
            ComparisonOperator::GreaterThanOrEqualTo => {
                Some(ComparisonQueryOperator::GreaterThanOrEqualTo)
            }
            ComparisonOperator::LessThan => Some(ComparisonQueryOperator::LessThan),
            ComparisonOperator::LessThanOrEqualTo => {
                Some(ComparisonQueryOperator::LessThanOrEqualTo)
            }
            ComparisonOperator::In => Some(ComparisonQueryOperator::In),
            ComparisonOperator::NotIn => Some(ComparisonQueryOperator::NotIn),
            ComparisonOperator::Contains
            | ComparisonOperator::BeginsWith
            | ComparisonOperator::EndsWith
            | ComparisonOperator::Like
            | ComparisonOperator::Matches => None,
        }
    }
}

/// Logical query operators of the native filter language.
///
/// `$not` and `$nor` are part of the language but unreachable from the
/// predicate compiler: `not` compounds never compile, and the source model
/// has no `nor` combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalQueryOperator {
    /// Joins clauses with a logical AND.
    And,
    /// Joins clauses with a logical OR.
    Or,
    /// Inverts a query expression.
    Not,
    /// Joins clauses with a logical NOR.
    Nor,
}

impl LogicalQueryOperator {
    /// The operator's token in the filter language.
    pub fn token(self) -> &'static str {
        match self {
            LogicalQueryOperator::And => "$and",
            LogicalQueryOperator::Or => "$or",
            LogicalQueryOperator::Not => "$not",
            LogicalQueryOperator::Nor => "$nor",
        }
    }
}

impl Predicate {
    /// Compiles this predicate into a native filter document.
    ///
    /// Returns `None` whenever any part of the tree is inexpressible.
    pub fn to_filter(&self) -> Option<Document> {
        match self {
            Predicate::Comparison(comparison) => comparison.to_filter(),
            Predicate::Compound(compound) => compound.to_filter(),
            // A bare literal is not a boolean filter expression.
            Predicate::Value(_) => None,
        }
    }
}

impl Comparison {
    /// Compiles a single comparison into `{ field: { token: value } }`.
    ///
    /// Requires a key path on the left, a literal on the right, an operator
    /// with a native counterpart, the direct modifier, and no
    /// string-matching options.
    fn to_filter(&self) -> Option<Document> {
        if self.modifier != ComparisonModifier::Direct || !self.options.is_empty() {
            return None;
        }
        let Expression::KeyPath(field) = &self.left else {
            return None;
        };
        let operator = ComparisonQueryOperator::from_comparison(self.operator)?;
        let value = match &self.right {
            Expression::Attribute(value) => encode_attribute(value),
            Expression::Relationship(value) => encode_relationship(value),
            // Field-to-field comparison has no filter form.
            Expression::KeyPath(_) => return None,
        };
        Some(doc! { field: { operator.token(): value } })
    }
}

impl Compound {
    /// Compiles a compound into `{ token: [ subfilter, ... ] }`.
    ///
    /// `not` cannot be expressed at this level of the filter language and
    /// always fails.
    fn to_filter(&self) -> Option<Document> {
        let operator = match self.operator {
            LogicalType::And => LogicalQueryOperator::And,
            LogicalType::Or => LogicalQueryOperator::Or,
            LogicalType::Not => return None,
        };
        let mut subfilters = Vec::with_capacity(self.subpredicates.len());
        for subpredicate in &self.subpredicates {
            subfilters.push(Bson::Document(subpredicate.to_filter()?));
        }
        Some(doc! { operator.token(): subfilters })
    }
}
