//! Predicate trees for structured fetch queries.
//!
//! A [`Predicate`] is a boolean-valued expression tree over an entity's
//! fields: comparisons between a key path and a literal operand, combined
//! with logical operators. The tree models the full source operator set;
//! which subset is expressible in the native filter language is decided by
//! the compiler in [`crate::filter`], not here.
//!
//! # Building predicates
//!
//! The [`Filter`] struct provides constructors for the common comparisons,
//! and predicates compose with the chainable [`Predicate::and`] /
//! [`Predicate::or`] methods:
//!
//! ```ignore
//! use modelstore_core::predicate::Filter;
//! use modelstore_core::value::AttributeValue;
//!
//! let predicate = Filter::gte("age", AttributeValue::Int16(18))
//!     .and(Filter::eq("name", AttributeValue::String("Jane".into())));
//! ```

use crate::value::{AttributeValue, RelationshipValue};

/// An operand of a comparison: a literal value or a field reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A scalar literal.
    Attribute(AttributeValue),
    /// A relationship literal (an identity, or an identity list for `in`
    /// style membership tests).
    Relationship(RelationshipValue),
    /// A reference to a field by key path.
    KeyPath(String),
}

/// Comparison operators of the source predicate model.
///
/// Only the first eight have a counterpart in the native filter language;
/// the string-matching operators exist so the compiler can reject them
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
    In,
    NotIn,
    Contains,
    BeginsWith,
    EndsWith,
    Like,
    Matches,
}

/// String-matching options a comparison may carry.
///
/// The native filter language cannot express any of these; a comparison
/// carrying options never compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOption {
    CaseInsensitive,
    DiacriticInsensitive,
    Normalized,
    LocaleSensitive,
}

/// Aggregate modifier of a comparison over collection-valued fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonModifier {
    /// Compare the field value directly.
    #[default]
    Direct,
    /// Every element must satisfy the comparison.
    All,
    /// At least one element must satisfy the comparison.
    Any,
}

/// A single comparison between two expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Expression,
    pub right: Expression,
    pub operator: ComparisonOperator,
    pub modifier: ComparisonModifier,
    pub options: Vec<ComparisonOption>,
}

impl Comparison {
    /// Creates a direct comparison with no options.
    pub fn new(left: Expression, operator: ComparisonOperator, right: Expression) -> Self {
        Self {
            left,
            right,
            operator,
            modifier: ComparisonModifier::Direct,
            options: Vec::new(),
        }
    }

    /// Replaces the aggregate modifier.
    pub fn with_modifier(mut self, modifier: ComparisonModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Appends a string-matching option.
    pub fn with_option(mut self, option: ComparisonOption) -> Self {
        self.options.push(option);
        self
    }
}

/// Logical combinators of the source predicate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    And,
    Or,
    Not,
}

/// A logical combination of subpredicates.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub operator: LogicalType,
    pub subpredicates: Vec<Predicate>,
}

impl Compound {
    pub fn new(operator: LogicalType, subpredicates: Vec<Predicate>) -> Self {
        Self { operator, subpredicates }
    }
}

/// A boolean-valued query expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A comparison between a key path and an operand.
    Comparison(Comparison),
    /// A logical combination of subpredicates.
    Compound(Compound),
    /// A bare literal. Present in the source model but inexpressible as a
    /// filter; always fails to compile.
    Value(Expression),
}

impl Predicate {
    /// Combines this predicate with another under logical AND.
    ///
    /// If this predicate is already an AND compound, the other predicate is
    /// appended to its subpredicates.
    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::Compound(Compound { operator: LogicalType::And, mut subpredicates }) => {
                subpredicates.push(other);
                Predicate::Compound(Compound::new(LogicalType::And, subpredicates))
            }
            _ => Predicate::Compound(Compound::new(LogicalType::And, vec![self, other])),
        }
    }

    /// Combines this predicate with another under logical OR.
    ///
    /// If this predicate is already an OR compound, the other predicate is
    /// appended to its subpredicates.
    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Compound(Compound { operator: LogicalType::Or, mut subpredicates }) => {
                subpredicates.push(other);
                Predicate::Compound(Compound::new(LogicalType::Or, subpredicates))
            }
            _ => Predicate::Compound(Compound::new(LogicalType::Or, vec![self, other])),
        }
    }

    /// Negates this predicate.
    ///
    /// Negation exists in the tree but has no native counterpart; a `not`
    /// compound never compiles to a filter.
    pub fn not(self) -> Self {
        Predicate::Compound(Compound::new(LogicalType::Not, vec![self]))
    }
}

/// Helper struct for constructing comparison predicates.
///
/// All methods take the key path of the left-hand field and a literal for
/// the right-hand side.
pub struct Filter;

impl Filter {
    fn comparison(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<Expression>,
    ) -> Predicate {
        Predicate::Comparison(Comparison::new(
            Expression::KeyPath(field.into()),
            operator,
            value.into(),
        ))
    }

    /// Matches records where the field equals the value.
    pub fn eq(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::EqualTo, value)
    }

    /// Matches records where the field does not equal the value.
    pub fn ne(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::NotEqualTo, value)
    }

    /// Matches records where the field is greater than the value.
    pub fn gt(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::GreaterThan, value)
    }

    /// Matches records where the field is greater than or equal to the value.
    pub fn gte(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::GreaterThanOrEqualTo, value)
    }

    /// Matches records where the field is less than the value.
    pub fn lt(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::LessThan, value)
    }

    /// Matches records where the field is less than or equal to the value.
    pub fn lte(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::LessThanOrEqualTo, value)
    }

    /// Matches records where the field is any of the listed values.
    pub fn any_of(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::In, value)
    }

    /// Matches records where the field is none of the listed values.
    pub fn none_of(field: impl Into<String>, value: impl Into<Expression>) -> Predicate {
        Self::comparison(field, ComparisonOperator::NotIn, value)
    }

    /// Combines predicates under logical AND.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        Predicate::Compound(Compound::new(
            LogicalType::And,
            predicates.into_iter().collect(),
        ))
    }

    /// Combines predicates under logical OR.
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        Predicate::Compound(Compound::new(
            LogicalType::Or,
            predicates.into_iter().collect(),
        ))
    }
}

impl From<AttributeValue> for Expression {
    fn from(value: AttributeValue) -> Self {
        Expression::Attribute(value)
    }
}

impl From<RelationshipValue> for Expression {
    fn from(value: RelationshipValue) -> Self {
        Expression::Relationship(value)
    }
}
