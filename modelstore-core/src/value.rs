//! Value types carried by records: identities, scalar attributes, and
//! relationship references.

use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::schema::{AttributeType, RelationshipType};

/// The opaque, stable string identity of a record within its entity's
/// collection.
///
/// Distinct from the backing database's native identity type, which is only
/// used as a fallback interop form by the identity bridge in [`crate::codec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectID(String);

impl ObjectID {
    /// Creates an identity from its string form.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identity's string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identity, returning its string form.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ObjectID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A typed scalar value, one case per [`AttributeType`] plus a distinguished
/// `Null` usable regardless of declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    String(String),
    Uuid(Uuid),
    Url(Url),
    Data(Vec<u8>),
    Date(DateTime<Utc>),
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
}

impl AttributeValue {
    /// The attribute type this value inhabits, or `None` for `Null` (which
    /// inhabits every type).
    pub fn kind(&self) -> Option<AttributeType> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::String(_) => Some(AttributeType::String),
            AttributeValue::Uuid(_) => Some(AttributeType::Uuid),
            AttributeValue::Url(_) => Some(AttributeType::Url),
            AttributeValue::Data(_) => Some(AttributeType::Data),
            AttributeValue::Date(_) => Some(AttributeType::Date),
            AttributeValue::Bool(_) => Some(AttributeType::Bool),
            AttributeValue::Int16(_) => Some(AttributeType::Int16),
            AttributeValue::Int32(_) => Some(AttributeType::Int32),
            AttributeValue::Int64(_) => Some(AttributeType::Int64),
            AttributeValue::Float(_) => Some(AttributeType::Float),
            AttributeValue::Double(_) => Some(AttributeType::Double),
        }
    }

    /// Returns `true` for the `Null` case.
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

/// A reference value held by a record's relationship field.
///
/// `ToMany` order carries semantic meaning for consumers and round-trips
/// exactly through the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipValue {
    Null,
    ToOne(ObjectID),
    ToMany(Vec<ObjectID>),
}

impl RelationshipValue {
    /// The relationship type this value inhabits, or `None` for `Null`.
    pub fn kind(&self) -> Option<RelationshipType> {
        match self {
            RelationshipValue::Null => None,
            RelationshipValue::ToOne(_) => Some(RelationshipType::ToOne),
            RelationshipValue::ToMany(_) => Some(RelationshipType::ToMany),
        }
    }
}
