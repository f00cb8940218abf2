//! Bidirectional codec between typed model values and the native BSON value
//! representation, plus the identity bridge.
//!
//! Decoding is type-directed: the declared [`AttributeType`] or
//! [`RelationshipType`] selects the accepted native kinds, and any other
//! pairing is a decode failure rather than a coerced default. Encoding is
//! total because the tagged unions already constrain representable values.

use bson::{oid::ObjectId, spec::BinarySubtype, Binary, Bson};
use chrono::DateTime;
use url::Url;
use uuid::Uuid;

use crate::{
    schema::{AttributeType, RelationshipType},
    value::{AttributeValue, ObjectID, RelationshipValue},
};

/// Decodes a native value as the given attribute type.
///
/// Integral values narrow only along int32→int16, int32→int64, int64→int16,
/// and int64→int32; a narrowing that cannot represent the value fails.
/// Strings decode into `uuid`/`url` only when the declared type asks for it
/// and the string parses. A native null decodes into
/// [`AttributeValue::Null`] regardless of the declared type.
///
/// Returns `None` on any unsupported (type, value) pairing; the record
/// marshaler turns that into an
/// [`AttributeTypeMismatch`](crate::error::ModelStoreError::AttributeTypeMismatch)
/// carrying the entity context this function does not have.
pub fn decode_attribute(value: &Bson, kind: AttributeType) -> Option<AttributeValue> {
    match (kind, value) {
        (_, Bson::Null) => Some(AttributeValue::Null),
        (AttributeType::Int16, Bson::Int32(value)) => {
            i16::try_from(*value).ok().map(AttributeValue::Int16)
        }
        (AttributeType::Int16, Bson::Int64(value)) => {
            i16::try_from(*value).ok().map(AttributeValue::Int16)
        }
        (AttributeType::Int32, Bson::Int32(value)) => Some(AttributeValue::Int32(*value)),
        (AttributeType::Int32, Bson::Int64(value)) => {
            i32::try_from(*value).ok().map(AttributeValue::Int32)
        }
        (AttributeType::Int64, Bson::Int64(value)) => Some(AttributeValue::Int64(*value)),
        (AttributeType::Int64, Bson::Int32(value)) => {
            Some(AttributeValue::Int64(i64::from(*value)))
        }
        (AttributeType::Bool, Bson::Boolean(value)) => Some(AttributeValue::Bool(*value)),
        (AttributeType::Date, Bson::DateTime(value)) => {
            Some(AttributeValue::Date(value.to_chrono()))
        }
        (AttributeType::Date, Bson::Timestamp(value)) => {
            DateTime::from_timestamp(i64::from(value.time), 0).map(AttributeValue::Date)
        }
        (AttributeType::Double, Bson::Double(value)) => Some(AttributeValue::Double(*value)),
        (AttributeType::Float, Bson::Double(value)) => {
            Some(AttributeValue::Float(*value as f32))
        }
        (AttributeType::String, Bson::String(value)) => {
            Some(AttributeValue::String(value.clone()))
        }
        (AttributeType::Data, Bson::Binary(binary)) => {
            Some(AttributeValue::Data(binary.bytes.clone()))
        }
        (AttributeType::Uuid, Bson::Binary(binary)) if binary.subtype == BinarySubtype::Uuid => {
            Uuid::from_slice(&binary.bytes).ok().map(AttributeValue::Uuid)
        }
        (AttributeType::Uuid, Bson::String(value)) => {
            Uuid::parse_str(value).ok().map(AttributeValue::Uuid)
        }
        (AttributeType::Url, Bson::String(value)) => {
            Url::parse(value).ok().map(AttributeValue::Url)
        }
        _ => None,
    }
}

/// Decodes a native value without a declared type.
///
/// This is the permissive mode used only when no schema type is available
/// (opportunistic reads). It maps native kinds to the nearest
/// [`AttributeValue`] case and rejects kinds with no scalar analogue
/// (documents, arrays, code, regexes, min/max sentinels). Callers holding a
/// schema must use [`decode_attribute`] instead; this mode is a narrower
/// capability, not the default path.
pub fn decode_attribute_untyped(value: &Bson) -> Option<AttributeValue> {
    match value {
        Bson::Null => Some(AttributeValue::Null),
        Bson::String(value) => Some(AttributeValue::String(value.clone())),
        Bson::Boolean(value) => Some(AttributeValue::Bool(*value)),
        Bson::Int32(value) => Some(AttributeValue::Int32(*value)),
        Bson::Int64(value) => Some(AttributeValue::Int64(*value)),
        Bson::Double(value) => Some(AttributeValue::Double(*value)),
        Bson::DateTime(value) => Some(AttributeValue::Date(value.to_chrono())),
        Bson::Timestamp(value) => {
            DateTime::from_timestamp(i64::from(value.time), 0).map(AttributeValue::Date)
        }
        Bson::Binary(binary) => {
            if binary.subtype == BinarySubtype::Uuid {
                if let Ok(uuid) = Uuid::from_slice(&binary.bytes) {
                    return Some(AttributeValue::Uuid(uuid));
                }
            }
            Some(AttributeValue::Data(binary.bytes.clone()))
        }
        _ => None,
    }
}

/// Encodes an attribute value into its native representation.
///
/// Total: every representable value has exactly one native form. `int16`
/// widens into the native 32-bit integer and `float` into the native double.
pub fn encode_attribute(value: &AttributeValue) -> Bson {
    match value {
        AttributeValue::Null => Bson::Null,
        AttributeValue::String(value) => Bson::String(value.clone()),
        AttributeValue::Uuid(value) => Bson::Binary(Binary {
            subtype: BinarySubtype::Uuid,
            bytes: value.as_bytes().to_vec(),
        }),
        AttributeValue::Url(value) => Bson::String(value.to_string()),
        AttributeValue::Data(value) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: value.clone(),
        }),
        AttributeValue::Date(value) => Bson::DateTime(bson::DateTime::from_chrono(*value)),
        AttributeValue::Bool(value) => Bson::Boolean(*value),
        AttributeValue::Int16(value) => Bson::Int32(i32::from(*value)),
        AttributeValue::Int32(value) => Bson::Int32(*value),
        AttributeValue::Int64(value) => Bson::Int64(*value),
        AttributeValue::Float(value) => Bson::Double(f64::from(*value)),
        AttributeValue::Double(value) => Bson::Double(*value),
    }
}

/// Decodes a native value as the given relationship type.
///
/// A native null is `Null` unconditionally. A `toOne` value must yield a
/// single identity through the bridge; a `toMany` value must be a native
/// array every element of which yields an identity — one bad element
/// invalidates the whole list, partial lists are not accepted.
pub fn decode_relationship(value: &Bson, kind: RelationshipType) -> Option<RelationshipValue> {
    if matches!(value, Bson::Null) {
        return Some(RelationshipValue::Null);
    }
    match kind {
        RelationshipType::ToOne => ObjectID::from_bson(value).map(RelationshipValue::ToOne),
        RelationshipType::ToMany => match value {
            Bson::Array(items) => items
                .iter()
                .map(ObjectID::from_bson)
                .collect::<Option<Vec<_>>>()
                .map(RelationshipValue::ToMany),
            _ => None,
        },
    }
}

/// Encodes a relationship value into its native representation.
///
/// Identities serialize as native strings; `toMany` preserves order exactly.
pub fn encode_relationship(value: &RelationshipValue) -> Bson {
    match value {
        RelationshipValue::Null => Bson::Null,
        RelationshipValue::ToOne(id) => Bson::String(id.as_str().to_string()),
        RelationshipValue::ToMany(ids) => Bson::Array(
            ids.iter()
                .map(|id| Bson::String(id.as_str().to_string()))
                .collect(),
        ),
    }
}

impl ObjectID {
    /// Attempts to build the database's native identity from this identity's
    /// string form.
    ///
    /// Used opportunistically for interop; documents always store the
    /// identity as a native string, so this is never required for
    /// correctness.
    pub fn to_native(&self) -> Option<ObjectId> {
        ObjectId::parse_str(self.as_str()).ok()
    }

    /// Reads an identity out of a native value: a native string directly, or
    /// a native identity by its canonical hex form. Any other kind yields no
    /// identity.
    pub fn from_bson(value: &Bson) -> Option<ObjectID> {
        match value {
            Bson::String(value) => Some(ObjectID::from(value.as_str())),
            Bson::ObjectId(oid) => Some(ObjectID::new(oid.to_hex())),
            _ => None,
        }
    }
}

/// Short name of a native value's kind, for error reporting.
pub(crate) fn bson_kind(value: &Bson) -> &'static str {
    match value {
        Bson::Double(_) => "double",
        Bson::String(_) => "string",
        Bson::Array(_) => "array",
        Bson::Document(_) => "document",
        Bson::Boolean(_) => "bool",
        Bson::Null => "null",
        Bson::Int32(_) => "int32",
        Bson::Int64(_) => "int64",
        Bson::Timestamp(_) => "timestamp",
        Bson::Binary(_) => "binary",
        Bson::ObjectId(_) => "objectId",
        Bson::DateTime(_) => "datetime",
        _ => "other",
    }
}
