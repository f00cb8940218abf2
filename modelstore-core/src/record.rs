//! Typed records and their marshaling to and from whole documents.
//!
//! A [`ModelData`] is a record: an entity name, an identity, and the
//! record's attribute and relationship maps. Encoding is schema-agnostic
//! (the document carries whatever the record holds); decoding is
//! schema-total (every declared member is read, absent fields read as native
//! null, undeclared fields are ignored for forward-compatible reads).

use std::collections::HashMap;

use bson::{Bson, Document};

use crate::{
    codec::{
        bson_kind, decode_attribute, decode_relationship, encode_attribute, encode_relationship,
    },
    error::{ModelStoreError, ModelStoreResult},
    schema::EntityDescription,
    value::{AttributeValue, ObjectID, RelationshipValue},
};

/// The reserved document field holding the record identity.
pub const ID_FIELD: &str = "_id";

/// A typed record of a single entity.
///
/// Records carry no behavior and own their maps exclusively; they are
/// constructed either by application code (for writes) or by
/// [`ModelData::from_document`] (for reads).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    /// The owning entity's name.
    pub entity: String,
    /// The record identity.
    pub id: ObjectID,
    /// Attribute values keyed by attribute name.
    pub attributes: HashMap<String, AttributeValue>,
    /// Relationship values keyed by relationship name.
    pub relationships: HashMap<String, RelationshipValue>,
}

impl ModelData {
    /// Creates an empty record for the given entity and identity.
    pub fn new(entity: impl Into<String>, id: impl Into<ObjectID>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
            attributes: HashMap::new(),
            relationships: HashMap::new(),
        }
    }

    /// Sets an attribute value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Sets a relationship value.
    pub fn with_relationship(mut self, name: impl Into<String>, value: RelationshipValue) -> Self {
        self.relationships.insert(name.into(), value);
        self
    }

    /// Returns an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns a relationship value by name.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipValue> {
        self.relationships.get(name)
    }

    /// Encodes this record into a full document.
    ///
    /// The identity is emitted as a native string under [`ID_FIELD`], then
    /// every attribute and relationship the record holds. Callers are
    /// responsible for constructing records consistent with the schema
    /// before writing.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(ID_FIELD, Bson::String(self.id.as_str().to_string()));
        for (name, value) in &self.attributes {
            document.insert(name.clone(), encode_attribute(value));
        }
        for (name, value) in &self.relationships {
            document.insert(name.clone(), encode_relationship(value));
        }
        document
    }

    /// Decodes a stored document into a record of the given entity.
    ///
    /// The identity is read through the identity bridge
    /// ([`MissingIdentity`](ModelStoreError::MissingIdentity) if absent or
    /// unreadable). Every member the schema declares is then decoded with
    /// its declared type, an absent field reading as native null; the first
    /// failure stops the decode with the member's mismatch error. Document
    /// fields the schema does not declare are ignored.
    pub fn from_document(
        entity: &EntityDescription,
        document: &Document,
    ) -> ModelStoreResult<Self> {
        let id = document
            .get(ID_FIELD)
            .and_then(ObjectID::from_bson)
            .ok_or(ModelStoreError::MissingIdentity)?;

        let mut attributes = HashMap::with_capacity(entity.attributes.len());
        for attribute in &entity.attributes {
            let raw = document.get(&attribute.name).unwrap_or(&Bson::Null);
            let value = decode_attribute(raw, attribute.kind).ok_or_else(|| {
                ModelStoreError::AttributeTypeMismatch {
                    entity: entity.name.clone(),
                    attribute: attribute.name.clone(),
                    expected: attribute.kind,
                    found: bson_kind(raw),
                }
            })?;
            attributes.insert(attribute.name.clone(), value);
        }

        let mut relationships = HashMap::with_capacity(entity.relationships.len());
        for relationship in &entity.relationships {
            let raw = document.get(&relationship.name).unwrap_or(&Bson::Null);
            let value = decode_relationship(raw, relationship.kind).ok_or_else(|| {
                ModelStoreError::RelationshipTypeMismatch {
                    entity: entity.name.clone(),
                    relationship: relationship.name.clone(),
                    expected: relationship.kind,
                }
            })?;
            relationships.insert(relationship.name.clone(), value);
        }

        Ok(Self { entity: entity.name.clone(), id, attributes, relationships })
    }
}
