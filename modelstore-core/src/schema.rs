//! Entity schema descriptors consumed by the translation core.
//!
//! Entities, attributes, and relationships are described by immutable value
//! structs supplied by the caller. The translation core only reads them; it
//! never owns or mutates schema state. All descriptors are serde-derived so a
//! model can be loaded from configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar type of an entity attribute.
///
/// Drives codec dispatch: the declared type, never the raw stored value,
/// selects how a native value is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    Int16,
    Int32,
    Int64,
    Bool,
    Date,
    Double,
    Float,
    String,
    Data,
    Uuid,
    Url,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::Int16 => "int16",
            AttributeType::Int32 => "int32",
            AttributeType::Int64 => "int64",
            AttributeType::Bool => "bool",
            AttributeType::Date => "date",
            AttributeType::Double => "double",
            AttributeType::Float => "float",
            AttributeType::String => "string",
            AttributeType::Data => "data",
            AttributeType::Uuid => "uuid",
            AttributeType::Url => "url",
        };
        f.write_str(name)
    }
}

/// Cardinality of an entity relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    /// A reference to a single record.
    ToOne,
    /// An ordered reference to many records.
    ToMany,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationshipType::ToOne => "toOne",
            RelationshipType::ToMany => "toMany",
        })
    }
}

/// A scalar-typed field of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescription {
    /// The attribute identifier, used as the document field name.
    pub name: String,
    /// The declared scalar type.
    pub kind: AttributeType,
}

/// A reference field of an entity pointing to other records by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDescription {
    /// The relationship identifier, used as the document field name.
    pub name: String,
    /// The declared cardinality.
    pub kind: RelationshipType,
}

/// A named record type with a fixed attribute/relationship schema.
///
/// Member lists are ordered; decode emits every declared member and encode is
/// driven by the record contents alone.
///
/// # Example
///
/// ```ignore
/// use modelstore_core::schema::{AttributeType, EntityDescription, RelationshipType};
///
/// let person = EntityDescription::new("Person")
///     .with_attribute("name", AttributeType::String)
///     .with_attribute("age", AttributeType::Int16)
///     .with_relationship("events", RelationshipType::ToMany);
/// assert_eq!(person.collection_name(), "persons");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescription {
    /// The entity name, unique within a model.
    pub name: String,
    /// Declared attributes, in order.
    pub attributes: Vec<AttributeDescription>,
    /// Declared relationships, in order.
    pub relationships: Vec<RelationshipDescription>,
}

impl EntityDescription {
    /// Creates an entity description with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Appends an attribute declaration.
    pub fn with_attribute(mut self, name: impl Into<String>, kind: AttributeType) -> Self {
        self.attributes.push(AttributeDescription { name: name.into(), kind });
        self
    }

    /// Appends a relationship declaration.
    pub fn with_relationship(mut self, name: impl Into<String>, kind: RelationshipType) -> Self {
        self.relationships
            .push(RelationshipDescription { name: name.into(), kind });
        self
    }

    /// Looks up a declared attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescription> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Looks up a declared relationship by name.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescription> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Derives the backing collection name for this entity.
    ///
    /// The derivation is part of the storage contract and must stay stable
    /// across versions: the lower-cased entity name with an `s` suffix.
    pub fn collection_name(&self) -> String {
        self.name.to_lowercase() + "s"
    }
}

/// An immutable set of entity descriptions, looked up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    entities: Vec<EntityDescription>,
}

impl Model {
    /// Creates a model from a list of entity descriptions.
    pub fn new(entities: impl IntoIterator<Item = EntityDescription>) -> Self {
        Self { entities: entities.into_iter().collect() }
    }

    /// Looks up an entity description by name.
    pub fn entity(&self, name: &str) -> Option<&EntityDescription> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Returns all entity descriptions, in declaration order.
    pub fn entities(&self) -> &[EntityDescription] {
        &self.entities
    }
}
