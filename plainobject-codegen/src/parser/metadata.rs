//! Metadata structures for a parsed Core Data model

use serde::{Deserialize, Serialize};

/// Metadata for a Core Data entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Entity name (the `NSManagedObject` subclass name)
    pub name: String,

    /// Attributes, in document order
    pub attributes: Vec<AttributeMetadata>,

    /// Relationships, in document order
    pub relationships: Vec<RelationshipMetadata>,
}

/// Metadata for a scalar attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    /// Attribute name, shared by the managed object and the plain object
    pub name: String,

    /// Raw `attributeType` tag (e.g. "Integer 16", "String"); empty if absent
    pub kind: String,

    /// Whether the attribute is marked optional in the model
    pub optional: bool,
}

/// Metadata for a relationship to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipMetadata {
    /// Relationship name
    pub name: String,

    /// Destination entity name, as written in the model (not resolved)
    pub target_entity: String,

    /// Whether this is a to-many relationship
    pub to_many: bool,

    /// Whether a to-many relationship is ordered (`NSOrderedSet`)
    pub ordered: bool,

    /// Whether this is the owning side of the edge; its serialization is
    /// driven from the other side and nothing is emitted for it here
    pub owner_side: bool,
}

impl RelationshipMetadata {
    /// Whether the serializer emits anything for this relationship
    pub fn is_serialized(&self) -> bool {
        self.to_many || !self.owner_side
    }
}
