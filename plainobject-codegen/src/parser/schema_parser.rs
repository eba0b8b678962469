//! Core Data model parser using roxmltree

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use super::metadata::*;
use crate::codegen::is_legacy_owner_name;
use crate::error::{CodegenError, Result};

/// User-info key that marks a relationship as the owning side explicitly
pub const OWNING_SIDE_KEY: &str = "isOwningSide";

/// Options controlling how a model document is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fall back to the "OWNER" name convention when a relationship has no
    /// explicit `isOwningSide` user-info entry
    pub legacy_owner_detection: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            legacy_owner_detection: true,
        }
    }
}

/// Resolve the model document for a schema path.
///
/// A `.xcdatamodel` bundle is a directory holding the XML in `contents`.
pub fn resolve_schema_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join("contents")
    } else {
        path.to_path_buf()
    }
}

/// Parse a Core Data model document into entity metadata
pub fn parse_schema(xml: &str) -> Result<Vec<EntityMetadata>> {
    parse_schema_with_options(xml, ParseOptions::default())
}

/// Parse a Core Data model document with explicit options
pub fn parse_schema_with_options(xml: &str, options: ParseOptions) -> Result<Vec<EntityMetadata>> {
    let doc = Document::parse(xml)?;

    doc.root_element()
        .children()
        .filter(|n| is_element(n, "entity"))
        .map(|node| extract_entity_metadata(node, options))
        .collect()
}

/// Extract entity metadata from an `<entity>` element
fn extract_entity_metadata(node: Node<'_, '_>, options: ParseOptions) -> Result<EntityMetadata> {
    let name = required_attribute(node, "name", || {
        format!("<entity> at {} has no `name`", position(node))
    })?;

    let mut attributes = Vec::new();
    let mut relationships = Vec::new();

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "attribute" => attributes.push(extract_attribute_metadata(child, &name)?),
            "relationship" => {
                relationships.push(extract_relationship_metadata(child, &name, options)?)
            }
            _ => {}
        }
    }

    Ok(EntityMetadata {
        name,
        attributes,
        relationships,
    })
}

/// Extract attribute metadata from an `<attribute>` element
fn extract_attribute_metadata(node: Node<'_, '_>, entity: &str) -> Result<AttributeMetadata> {
    let name = required_attribute(node, "name", || {
        format!(
            "<attribute> at {} in entity `{}` has no `name`",
            position(node),
            entity
        )
    })?;

    Ok(AttributeMetadata {
        name,
        kind: node.attribute("attributeType").unwrap_or_default().to_string(),
        optional: yes(node.attribute("optional")),
    })
}

/// Extract relationship metadata from a `<relationship>` element
fn extract_relationship_metadata(
    node: Node<'_, '_>,
    entity: &str,
    options: ParseOptions,
) -> Result<RelationshipMetadata> {
    let name = required_attribute(node, "name", || {
        format!(
            "<relationship> at {} in entity `{}` has no `name`",
            position(node),
            entity
        )
    })?;
    let target_entity = required_attribute(node, "destinationEntity", || {
        format!(
            "relationship `{}.{}` has no `destinationEntity`",
            entity, name
        )
    })?;

    let to_many = yes(node.attribute("toMany"));
    let ordered = yes(node.attribute("ordered"));
    if ordered && !to_many {
        return Err(CodegenError::SchemaShapeError(format!(
            "relationship `{}.{}` is ordered but not to-many",
            entity, name
        )));
    }

    let owner_side = match user_info_value(node, OWNING_SIDE_KEY) {
        Some(value) => yes(Some(value)),
        None => options.legacy_owner_detection && is_legacy_owner_name(&name),
    };

    Ok(RelationshipMetadata {
        name,
        target_entity,
        to_many,
        ordered,
        owner_side,
    })
}

/// Look up `<userInfo><entry key=.. value=../></userInfo>` on an element
fn user_info_value<'a>(node: Node<'a, '_>, key: &str) -> Option<&'a str> {
    node.children()
        .filter(|n| is_element(n, "userInfo"))
        .flat_map(|info| info.children())
        .filter(|n| is_element(n, "entry"))
        .find(|entry| entry.attribute("key") == Some(key))
        .and_then(|entry| entry.attribute("value"))
}

fn required_attribute(
    node: Node<'_, '_>,
    attribute: &str,
    message: impl FnOnce() -> String,
) -> Result<String> {
    node.attribute(attribute)
        .map(str::to_string)
        .ok_or_else(|| CodegenError::SchemaShapeError(message()))
}

fn is_element(node: &Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

/// Core Data booleans are spelled "YES" / "NO"
fn yes(value: Option<&str>) -> bool {
    value == Some("YES")
}

fn position(node: Node<'_, '_>) -> String {
    let pos = node.document().text_pos_at(node.range().start);
    format!("line {}, column {}", pos.row, pos.col)
}
