//! Serializer generator - emits the `NSManagedObject` <-> plain object
//! conversion methods for one entity

use std::collections::HashSet;

use tracing::warn;

use crate::config::defaults;
use crate::parser::{AttributeMetadata, EntityMetadata, RelationshipMetadata};

use super::attribute_kind::AttributeKind;
use super::naming::{placeholder, to_value_type_name};

/// Modules imported by every generated file
const IMPORTS: &[&str] = &["Foundation", "CoreData", "PlainObjectSerializer"];

/// Protocols adopted by every generated class
const CONFORMANCES: &str = "NSManagedObject, PlainObjectSerializer, CoreDataFetchable";

/// Helper type providing the bulk array conversions
const SERIALIZATION_HELPER: &str = "SerializationHelper";

/// Knobs the emitter takes from configuration
#[derive(Debug, Clone, Copy)]
pub struct EmitOptions<'a> {
    /// Prefix stripped from entity names to get plain object type names
    pub value_type_prefix: &'a str,
}

impl Default for EmitOptions<'static> {
    fn default() -> Self {
        Self {
            value_type_prefix: defaults::VALUE_TYPE_PREFIX,
        }
    }
}

/// Generate the complete Swift source file for one entity.
///
/// `entities` is the whole parsed model, not just the entities selected for
/// generation; it is only consulted to report relationship targets that name
/// no known entity. Such names are still emitted as written.
pub fn generate_entity_source(
    entity: &EntityMetadata,
    entities: &[EntityMetadata],
    options: &EmitOptions<'_>,
) -> String {
    report_unresolved_targets(entity, entities);

    let class_name = &entity.name;
    let value_type = to_value_type_name(class_name, options.value_type_prefix);

    let mut code = String::new();

    for module in IMPORTS {
        code.push_str(&format!("import {}\n", module));
    }

    code.push_str(&format!("\n@objc({})\n", class_name));
    code.push_str(&format!(
        "public class {} : {} {{\n\n",
        class_name, CONFORMANCES
    ));
    code.push_str(&format!(
        "\tpublic static let entityName: String = String(describing: {}.self)\n\n",
        class_name
    ));
    code.push_str(&format!("\ttypealias T = {}\n\n", value_type));

    // fillFromPlainObject
    code.push_str("\tpublic func fillFromPlainObject(_ plainObject: T) {\n");
    code.push_str("\n\t\tguard let context = managedObjectContext else {\n");
    code.push_str("\t\t\treturn\n");
    code.push_str("\t\t}\n\n");
    code.push_str(&generate_import_body(entity));
    code.push_str("\t}\n\n");

    // toPlainObject
    code.push_str(&format!(
        "\tpublic func toPlainObject() -> {}.T {{\n",
        class_name
    ));
    code.push_str(&format!("\t\tvar plainObject = {}()\n\n", value_type));
    code.push_str(&generate_export_body(entity));
    code.push_str("\n\t\treturn plainObject\n");
    code.push_str("\t}\n");

    code.push_str("}\n");

    code
}

/// Statements of `fillFromPlainObject`: attributes first, then relationships
pub fn generate_import_body(entity: &EntityMetadata) -> String {
    let mut code = String::new();

    for attr in &entity.attributes {
        code.push_str(&generate_attribute_import(attr));
    }

    for rel in &entity.relationships {
        if rel.to_many {
            code.push_str(&generate_to_many_import(rel));
        } else if !rel.owner_side {
            code.push_str(&generate_to_one_import(rel));
        }
    }

    code
}

/// Statements of `toPlainObject`: attributes first, then relationships
pub fn generate_export_body(entity: &EntityMetadata) -> String {
    let mut code = String::new();

    for attr in &entity.attributes {
        code.push_str(&generate_attribute_export(attr));
    }

    for rel in &entity.relationships {
        if rel.to_many {
            code.push_str(&generate_to_many_export(rel));
        } else if !rel.owner_side {
            code.push_str(&generate_to_one_export(rel));
        }
    }

    code
}

fn generate_attribute_import(attr: &AttributeMetadata) -> String {
    format!("\t\t{0} = plainObject.{0}\n", attr.name)
}

fn generate_attribute_export(attr: &AttributeMetadata) -> String {
    let kind = AttributeKind::resolve(&attr.kind);
    format!(
        "\t\tplainObject.{} = {}\n",
        attr.name,
        kind.export_expression(&attr.name)
    )
}

/// Replace the whole collection; each new child gets its back-reference set
/// in the init closure. The inverse name is left as a placeholder.
fn generate_to_many_import(rel: &RelationshipMetadata) -> String {
    let name = &rel.name;
    let target = &rel.target_entity;
    let method = if rel.ordered {
        "fromPlainObjectArrayOrdered"
    } else {
        "fromPlainObjectArray"
    };

    let mut code = String::new();
    code.push_str(&format!("\n\t\tdeleteEntities(&{})\n", name));
    code.push_str(&format!("\t\tif let itemsMP = plainObject.{} {{\n\n", name));
    code.push_str(&format!(
        "\t\t\t{} = {}<{}>.{}(itemsMP, context: context, initClosure: {{\n",
        name, SERIALIZATION_HELPER, target, method
    ));
    code.push_str(&format!("\t\t\t\t(item: {}) in\n\n", target));
    code.push_str(&format!(
        "\t\t\t\titem.{} = self\n",
        placeholder("reverse relation")
    ));
    code.push_str("\t\t\t})\n");
    code.push_str("\t\t}\n");
    code
}

/// Drop the current child (placeholder: the right removal call depends on
/// the inverse cardinality), then look up or create the child and recurse.
fn generate_to_one_import(rel: &RelationshipMetadata) -> String {
    let name = &rel.name;

    let mut code = String::new();
    code.push_str(&format!(
        "\n\t\t{}\n",
        placeholder(&format!("{}?.deleteEntity()", name))
    ));
    code.push_str(&format!("\t\tif let item = plainObject.{} {{\n", name));
    code.push_str(&format!(
        "\t\t\t{} = lazyCreateUniqueEntity(by: item, inContext: context)\n",
        name
    ));
    code.push_str(&format!("\t\t\t{}?.fillFromPlainObject(item)\n", name));
    code.push_str("\t\t}\n");
    code
}

fn generate_to_many_export(rel: &RelationshipMetadata) -> String {
    let name = &rel.name;
    let target = &rel.target_entity;

    let mut code = String::new();
    code.push_str(&format!(
        "\n\t\tif let items = {} as? Set<{}> {{\n",
        name, target
    ));
    code.push_str(&format!(
        "\t\t\tplainObject.{} = {}<{}>.toPlainObjectArray(items)\n",
        name, SERIALIZATION_HELPER, target
    ));
    code.push_str("\t\t}\n");
    code
}

fn generate_to_one_export(rel: &RelationshipMetadata) -> String {
    format!("\n\t\tplainObject.{0} = {0}?.toPlainObject()\n", rel.name)
}

/// Serialized relationships of `entity` whose target names no entity in
/// `entities`
pub fn unresolved_targets<'e>(
    entity: &'e EntityMetadata,
    entities: &[EntityMetadata],
) -> Vec<&'e RelationshipMetadata> {
    let known: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();

    entity
        .relationships
        .iter()
        .filter(|rel| rel.is_serialized() && !known.contains(rel.target_entity.as_str()))
        .collect()
}

fn report_unresolved_targets(entity: &EntityMetadata, entities: &[EntityMetadata]) {
    for rel in unresolved_targets(entity, entities) {
        warn!(
            "{}.{} targets unknown entity `{}`; emitting it unchanged",
            entity.name, rel.name, rel.target_entity
        );
    }
}
