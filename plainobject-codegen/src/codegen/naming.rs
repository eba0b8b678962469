//! Naming utilities for code generation

/// Marker substring of the legacy owning-side naming convention
const LEGACY_OWNER_MARKER: &str = "OWNER";

/// Convert an entity name to its plain object type name by stripping the
/// model's class prefix, e.g. "CDPerson" -> "Person".
///
/// Names without the prefix are returned unchanged, as are names that
/// consist of the prefix alone.
pub fn to_value_type_name(entity_name: &str, prefix: &str) -> String {
    match entity_name.strip_prefix(prefix) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => entity_name.to_string(),
    }
}

/// Convert an entity name to its generated file name
/// e.g., "CDPerson" + "+CoreDataClass.swift" -> "CDPerson+CoreDataClass.swift"
pub fn to_output_file_name(entity_name: &str, suffix: &str) -> String {
    format!("{}{}", entity_name, suffix)
}

/// Key under which two file names clash on a case-insensitive file system
pub fn collision_key(file_name: &str) -> String {
    file_name.to_ascii_lowercase()
}

/// Legacy owning-side detection: the relationship name contains "owner"
/// in any letter case.
pub fn is_legacy_owner_name(relationship_name: &str) -> bool {
    relationship_name
        .to_ascii_uppercase()
        .contains(LEGACY_OWNER_MARKER)
}

/// Wrap text in an Xcode placeholder token (`<#...#>`) left for manual completion
pub fn placeholder(text: &str) -> String {
    format!("<#{}#>", text)
}
