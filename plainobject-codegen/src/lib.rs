//! plainobject-codegen: Generate Swift plain object serializers from Core Data models
//!
//! This crate provides both a CLI tool and a library for generating Swift
//! code from a Core Data model document. For every entity it writes one
//! `<Entity>+CoreDataClass.swift` file containing the `NSManagedObject`
//! subclass with two methods:
//!
//! - `fillFromPlainObject(_:)` - copies a plain object into the managed object
//! - `toPlainObject()` - builds a plain object from the managed object
//!
//! The plain object type name is the entity name without its class prefix
//! (`CDPerson` -> `Person`).
//!
//! # Usage in build.rs
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.plainobject-codegen]
//! schema_file = "Model.xcdatamodeld/Model.xcdatamodel"
//! output_dir = "Sources/Generated"
//! value_type_prefix = "CD"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     plainobject_codegen::generate_from_cargo_metadata()
//!         .expect("Failed to generate serializers");
//! }
//! ```
//!
//! # Programmatic Configuration
//!
//! ```rust,ignore
//! fn main() {
//!     plainobject_codegen::CodegenBuilder::new("Model.xcdatamodel")
//!         .output_dir("Sources/Generated")
//!         .generate()
//!         .expect("Failed to generate serializers");
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! plainobject-codegen -i Model.xcdatamodel/contents -o ./Code/Cache
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

/// Main entry point for code generation
pub fn generate(config: &CodegenConfig) -> Result<()> {
    let model = load_model(config)?;
    let generator = codegen::CodeGenerator::new(config);

    if config.dry_run {
        info!("Dry run - would generate in {:?}:", config.output_dir);
        for planned in generator.plan(&model.selected)? {
            info!("  {} -> {}", planned.entity_name, planned.file_name);
        }
        return Ok(());
    }

    info!("Generating serializers in {:?}", config.output_dir);
    let written = generator.generate(&model.selected, &model.entities)?;

    info!("Code generation complete: {} files", written.len());
    Ok(())
}

/// A parsed schema together with the entities picked for generation
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Every entity in the schema, in document order
    pub entities: Vec<parser::EntityMetadata>,

    /// Entities left by the include/exclude filters, in document order
    pub selected: Vec<parser::EntityMetadata>,
}

/// Read and parse the model named by the configuration, then apply the
/// entity filters
pub fn load_model(config: &CodegenConfig) -> Result<LoadedModel> {
    let schema_path = parser::resolve_schema_path(&config.schema_file);
    info!("Parsing schema: {:?}", schema_path);

    let xml = std::fs::read_to_string(&schema_path)?;
    let entities = parser::parse_schema_with_options(&xml, config.parse_options())?;
    info!("Found {} entities", entities.len());

    let selected = filter_entities(&entities, &config.include_entities, &config.exclude_entities);
    debug!(
        "After filtering: {} entities (include={}, exclude={})",
        selected.len(),
        config.include_entities,
        config.exclude_entities
    );

    Ok(LoadedModel { entities, selected })
}

/// Filter entities based on include/exclude patterns
fn filter_entities(
    entities: &[parser::EntityMetadata],
    include: &str,
    exclude: &str,
) -> Vec<parser::EntityMetadata> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    entities
        .iter()
        .filter(|e| {
            let name = &e.name;
            let included = include_all || include_set.contains(name);
            let excluded = exclude_set.contains(name);
            included && !excluded
        })
        .cloned()
        .collect()
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the prefix stripped from entity names for plain object types
    pub fn value_type_prefix(mut self, prefix: &str) -> Self {
        self.config.value_type_prefix = prefix.to_string();
        self
    }

    /// Set the suffix appended to entity names for output files
    pub fn file_suffix(mut self, suffix: &str) -> Self {
        self.config.file_suffix = suffix.to_string();
        self
    }

    /// Set entities to include
    pub fn include_entities(mut self, entities: &[&str]) -> Self {
        self.config.include_entities = entities.join(",");
        self
    }

    /// Set entities to exclude
    pub fn exclude_entities(mut self, entities: &[&str]) -> Self {
        self.config.exclude_entities = entities.join(",");
        self
    }

    /// Enable or disable the "owner" relationship-name convention
    pub fn legacy_owner_detection(mut self, enabled: bool) -> Self {
        self.config.legacy_owner_detection = enabled;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Generate the code
    pub fn generate(self) -> Result<()> {
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.plainobject-codegen]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the Core Data model (required)
    schema_file: Option<String>,

    /// Output directory (optional, defaults to `$OUT_DIR/PlainObjects`)
    output_dir: Option<String>,

    /// Plain object type prefix (optional)
    value_type_prefix: Option<String>,

    /// Output file suffix (optional)
    file_suffix: Option<String>,

    /// Entities to include (optional, defaults to all)
    #[serde(default)]
    include_entities: Vec<String>,

    /// Entities to exclude (optional)
    #[serde(default)]
    exclude_entities: Vec<String>,

    /// Whether "owner" in a relationship name marks the owning side
    legacy_owner_detection: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    #[serde(rename = "plainobject-codegen")]
    plainobject_codegen: Option<CargoMetadataConfig>,
}

/// Generate code from `[package.metadata.plainobject-codegen]` in Cargo.toml
///
/// ```rust,ignore
/// // build.rs
/// fn main() {
///     plainobject_codegen::generate_from_cargo_metadata()
///         .expect("Failed to generate serializers");
/// }
/// ```
pub fn generate_from_cargo_metadata() -> Result<()> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;

    let cargo_toml: CargoToml = toml::from_str(&cargo_toml_content).map_err(|e| {
        CodegenError::ConfigError(format!(
            "Failed to parse {}: {}",
            cargo_toml_path.display(),
            e
        ))
    })?;

    let metadata_config = cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.plainobject_codegen)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.plainobject-codegen] section in Cargo.toml".into(),
            )
        })?;

    let schema_file = metadata_config.schema_file.ok_or_else(|| {
        CodegenError::ConfigError(
            "schema_file is required in [package.metadata.plainobject-codegen]".into(),
        )
    })?;

    // Resolve schema_file relative to manifest dir
    let schema_path = PathBuf::from(&manifest_dir).join(&schema_file);

    let mut builder = CodegenBuilder::new(&schema_path);

    if let Some(output_dir) = metadata_config.output_dir {
        builder = builder.output_dir(PathBuf::from(&manifest_dir).join(output_dir));
    } else {
        let out_dir = std::env::var("OUT_DIR").map(PathBuf::from).map_err(|_| {
            CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
        })?;
        builder = builder.output_dir(out_dir.join("PlainObjects"));
    }

    if let Some(prefix) = metadata_config.value_type_prefix {
        builder = builder.value_type_prefix(&prefix);
    }
    if let Some(suffix) = metadata_config.file_suffix {
        builder = builder.file_suffix(&suffix);
    }
    if let Some(enabled) = metadata_config.legacy_owner_detection {
        builder = builder.legacy_owner_detection(enabled);
    }

    // Apply entity filters
    if !metadata_config.include_entities.is_empty() {
        let entities: Vec<&str> = metadata_config
            .include_entities
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.include_entities(&entities);
    }
    if !metadata_config.exclude_entities.is_empty() {
        let entities: Vec<&str> = metadata_config
            .exclude_entities
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.exclude_entities(&entities);
    }

    // Emit rerun-if-changed
    println!("cargo:rerun-if-changed={}", schema_path.display());
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    builder.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MODEL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<model type="com.apple.IDECoreDataModeler.DataModel">
    <entity name="CDPerson" syncable="YES">
        <attribute name="age" attributeType="Integer 16"/>
        <relationship name="pets" toMany="YES" destinationEntity="CDPet"/>
    </entity>
    <entity name="CDPet" syncable="YES">
        <attribute name="nickname" attributeType="String"/>
        <relationship name="owner" maxCount="1" destinationEntity="CDPerson"/>
    </entity>
    <entity name="CDAudit" syncable="YES"/>
</model>"#;

    fn write_model(dir: &Path, xml: &str) -> PathBuf {
        let path = dir.join("contents");
        fs::write(&path, xml).unwrap();
        path
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_builder_generates_files() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), MODEL);
        let out = dir.path().join("out");

        CodegenBuilder::new(&schema).output_dir(&out).generate().unwrap();

        assert_eq!(
            file_names(&out),
            vec![
                "CDAudit+CoreDataClass.swift",
                "CDPerson+CoreDataClass.swift",
                "CDPet+CoreDataClass.swift",
            ]
        );
    }

    #[test]
    fn test_builder_accepts_model_bundle_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = dir.path().join("Model.xcdatamodel");
        fs::create_dir(&bundle).unwrap();
        write_model(&bundle, MODEL);
        let out = dir.path().join("out");

        CodegenBuilder::new(&bundle).output_dir(&out).generate().unwrap();
        assert_eq!(file_names(&out).len(), 3);
    }

    #[test]
    fn test_builder_filters_and_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), MODEL);
        let out = dir.path().join("out");

        CodegenBuilder::new(&schema)
            .output_dir(&out)
            .exclude_entities(&["CDAudit"])
            .file_suffix(".swift")
            .generate()
            .unwrap();

        assert_eq!(file_names(&out), vec!["CDPerson.swift", "CDPet.swift"]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), MODEL);
        let out = dir.path().join("out");

        CodegenBuilder::new(&schema)
            .output_dir(&out)
            .dry_run()
            .generate()
            .unwrap();

        assert!(!out.exists());
    }

    #[test]
    fn test_regeneration_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), MODEL);
        let out = dir.path().join("out");

        CodegenBuilder::new(&schema).output_dir(&out).generate().unwrap();
        let first = fs::read(out.join("CDPerson+CoreDataClass.swift")).unwrap();

        CodegenBuilder::new(&schema).output_dir(&out).generate().unwrap();
        let second = fs::read(out.join("CDPerson+CoreDataClass.swift")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_schema_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CodegenBuilder::new(dir.path().join("missing.xml"))
            .output_dir(dir.path().join("out"))
            .generate()
            .unwrap_err();
        assert!(matches!(err, CodegenError::IoError(_)));
    }

    #[test]
    fn test_malformed_schema_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), "<model><entity name=\"CDA\">");
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("Old.swift"), "old").unwrap();

        let err = CodegenBuilder::new(&schema)
            .output_dir(&out)
            .generate()
            .unwrap_err();
        assert!(matches!(err, CodegenError::SchemaParseError(_)));
        assert_eq!(file_names(&out), vec!["Old.swift"]);
    }

    #[test]
    fn test_filter_entities() {
        let entities = parser::parse_schema(MODEL).unwrap();

        let filtered = filter_entities(&entities, "CDPerson, CDPet", "CDPet");
        let names: Vec<&str> = filtered.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CDPerson"]);

        let filtered = filter_entities(&entities, "*", "");
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_excluded_entities_stay_in_model() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), MODEL);
        let mut config = CodegenConfig::default_with_schema(schema);
        config.exclude_entities = "CDPet".to_string();

        let model = load_model(&config).unwrap();
        let names: Vec<&str> = model.selected.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CDPerson", "CDAudit"]);
        assert_eq!(model.entities.len(), 3);

        // CDPerson.pets targets the excluded CDPet, which is still a known entity
        let person = &model.selected[0];
        assert!(codegen::unresolved_targets(person, &model.entities).is_empty());
        assert_eq!(codegen::unresolved_targets(person, &model.selected).len(), 1);
    }

    #[test]
    fn test_excluded_target_is_emitted_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_model(dir.path(), MODEL);
        let out = dir.path().join("out");

        CodegenBuilder::new(&schema)
            .output_dir(&out)
            .exclude_entities(&["CDPet"])
            .generate()
            .unwrap();

        let person = fs::read_to_string(out.join("CDPerson+CoreDataClass.swift")).unwrap();
        assert!(person.contains("SerializationHelper<CDPet>.fromPlainObjectArray(itemsMP"));
        assert!(!out.join("CDPet+CoreDataClass.swift").exists());
    }
}
