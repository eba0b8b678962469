//! Configuration settings for plainobject-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::codegen::EmitOptions;
use crate::error::{CodegenError, Result};
use crate::parser::ParseOptions;

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the Core Data model (`contents` file or `.xcdatamodel` bundle)
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Output directory for generated Swift files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Entities to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_entities")]
    pub include_entities: String,

    /// Entities to exclude (comma-separated)
    #[serde(default = "default_exclude_entities")]
    pub exclude_entities: String,

    /// Prefix stripped from entity names to get plain object type names
    #[serde(default = "default_value_type_prefix")]
    pub value_type_prefix: String,

    /// Suffix appended to entity names to get output file names
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Treat relationships whose name contains "owner" as the owning side
    /// when the model has no explicit `isOwningSide` entry
    #[serde(default = "default_legacy_owner_detection")]
    pub legacy_owner_detection: bool,

    /// Dry run mode - preview without touching the output directory
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_include_entities() -> String {
    defaults::INCLUDE_ENTITIES.to_string()
}
fn default_exclude_entities() -> String {
    defaults::EXCLUDE_ENTITIES.to_string()
}
fn default_value_type_prefix() -> String {
    defaults::VALUE_TYPE_PREFIX.to_string()
}
fn default_file_suffix() -> String {
    defaults::FILE_SUFFIX.to_string()
}
fn default_legacy_owner_detection() -> bool {
    defaults::LEGACY_OWNER_DETECTION
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            output_dir: default_output_dir(),
            include_entities: default_include_entities(),
            exclude_entities: default_exclude_entities(),
            value_type_prefix: default_value_type_prefix(),
            file_suffix: default_file_suffix(),
            legacy_owner_detection: default_legacy_owner_detection(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name("plainobject-codegen").required(false));
        }

        // Override with environment variables (PLAINOBJECT_CODEGEN__OUTPUT_DIR, ...)
        builder = builder.add_source(
            Environment::with_prefix("PLAINOBJECT_CODEGEN")
                .prefix_separator("__")
                .separator("__"),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Options handed to the model parser
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            legacy_owner_detection: self.legacy_owner_detection,
        }
    }

    /// Options handed to the code emitter
    pub fn emit_options(&self) -> EmitOptions<'_> {
        EmitOptions {
            value_type_prefix: &self.value_type_prefix,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "output_dir must not be empty".into(),
            ));
        }

        if self.file_suffix.is_empty() || self.file_suffix.contains(&['/', '\\'][..]) {
            return Err(CodegenError::ValidationError(format!(
                "file_suffix must be a non-empty file name fragment, got {:?}",
                self.file_suffix
            )));
        }

        Ok(())
    }
}
