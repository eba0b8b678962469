//! Main code generator orchestrator

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CodegenConfig;
use crate::error::{CodegenError, Result};
use crate::parser::EntityMetadata;

use super::naming::{collision_key, to_output_file_name};
use super::serializer_generator::generate_entity_source;

/// One file the generator is going to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Entity the file is generated from
    pub entity_name: String,

    /// File name inside the output directory
    pub file_name: String,
}

/// Main code generator that resets the output directory and writes one
/// serializer file per entity
pub struct CodeGenerator<'a> {
    config: &'a CodegenConfig,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator with the given configuration
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self { config }
    }

    /// Plan, reset the output directory, and write one file per entity in
    /// `selected`. `model` is every entity of the schema, filtered or not,
    /// and is what relationship targets are resolved against.
    ///
    /// Nothing on disk is touched before the plan has been checked, so a
    /// colliding model leaves the output directory as it was.
    pub fn generate(
        &self,
        selected: &[EntityMetadata],
        model: &[EntityMetadata],
    ) -> Result<Vec<PathBuf>> {
        let plan = plan_outputs(selected, &self.config.file_suffix)?;
        let output_dir = &self.config.output_dir;

        reset_output_dir(output_dir)?;

        let options = self.config.emit_options();
        let mut written = Vec::with_capacity(plan.len());

        for (entity, planned) in selected.iter().zip(&plan) {
            let path = output_dir.join(&planned.file_name);
            debug!("Generating serializer {} -> {}", entity.name, planned.file_name);

            let code = generate_entity_source(entity, model, &options);
            fs::write(&path, code).map_err(|e| CodegenError::output(&path, e))?;
            written.push(path);
        }

        Ok(written)
    }

    /// The files a run would write, without touching the disk
    pub fn plan(&self, entities: &[EntityMetadata]) -> Result<Vec<PlannedFile>> {
        plan_outputs(entities, &self.config.file_suffix)
    }
}

/// Derive output file names in entity order and reject collisions
pub fn plan_outputs(entities: &[EntityMetadata], suffix: &str) -> Result<Vec<PlannedFile>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut plan = Vec::with_capacity(entities.len());

    for entity in entities {
        let file_name = to_output_file_name(&entity.name, suffix);

        if let Some(previous) = seen.insert(collision_key(&file_name), &entity.name) {
            return Err(CodegenError::SchemaShapeError(format!(
                "entities `{}` and `{}` both map to output file {}",
                previous, entity.name, file_name
            )));
        }

        plan.push(PlannedFile {
            entity_name: entity.name.clone(),
            file_name,
        });
    }

    Ok(plan)
}

/// Create the output directory if needed and delete the files directly
/// inside it. Subdirectories are left alone.
pub fn reset_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| CodegenError::output(dir, e))?;

    let entries = fs::read_dir(dir).map_err(|e| CodegenError::output(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CodegenError::output(dir, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| CodegenError::output(&path, e))?;

        if file_type.is_dir() {
            debug!("Keeping subdirectory {}", path.display());
            continue;
        }

        debug!("Removing {}", path.display());
        fs::remove_file(&path).map_err(|e| CodegenError::output(&path, e))?;
    }

    Ok(())
}
