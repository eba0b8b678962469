//! CLI entry point for plainobject-codegen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plainobject_codegen::codegen::{to_value_type_name, unresolved_targets, AttributeKind};
use plainobject_codegen::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "plainobject-codegen")]
#[command(about = "Generate Swift NSManagedObject <-> plain object serializers from a Core Data model")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Core Data model: `contents` file or `.xcdatamodel` bundle (overrides config)
    #[arg(short = 'i', long = "ifile", visible_alias = "schema")]
    schema: Option<PathBuf>,

    /// Output directory, cleared before generation (overrides config)
    #[arg(short = 'o', long = "ofile", visible_alias = "output")]
    output: Option<PathBuf>,

    /// Entity-name prefix stripped for plain object types (overrides config)
    #[arg(long)]
    prefix: Option<String>,

    /// Dry run - show what would be generated without touching the output directory
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate serializers for every entity (default)
    Generate,
    /// Inspect schema (show parsed entities for debugging)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = CodegenConfig::load(cli.config.as_deref())?;

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides
    if let Some(schema) = cli.schema {
        config.schema_file = schema;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(prefix) = cli.prefix {
        config.value_type_prefix = prefix;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Validate configuration
    config.validate()?;

    if let Some(Commands::Inspect) = &cli.command {
        return inspect_schema(&config);
    }

    info!("Generating code from schema: {:?}", config.schema_file);

    plainobject_codegen::generate(&config)?;

    info!("Code generation completed successfully");
    Ok(())
}

fn inspect_schema(config: &CodegenConfig) -> Result<()> {
    let model = plainobject_codegen::load_model(config)?;

    println!(
        "Parsed {} entities ({} selected):\n",
        model.entities.len(),
        model.selected.len()
    );
    for entity in &model.selected {
        println!(
            "Entity: {} (plain object: {})",
            entity.name,
            to_value_type_name(&entity.name, &config.value_type_prefix)
        );
        if !entity.attributes.is_empty() {
            println!("  Attributes:");
            for attr in &entity.attributes {
                let optional = if attr.optional { " optional" } else { "" };
                let kind = match AttributeKind::resolve(&attr.kind) {
                    AttributeKind::Other(tag) => tag,
                    integer => format!("{:?}, exported as Int", integer),
                };
                println!("    - {}: {}{}", attr.name, kind, optional);
            }
        }
        if !entity.relationships.is_empty() {
            let unresolved = unresolved_targets(entity, &model.entities);
            println!("  Relationships:");
            for rel in &entity.relationships {
                let cardinality = match (rel.to_many, rel.ordered) {
                    (true, true) => "to-many ordered",
                    (true, false) => "to-many",
                    _ => "to-one",
                };
                let owner = if !rel.is_serialized() {
                    " (owner side, skipped)"
                } else {
                    ""
                };
                let unknown = if unresolved.iter().any(|r| r.name == rel.name) {
                    " (unknown target)"
                } else {
                    ""
                };
                println!(
                    "    - {} -> {} [{}]{}{}",
                    rel.name, rel.target_entity, cardinality, owner, unknown
                );
            }
        }
        println!();
    }

    Ok(())
}
