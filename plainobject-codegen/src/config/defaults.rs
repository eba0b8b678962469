//! Default configuration values - single source of truth

/// Default include entities pattern (all entities)
pub const INCLUDE_ENTITIES: &str = "*";

/// Default exclude entities pattern (none)
pub const EXCLUDE_ENTITIES: &str = "";

/// Default output directory for generated Swift files
pub const OUTPUT_DIR: &str = "./Code/Cache";

/// Entity-name prefix stripped to get the plain object type name
pub const VALUE_TYPE_PREFIX: &str = "CD";

/// Suffix appended to the entity name to form the output file name
pub const FILE_SUFFIX: &str = "+CoreDataClass.swift";

/// Whether "owner" in a relationship name marks the owning side
pub const LEGACY_OWNER_DETECTION: bool = true;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;
