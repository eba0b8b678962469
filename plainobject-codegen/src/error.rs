//! Error types for plainobject-codegen

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for plainobject-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Failed to parse schema: {0}")]
    SchemaParseError(String),

    #[error("Invalid schema: {0}")]
    SchemaShapeError(String),

    #[error("Failed to write output {}: {source}", .path.display())]
    OutputIoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CodegenError {
    /// Wrap an IO error raised while touching the output location
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodegenError::OutputIoError {
            path: path.into(),
            source,
        }
    }
}

impl From<roxmltree::Error> for CodegenError {
    fn from(err: roxmltree::Error) -> Self {
        CodegenError::SchemaParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
