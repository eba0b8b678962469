//! Core Data model parser module using roxmltree

mod metadata;
mod schema_parser;

pub use metadata::*;
pub use schema_parser::*;
