//! Configuration for plainobject-codegen

pub mod defaults;
mod settings;

pub use settings::*;
