//! Code generation module

mod attribute_kind;
mod code_generator;
mod naming;
mod serializer_generator;

pub use attribute_kind::*;
pub use code_generator::*;
pub use naming::*;
pub use serializer_generator::*;
