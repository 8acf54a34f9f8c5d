//! Core utilities and types for the ramlgen code generator.
//!
//! This crate provides the file-writing rules and string helpers shared
//! by the RAML model, the emission engine and the language backends.

mod file;
mod utils;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult, ensure_dir};
// String utilities
pub use utils::{
    denormalize_identifier, lower_first, normalize_identifier, to_camel_case, to_pascal_case,
    to_snake_case, upper_first,
};
