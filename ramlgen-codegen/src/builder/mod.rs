//! Code generation building blocks.
//!
//! - [`CodeBuilder`] - Fluent API for building indented code
//! - [`Indent`] - Indentation unit of a target language

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
