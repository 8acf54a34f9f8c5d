//! Shared code generation engine for the ramlgen API generator.
//!
//! This crate provides the language-agnostic side of code emission, used by
//! the language backends (e.g., `ramlgen-codegen-go`).
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, Indent)
//! - [`generation`] - Output management (FileRegistry, ImportCollector)
//! - [`language`] - Language-specific abstractions (LanguageCodegen, TypeMapper, etc.)
//! - [`paths`] - URI parameters, route expressions and method names
//!
//! A backend implements [`Backend`]; [`plan`] drives it over a resolved API
//! and returns the files to write.

mod backend;
pub mod builder;
mod descriptors;
mod error;
pub mod generation;
pub mod language;
pub mod paths;

pub use backend::{Backend, EmitContext, GenerateOptions, Target, generate, plan, preview};
pub use builder::CodeBuilder;
pub use descriptors::{ClientArg, ClientMethod, Middleware, ServerMethod, client_args, security_middlewares};
pub use error::{Error, Result};
pub use language::{GenerateResult, LanguageCodegen, NamingConvention, PreviewFile, TypeMapper};
