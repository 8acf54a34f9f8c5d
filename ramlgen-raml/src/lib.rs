//! RAML 1.0 document model, parsing and resolution.
//!
//! A root document is parsed into an [`ApiDefinition`], then
//! [`Resolver::resolve`] loads its libraries, applies resource types and
//! traits, and returns a read-only [`ResolvedApi`].

mod de;
mod error;
mod loader;
pub mod model;
pub mod namespace;
mod parse;
mod resolve;

pub use error::{Error, ReferenceKind, Result, SourceContext};
pub use loader::{FileSystem, MemorySources, SourceLoader, normalize_path};
pub use model::{
    ApiDefinition, Body, DefinitionChoice, Declarations, HttpMethod, Library, Method, Property,
    Resource, ResourceType, Response, SchemeKind, SecurityScheme, Trait, Type, TypeExpr,
    is_builtin,
};
pub use namespace::{Namespace, Owner, library_rel_dir, split_qualified};
pub use parse::{parse_api, parse_library};
pub use resolve::{
    Ancestors, ResolvedApi, ResourceId, ResourceNode, Resolver, RootSource, SchemeRef,
    resolve_file,
};
