//! Typed representation of RAML documents as written, before resolution.

mod api;
mod method;
pub(crate) mod resource;
mod security;
mod template;
mod types;

pub use api::{ApiDefinition, Declarations, Library};
pub use method::{Body, HttpMethod, Method, Response};
pub use resource::Resource;
pub use security::{DefinitionChoice, SchemeKind, SecurityScheme};
pub use template::{
    METHOD_NAME, RESOURCE_PATH, RESOURCE_PATH_NAME, ResourceType, Template, TemplateParams, Trait,
    substitute_str,
};
pub use types::{Property, Type, TypeExpr, is_builtin};
