//! Go source files produced by the backend.

mod client_go;
mod goraml;
mod main_go;
mod middleware_go;
mod resource_go;
mod type_go;

pub use client_go::{CallGo, ClientGo};
pub use goraml::DateTimeGo;
pub use main_go::MainGo;
pub use middleware_go::{MiddlewareGo, middleware_type};
pub use resource_go::{ApiGo, HandlerGo, InterfaceGo, RootResource};
pub use type_go::{FieldGo, TypeGo, TypeKind};

/// Header of the files regenerated on every run.
pub const GENERATED_HEADER: &str = "// Code generated by ramlgen. DO NOT EDIT.";
