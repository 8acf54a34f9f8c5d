//! Go backend: gorilla/mux servers, net/http clients and the `goraml`
//! support package.

mod generator;
mod naming;
mod type_mapper;

pub mod files;

pub use generator::{GoBackend, Generator};
pub use naming::{GO_NAMING, go_var};
pub use ramlgen_codegen::{GenerateResult, LanguageCodegen, PreviewFile};
pub use type_mapper::{GoTypeMapper, SUPPORT_PACKAGE};
