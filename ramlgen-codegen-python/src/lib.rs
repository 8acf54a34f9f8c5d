//! Python backend: Flask servers and `requests` clients.
//!
//! # Generated Output
//!
//! For a server:
//!
//! - `api_types.py` - Dataclasses and enums of the root types
//! - `<root>_if.py` - Flask blueprint per root resource
//! - `handlers/*.py` - Handler stubs for implementation
//! - `oauth2_<scheme>.py` / `security_<scheme>.py` - Security decorators
//! - `app.py` - Entry point
//! - `<library dir>/__init__.py` and `api_types.py` per library
//!
//! For a client, `client.py` with one method per resource and verb.

mod generator;
mod naming;
mod type_mapper;

pub mod files;

pub use generator::{Generator, PythonBackend};
pub use naming::{PY_NAMING, py_var};
pub use ramlgen_codegen::{GenerateResult, LanguageCodegen, PreviewFile};
pub use type_mapper::PythonTypeMapper;
