//! Code generation outputs and file management.
//!
//! - [`ImportCollector`] - Import tracking and deduplication
//! - [`FileRegistry`] - Declarative file registration and writing
//! - [`register_apidocs`] - The `apidocs` directory serving the RAML source

mod apidocs;
mod imports;
mod registry;

pub use apidocs::{APIDOCS_DIR, IndexHtml, RamlSource, register_apidocs};
pub use imports::ImportCollector;
pub use registry::{FileCategory, FileEntry, FileRegistry};
