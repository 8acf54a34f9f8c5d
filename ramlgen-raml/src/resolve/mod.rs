//! Resolution of a parsed document into a self-contained API model.
//!
//! Runs in a fixed order: load libraries, name templates, check type
//! references, then expand the resource tree. The first failure aborts and
//! no partial model is returned.

mod expand;
mod model;

use std::path::Path;

use tracing::debug;

pub use self::model::{Ancestors, ResolvedApi, ResourceId, ResourceNode, RootSource, SchemeRef};
use self::expand::Expander;
use crate::{
    error::{Error, ReferenceKind, Result},
    loader::{FileSystem, LibraryLoader, SourceLoader},
    model::{ApiDefinition, Declarations},
    namespace::{Namespace, split_qualified},
    parse::parse_api,
};

/// Resolve the RAML file at `path` from the file system.
pub fn resolve_file(path: impl AsRef<Path>) -> Result<ResolvedApi> {
    Resolver::new(&FileSystem).resolve_file(path)
}

/// Resolves documents read through a [`SourceLoader`].
pub struct Resolver<'l> {
    sources: &'l dyn SourceLoader,
}

impl<'l> Resolver<'l> {
    pub fn new(sources: &'l dyn SourceLoader) -> Self {
        Self { sources }
    }

    /// Read, parse and resolve the root document at `path`.
    pub fn resolve_file(&self, path: impl AsRef<Path>) -> Result<ResolvedApi> {
        let path = path.as_ref();
        let content = self.sources.read(path).map_err(|e| Error::io(path, e))?;
        let api = parse_api(&content, &path.display().to_string())?;
        let mut resolved = self.resolve(api, path)?;
        resolved.source = Some(RootSource {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "api.raml".to_string()),
            content,
        });
        Ok(resolved)
    }

    /// Resolve an already parsed document. `origin` is the document's path;
    /// libraries are loaded relative to its directory.
    pub fn resolve(&self, mut api: ApiDefinition, origin: &Path) -> Result<ResolvedApi> {
        let base_dir = origin.parent().unwrap_or_else(|| Path::new(""));
        LibraryLoader::new(self.sources, origin).load_all(&mut api.declarations, base_dir)?;
        api.declarations.assign_template_names();

        let ns = Namespace::new(&api.declarations);
        check_declared_types(&ns, &api.declarations)?;

        let resources = std::mem::take(&mut api.resources);
        let (nodes, roots) = Expander::new(ns, &api.secured_by).expand_all(resources)?;
        debug!(title = %api.title, resources = nodes.len(), "resolved API");

        Ok(ResolvedApi::from_parts(api, nodes, roots))
    }
}

/// Check qualified type references of every document, recursively.
fn check_declared_types<'a>(ns: &Namespace<'a>, local: &'a Declarations) -> Result<()> {
    for (name, declared) in &local.types {
        let context = format!("type '{name}'");
        for reference in declared.references() {
            check_type_reference(ns, local, &reference, &context)?;
        }
    }
    for library in local.libraries.values() {
        check_declared_types(ns, &library.declarations)?;
    }
    Ok(())
}

/// A qualified type reference must name an imported library that declares
/// the type. Unqualified names are not checked.
pub(crate) fn check_type_reference<'a>(
    ns: &Namespace<'a>,
    local: &'a Declarations,
    reference: &str,
    context: &str,
) -> Result<()> {
    if split_qualified(reference).0.is_none() {
        return Ok(());
    }
    let (owner, bare) = ns.resolve_qualified_name(reference, local, ReferenceKind::Type, context)?;
    match owner.declarations() {
        Some(declarations) if !declarations.types.contains_key(bare) => {
            Err(Error::reference(ReferenceKind::Type, reference, context))
        }
        _ => Ok(()),
    }
}
