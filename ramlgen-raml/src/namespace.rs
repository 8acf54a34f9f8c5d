//! Qualified name lookup (`alias.Name`) across imported libraries.
//!
//! Aliases are looked up in the local document, then in the root document,
//! then one level into the libraries the root imports. Deeper imports are
//! not searched.

use ramlgen_core::{denormalize_identifier, normalize_identifier};

use crate::{
    error::{Error, ReferenceKind, Result},
    model::{Declarations, Library},
};

/// Separator between a library alias and the declaration name.
pub const SEPARATOR: char = '.';

/// Split `alias.Name` on the first separator.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    let name = name.trim();
    match name.split_once(SEPARATOR) {
        Some((alias, bare)) if !alias.is_empty() && !bare.is_empty() => (Some(alias), bare),
        _ => (None, name),
    }
}

/// Strip the extension from a library path and make every segment a legal
/// package identifier (`./libs/common-types.raml` -> `libs/common_types`).
pub fn library_rel_dir(path: &str) -> String {
    let path = path.trim_start_matches("./").replace('\\', "/");
    let stem = match path.rfind('.') {
        Some(dot) if path[dot..].find('/').is_none() && dot > 0 => &path[..dot],
        _ => path.as_str(),
    };
    normalize_identifier(stem)
}

/// Where a name was found.
#[derive(Debug, Clone, Copy)]
pub enum Owner<'a> {
    /// The document the lookup started from
    Local(&'a Declarations),
    /// An imported library, with the alias it was found under
    Library { alias: &'a str, library: &'a Library },
    /// The reserved support package of the target language
    Support,
}

impl<'a> Owner<'a> {
    /// Declarations of the owning document, `None` for the support package.
    pub fn declarations(&self) -> Option<&'a Declarations> {
        match *self {
            Owner::Local(declarations) => Some(declarations),
            Owner::Library { library, .. } => Some(&library.declarations),
            Owner::Support => None,
        }
    }

    /// The library alias, if the name lives in a library.
    pub fn alias(&self) -> Option<&'a str> {
        match *self {
            Owner::Library { alias, .. } => Some(alias),
            _ => None,
        }
    }
}

/// Resolves qualified names against a root document's imports.
///
/// Built from the root declarations and passed to every lookup, so no
/// lookup depends on hidden global state.
#[derive(Debug, Clone, Copy)]
pub struct Namespace<'a> {
    root: &'a Declarations,
    support_alias: Option<&'a str>,
}

impl<'a> Namespace<'a> {
    pub fn new(root: &'a Declarations) -> Self {
        Self {
            root,
            support_alias: None,
        }
    }

    /// Reserve an alias for the target language's support package.
    pub fn with_support_alias(mut self, alias: &'a str) -> Self {
        self.support_alias = Some(alias);
        self
    }

    pub fn root(&self) -> &'a Declarations {
        self.root
    }

    pub fn support_alias(&self) -> Option<&'a str> {
        self.support_alias
    }

    /// Find a loaded library by alias, starting from `local`.
    pub fn find_library(
        &self,
        local: &'a Declarations,
        alias: &str,
    ) -> Option<(&'a str, &'a Library)> {
        let direct = [local, self.root]
            .into_iter()
            .find_map(|decls| decls.libraries.get_key_value(alias));
        let (alias, library) = direct.or_else(|| {
            self.root
                .libraries
                .values()
                .find_map(|library| library.declarations.libraries.get_key_value(alias))
        })?;
        Some((alias.as_str(), library))
    }

    /// Resolve `name` to its owning document and bare name.
    pub fn resolve_qualified_name<'n>(
        &self,
        name: &'n str,
        local: &'a Declarations,
        kind: ReferenceKind,
        context: &str,
    ) -> Result<(Owner<'a>, &'n str)> {
        match split_qualified(name) {
            (None, bare) => Ok((Owner::Local(local), bare)),
            (Some(alias), bare) if Some(alias) == self.support_alias => Ok((Owner::Support, bare)),
            (Some(alias), bare) => {
                let (alias, library) = self.find_library(local, alias).ok_or_else(|| {
                    Error::reference(ReferenceKind::Library, alias, format!("{kind} '{name}' in {context}"))
                })?;
                Ok((Owner::Library { alias, library }, bare))
            }
        }
    }

    /// Declared file path of the library imported under `alias`, from the
    /// root `uses` or one level into the loaded libraries.
    pub fn library_file(&self, alias: &str) -> Option<&'a str> {
        if let Some(path) = self.root.uses.get(alias) {
            return Some(path.as_str());
        }
        self.root
            .libraries
            .values()
            .find_map(|library| library.declarations.uses.get(alias))
            .map(String::as_str)
    }

    /// Output import path of the package that holds `name`.
    ///
    /// `None` for unqualified names. The alias may be given in generated
    /// (normalized) form; it is denormalized when the literal alias is not
    /// imported anywhere.
    pub fn import_path_for(
        &self,
        name: &str,
        root_import_path: &str,
        context: &str,
    ) -> Result<Option<String>> {
        let (Some(alias), _) = split_qualified(name) else {
            return Ok(None);
        };
        let root_import_path = root_import_path.trim_end_matches('/');
        if Some(alias) == self.support_alias {
            return Ok(Some(format!("{root_import_path}/{alias}")));
        }
        let file = self
            .library_file(alias)
            .or_else(|| self.library_file(&denormalize_identifier(alias)))
            .ok_or_else(|| Error::reference(ReferenceKind::Library, alias, context))?;
        Ok(Some(format!("{root_import_path}/{}", library_rel_dir(file))))
    }
}
