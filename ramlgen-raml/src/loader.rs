//! Loading documents and the libraries they import.

use std::{
    collections::HashMap,
    io,
    path::{Component, Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::{Error, ReferenceKind, Result},
    model::{Declarations, Library},
    parse::parse_library,
};

/// Source of document text.
pub trait SourceLoader {
    /// Read the document at `path`.
    fn read(&self, path: &Path) -> io::Result<String>;

    /// Identity of a path used for cycle detection and caching.
    fn canonicalize(&self, path: &Path) -> PathBuf {
        normalize_path(path)
    }
}

/// Reads documents from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl SourceLoader for FileSystem {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| normalize_path(path))
    }
}

/// Documents held in memory, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    files: IndexMap<PathBuf, String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), content.into());
    }
}

impl SourceLoader for MemorySources {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such document"))
    }
}

/// Resolve `.` and `..` components without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Recursive library loader with import-cycle detection.
///
/// Every import produces its own `Library` value, even when the same file is
/// reachable through several paths; only the source text is shared.
pub(crate) struct LibraryLoader<'l> {
    sources: &'l dyn SourceLoader,
    cache: HashMap<PathBuf, String>,
    stack: Vec<PathBuf>,
}

impl<'l> LibraryLoader<'l> {
    /// Start loading from the document at `origin`, which is already open.
    pub(crate) fn new(sources: &'l dyn SourceLoader, origin: &Path) -> Self {
        Self {
            sources,
            cache: HashMap::new(),
            stack: vec![sources.canonicalize(origin)],
        }
    }

    /// Load every library in `declarations.uses`, relative to `base_dir`.
    pub(crate) fn load_all(&mut self, declarations: &mut Declarations, base_dir: &Path) -> Result<()> {
        let uses: Vec<(String, String)> = declarations
            .uses
            .iter()
            .map(|(alias, path)| (alias.clone(), path.clone()))
            .collect();
        for (alias, declared) in uses {
            let library = self.load(&alias, &declared, base_dir)?;
            declarations.libraries.insert(alias, library);
        }
        Ok(())
    }

    fn load(&mut self, alias: &str, declared: &str, base_dir: &Path) -> Result<Library> {
        let file = base_dir.join(declared);
        let canonical = self.sources.canonicalize(&file);

        if let Some(start) = self.stack.iter().position(|open| *open == canonical) {
            let chain = self.stack[start..]
                .iter()
                .chain(std::iter::once(&canonical))
                .map(|path| path.display().to_string())
                .collect();
            return Err(Box::new(Error::LibraryCycle { chain }));
        }

        let content = match self.cache.get(&canonical) {
            Some(content) => content.clone(),
            None => {
                let content = self.sources.read(&file).map_err(|e| self.read_error(alias, &file, e))?;
                self.cache.insert(canonical.clone(), content.clone());
                content
            }
        };
        debug!(alias, path = %file.display(), "loading library");

        let mut library = parse_library(&content, &file.display().to_string())?;
        library.path = declared.to_string();

        let library_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        self.stack.push(canonical);
        let nested = self.load_all(&mut library.declarations, &library_dir);
        self.stack.pop();
        nested?;

        Ok(library)
    }

    /// A missing file is an unresolved library; anything else is I/O.
    fn read_error(&self, alias: &str, file: &Path, source: io::Error) -> Box<Error> {
        if source.kind() != io::ErrorKind::NotFound {
            return Error::io(file, source);
        }
        let importer = self
            .stack
            .last()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        Error::reference(
            ReferenceKind::Library,
            alias,
            format!("'uses' of {importer} ({} not found)", file.display()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("api/./libs/../types.raml")),
            PathBuf::from("api/types.raml")
        );
        assert_eq!(normalize_path(Path::new("../x.raml")), PathBuf::from("../x.raml"));
    }

    #[test]
    fn test_loads_nested_libraries_relative_to_importer() {
        let sources = MemorySources::new()
            .with_file("api/libs/common.raml", "uses:\n  base: base/ids.raml\n")
            .with_file("api/libs/base/ids.raml", "types:\n  Id: string\n");

        let mut root = Declarations::default();
        root.uses.insert("common".into(), "libs/common.raml".into());

        let mut loader = LibraryLoader::new(&sources, Path::new("api/api.raml"));
        loader.load_all(&mut root, Path::new("api")).unwrap();

        let common = &root.libraries["common"];
        assert_eq!(common.path, "libs/common.raml");
        let base = &common.declarations.libraries["base"];
        assert_eq!(base.path, "base/ids.raml");
        assert!(base.declarations.types.contains_key("Id"));
    }

    #[test]
    fn test_same_file_twice_gives_independent_copies() {
        let sources = MemorySources::new().with_file("shared.raml", "types:\n  Id: string\n");

        let mut root = Declarations::default();
        root.uses.insert("one".into(), "shared.raml".into());
        root.uses.insert("two".into(), "./shared.raml".into());

        let mut loader = LibraryLoader::new(&sources, Path::new("api.raml"));
        loader.load_all(&mut root, Path::new("")).unwrap();
        assert_eq!(loader.cache.len(), 1);

        root.libraries["one"].declarations.types.clear();
        assert!(root.libraries["two"].declarations.types.contains_key("Id"));
    }

    #[test]
    fn test_cycle_is_reported_with_chain() {
        let sources = MemorySources::new()
            .with_file("a.raml", "uses:\n  b: b.raml\n")
            .with_file("b.raml", "uses:\n  a: a.raml\n");

        let mut root = Declarations::default();
        root.uses.insert("a".into(), "a.raml".into());

        let mut loader = LibraryLoader::new(&sources, Path::new("api.raml"));
        let err = loader.load_all(&mut root, Path::new("")).unwrap_err();
        match *err {
            Error::LibraryCycle { ref chain } => {
                assert_eq!(chain, &["a.raml", "b.raml", "a.raml"]);
            }
            ref other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_library_is_unresolved_reference() {
        let sources = MemorySources::new();
        let mut root = Declarations::default();
        root.uses.insert("gone".into(), "libs/gone.raml".into());

        let mut loader = LibraryLoader::new(&sources, Path::new("api.raml"));
        let err = loader.load_all(&mut root, Path::new("")).unwrap_err();
        let Error::Reference { kind, name, context } = &*err else {
            panic!("expected a reference error, got {err:?}");
        };
        assert_eq!(*kind, ReferenceKind::Library);
        assert_eq!(name, "gone");
        assert!(context.contains("api.raml"));
        assert!(context.contains("libs/gone.raml"));
    }

    #[test]
    fn test_unreadable_library_is_io_error() {
        struct Denied;

        impl SourceLoader for Denied {
            fn read(&self, _path: &Path) -> io::Result<String> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }
        }

        let mut root = Declarations::default();
        root.uses.insert("common".into(), "common.raml".into());

        let mut loader = LibraryLoader::new(&Denied, Path::new("api.raml"));
        let err = loader.load_all(&mut root, Path::new("")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
