//! File registration pattern for declarative code generation.
//!
//! Backends register every file they plan to produce together with its
//! overwrite rule. Nothing touches the disk until [`FileRegistry::write_all`],
//! so a failing backend leaves the output directory unchanged, and a dry run
//! is just [`FileRegistry::preview`].
//!
//! # Example
//!
//! ```ignore
//! let mut registry = FileRegistry::new();
//!
//! // Regenerated on every run
//! registry.register(FileEntry::generated("users_if.go", interface));
//!
//! // Written once, then owned by the user
//! registry.register(FileEntry::scaffold("users_api.go", stub));
//!
//! registry.write_all(&output_dir, false)?;
//! ```

use std::path::{Path, PathBuf};

use ramlgen_core::{File, GeneratedFile, Overwrite, WriteResult, ensure_dir};
use tracing::debug;

use crate::{Error, GenerateResult, PreviewFile, Result};

/// Category of generated file, determining generation order and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileCategory {
    /// Support code shipped with every output (date types, API docs).
    /// Generated first, always overwritten.
    Support,
    /// Code derived from the API (types, interfaces, routes, clients).
    /// Always overwritten.
    Generated,
    /// Entry points and handler stubs that users edit.
    /// Generated last, only if missing.
    Scaffold,
}

impl FileCategory {
    /// Get the default overwrite behavior for this category.
    pub fn default_overwrite(&self) -> Overwrite {
        match self {
            FileCategory::Scaffold => Overwrite::IfMissing,
            _ => Overwrite::Always,
        }
    }
}

/// An entry in the file registry representing a file to be generated.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Relative path from output directory, `/` separated.
    pub path: String,
    /// File content.
    pub content: String,
    /// Category determining generation behavior.
    pub category: FileCategory,
    /// Override default overwrite behavior.
    pub overwrite: Option<Overwrite>,
}

impl FileEntry {
    /// Create a new file entry with the given category.
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        category: FileCategory,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            category,
            overwrite: None,
        }
    }

    /// Create a support file (always overwritten, generated first).
    pub fn support(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Support)
    }

    /// Create a generated code file (always overwritten).
    pub fn generated(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Generated)
    }

    /// Create a user-owned stub (only if missing).
    pub fn scaffold(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Scaffold)
    }

    /// Create from a GeneratedFile, respecting its rules and header.
    ///
    /// The file's path is taken relative to `dir`.
    pub fn from_generated<F: GeneratedFile>(dir: &str, file: &F, category: FileCategory) -> Self {
        let file = file.to_file(Path::new(dir));
        let overwrite = file.rules().overwrite;
        Self::new(slash_path(file.path()), file.content(), category).with_overwrite(overwrite)
    }

    /// Override the default overwrite behavior.
    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    /// Get the effective overwrite behavior.
    pub fn overwrite(&self) -> Overwrite {
        self.overwrite
            .unwrap_or_else(|| self.category.default_overwrite())
    }

    /// Get the full path for this entry.
    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    /// Write this file to disk.
    ///
    /// With `force`, user-owned files are overwritten too.
    pub fn write(&self, base: &Path, force: bool) -> Result<WriteResult> {
        let path = self.full_path(base);
        let overwrite = if force {
            Overwrite::Always
        } else {
            self.overwrite()
        };
        File::new(&path, self.content.as_str())
            .with_overwrite(overwrite)
            .write()
            .map_err(|e| Error::io(path, e))
    }
}

/// Registry for collecting and managing generated files.
///
/// Files are generated in category order:
/// Support -> Generated -> Scaffold
#[derive(Debug, Default)]
pub struct FileRegistry {
    dirs: Vec<String>,
    entries: Vec<FileEntry>,
}

impl FileRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory to create even if no file is placed in it.
    pub fn register_dir(&mut self, dir: impl Into<String>) {
        let dir = dir.into();
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    /// Register a file entry.
    ///
    /// A second entry for the same path replaces the first one.
    pub fn register(&mut self, entry: FileEntry) {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => {
                debug!(path = %entry.path, "replacing planned file");
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
    }

    /// Register multiple file entries.
    pub fn register_all(&mut self, entries: impl IntoIterator<Item = FileEntry>) {
        for entry in entries {
            self.register(entry);
        }
    }

    /// Get all registered entries, sorted by category.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.category);
        sorted.into_iter()
    }

    /// Get the entry planned at `path`.
    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Registered directories, in registration order.
    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// Get the number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Preview all files (returns path and content pairs).
    pub fn preview(&self) -> Vec<PreviewFile> {
        self.entries()
            .map(|e| PreviewFile {
                path: e.path.clone(),
                content: e.content.clone(),
            })
            .collect()
    }

    /// Write all files to the output directory.
    ///
    /// Directories are created first, then files in category order. The
    /// first failure aborts the run.
    pub fn write_all(&self, base: &Path, force: bool) -> Result<GenerateResult> {
        ensure_dir(base).map_err(|e| Error::io(base, e))?;
        for dir in &self.dirs {
            let path = base.join(dir);
            ensure_dir(&path).map_err(|e| Error::io(path, e))?;
        }

        let mut result = GenerateResult::default();
        for entry in self.entries() {
            match entry.write(base, force)? {
                WriteResult::Written => result.written.push(entry.path.clone()),
                WriteResult::Skipped => result.skipped.push(entry.path.clone()),
            }
        }
        Ok(result)
    }
}

/// Join the components of a relative path with `/`.
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
