use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

/// Trait for types that represent a generated file
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Get the rules for writing this file
    fn rules(&self) -> FileRules;

    /// Render the file content
    fn render(&self) -> String;

    /// Materialize the file under `base`, prepending the rule header if any
    fn to_file(&self, base: &Path) -> File {
        let rules = self.rules();
        let content = match rules.header {
            Some(header) => format!("{}\n\n{}", header, self.render()),
            None => self.render(),
        };
        File {
            path: self.path(base),
            content,
            rules,
        }
    }
}

fn write_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    std::fs::write(path, content)
}

/// Create a directory and its parents.
///
/// Succeeds when the directory already exists, so it may be called any
/// number of times for the same path.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir)
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// A file to be generated
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Replace the overwrite policy of this file.
    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.rules.overwrite = overwrite;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the write rules
    pub fn rules(&self) -> &FileRules {
        &self.rules
    }

    /// Write the file according to its rules.
    ///
    /// The existence check for [`Overwrite::IfMissing`] happens right before
    /// the write, so a file edited by hand between two runs is kept.
    pub fn write(&self) -> io::Result<WriteResult> {
        if self.rules.overwrite == Overwrite::IfMissing && self.path.exists() {
            debug!(path = %self.path.display(), "file exists, not regenerating");
            return Ok(WriteResult::Skipped);
        }
        write_file(&self.path, &self.content)?;
        info!(path = %self.path.display(), "generated file");
        Ok(WriteResult::Written)
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone)]
pub struct FileRules {
    pub overwrite: Overwrite,
    pub header: Option<&'static str>,
}

impl FileRules {
    /// Regenerated on every run, with a "do not edit" style header.
    pub fn generated(header: &'static str) -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: Some(header),
        }
    }

    /// Written once, then owned by the user.
    pub fn user_owned() -> Self {
        Self {
            overwrite: Overwrite::IfMissing,
            header: None,
        }
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (generated code)
    Always,
    /// Only create if file doesn't exist (stubs)
    IfMissing,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            overwrite: Overwrite::Always,
            header: None,
        }
    }
}
