//! Errors raised while emitting code.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating a directory or writing a file failed.
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An artifact cannot be expressed in the target language.
    #[error("cannot generate {artifact}: {message}")]
    Generation { artifact: String, message: String },

    /// A qualified name could not be resolved during emission.
    #[error(transparent)]
    Reference(#[from] Box<ramlgen_raml::Error>),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn generation(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            artifact: artifact.into(),
            message: message.into(),
        }
    }
}
