use std::{fmt, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for RAML loading and resolution (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Keeps the document text and its display name together so parse errors
/// can point into the document without threading both through every call.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a YAML error, labelled at the reported location.
    pub fn parse_error(&self, source: serde_yaml::Error) -> Box<Error> {
        let span = source
            .location()
            .map(|location| SourceSpan::from((location.index().min(self.src.len()), 0)));
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            filename: self.filename.clone(),
            source,
        })
    }
}

/// What kind of declaration a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Library,
    ResourceType,
    Trait,
    SecurityScheme,
    Type,
    TemplateParameter,
    TemplateFunction,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Library => "library",
            Self::ResourceType => "resource type",
            Self::Trait => "trait",
            Self::SecurityScheme => "security scheme",
            Self::Type => "type",
            Self::TemplateParameter => "template parameter",
            Self::TemplateFunction => "template function",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{}'", path.display())]
    #[diagnostic(code(ramlgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(ramlgen::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        filename: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {context}: {message}")]
    #[diagnostic(code(ramlgen::invalid_fragment))]
    Fragment { context: String, message: String },

    #[error("unresolved {kind} '{name}' in {context}")]
    #[diagnostic(
        code(ramlgen::unresolved_reference),
        help("declare '{name}' or import the library that declares it through 'uses'")
    )]
    Reference {
        kind: ReferenceKind,
        name: String,
        context: String,
    },

    #[error("library import cycle: {}", chain.join(" -> "))]
    #[diagnostic(
        code(ramlgen::library_cycle),
        help("move the shared declarations into a library that neither file imports")
    )]
    LibraryCycle { chain: Vec<String> },
}

impl Error {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    /// Create a parse error from a YAML error with source context
    pub fn parse(source: serde_yaml::Error, src: &str, filename: &str) -> Box<Self> {
        SourceContext::new(src, filename).parse_error(source)
    }

    /// Create an error for a template that instantiated into an unusable shape
    pub fn fragment(context: impl Into<String>, message: impl fmt::Display) -> Box<Self> {
        Box::new(Error::Fragment {
            context: context.into(),
            message: message.to_string(),
        })
    }

    /// Create an unresolved reference error
    pub fn reference(
        kind: ReferenceKind,
        name: impl Into<String>,
        context: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::Reference {
            kind,
            name: name.into(),
            context: context.into(),
        })
    }

    /// Whether this error is an unresolved reference
    pub fn is_reference(&self) -> bool {
        matches!(self, Error::Reference { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_points_at_location() {
        let src = "title: [unclosed\n";
        let source = serde_yaml::from_str::<serde_yaml::Value>(src).unwrap_err();
        let error = SourceContext::new(src, "api.raml").parse_error(source);

        match *error {
            Error::Parse { span, filename, .. } => {
                assert_eq!(filename, "api.raml");
                assert!(span.is_some());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_message() {
        let error = Error::reference(ReferenceKind::Trait, "paged", "GET /users");
        assert_eq!(error.to_string(), "unresolved trait 'paged' in GET /users");
        assert!(error.is_reference());
    }

    #[test]
    fn test_cycle_message_names_chain() {
        let error = Error::LibraryCycle {
            chain: vec!["a.raml".into(), "b.raml".into(), "a.raml".into()],
        };
        assert_eq!(
            error.to_string(),
            "library import cycle: a.raml -> b.raml -> a.raml"
        );
    }
}
