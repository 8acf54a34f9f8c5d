//! Language-agnostic code generation traits.

use std::path::Path;

use ramlgen_core::{normalize_identifier, to_pascal_case};
use ramlgen_raml::{TypeExpr, split_qualified};

use crate::Result;

/// Trait for language-specific code generators.
///
/// Implement this trait to add support for generating API code in a new language.
pub trait LanguageCodegen {
    /// Language identifier (e.g., "go", "python")
    fn language(&self) -> &'static str;

    /// File extension for generated source files (e.g., "go", "py")
    fn file_extension(&self) -> &'static str;

    /// Preview generated files without writing to disk
    fn preview(&self) -> Result<Vec<PreviewFile>>;

    /// Generate all files into the specified output directory
    fn generate(&self, output_dir: &Path) -> Result<GenerateResult>;
}

/// Result of code generation
#[derive(Debug, Default)]
pub struct GenerateResult {
    /// Files that were written, relative to the output directory
    pub written: Vec<String>,
    /// Files that already existed and were left untouched
    pub skipped: Vec<String>,
}

/// A generated file for preview
#[derive(Debug)]
pub struct PreviewFile {
    /// Relative path from output directory
    pub path: String,
    /// File content
    pub content: String,
}

/// Trait for mapping RAML type expressions to language-specific type strings.
///
/// Implement this trait for each target language to provide type mappings.
pub trait TypeMapper {
    /// The target language name
    fn language(&self) -> &'static str;

    /// Map a builtin RAML type (`string`, `integer`, ...), `None` if unknown.
    fn builtin(&self, name: &str) -> Option<String>;

    /// Type of a list of `inner`.
    fn array(&self, inner: &str) -> String;

    /// Type of a union of the given member types.
    fn union(&self, members: &[String]) -> String;

    /// A type declared in an imported library (`alias` is normalized).
    fn qualified(&self, alias: &str, name: &str) -> String {
        format!("{alias}.{name}")
    }

    /// A user type declared in the same document.
    fn named(&self, name: &str) -> String {
        to_pascal_case(name)
    }

    /// Map a parsed type expression.
    fn map(&self, expr: &TypeExpr) -> String {
        match expr {
            TypeExpr::Named(name) => match self.builtin(name) {
                Some(mapped) => mapped,
                None => match split_qualified(name) {
                    (Some(alias), bare) => self.qualified(&normalize_identifier(alias), bare),
                    (None, bare) => self.named(bare),
                },
            },
            TypeExpr::Array(inner) => self.array(&self.map(inner)),
            TypeExpr::Union(members) => {
                let members: Vec<String> = members.iter().map(|m| self.map(m)).collect();
                self.union(&members)
            }
        }
    }

    /// Parse and map a type expression written as text.
    fn map_name(&self, name: &str) -> String {
        self.map(&TypeExpr::parse(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl TypeMapper for Plain {
        fn language(&self) -> &'static str {
            "plain"
        }

        fn builtin(&self, name: &str) -> Option<String> {
            (name == "string").then(|| "str".to_string())
        }

        fn array(&self, inner: &str) -> String {
            format!("list[{inner}]")
        }

        fn union(&self, members: &[String]) -> String {
            members.join(" or ")
        }
    }

    #[test]
    fn test_default_mapping() {
        assert_eq!(Plain.map_name("string"), "str");
        assert_eq!(Plain.map_name("pet"), "Pet");
        assert_eq!(Plain.map_name("Pet[]"), "list[Pet]");
        assert_eq!(Plain.map_name("api-types.Pet"), "api_types.Pet");
        assert_eq!(Plain.map_name("Cat | Dog[]"), "Cat or list[Dog]");
    }
}
