//! Naming conventions for different programming languages.

use crate::{Error, Result};

/// Language-specific naming conventions.
///
/// Defines how to transform RAML names into type, file and field names, and
/// how to handle reserved words.
#[derive(Debug, Clone, Copy)]
pub struct NamingConvention {
    /// Target language, used in error messages
    pub language: &'static str,
    /// Transform a declaration name to a type name (e.g., "user-profile" -> "UserProfile")
    pub to_type: fn(&str) -> String,
    /// Transform a resource or scheme name to a file name (e.g., "Users" -> "users")
    pub to_file: fn(&str) -> String,
    /// Transform a property name to a field name
    pub to_field: fn(&str) -> String,
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
    /// Escape a reserved word (e.g., "type" -> "type_" in Python)
    pub escape_reserved: fn(&str) -> String,
}

impl NamingConvention {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Get a safe name, escaping if necessary.
    pub fn safe_name(&self, name: &str) -> String {
        if self.is_reserved(name) {
            (self.escape_reserved)(name)
        } else {
            name.to_string()
        }
    }

    /// Transform and make safe for use as a type name.
    pub fn type_name(&self, name: &str) -> String {
        let transformed = (self.to_type)(name);
        self.safe_name(&transformed)
    }

    /// Transform and make safe for use as a file name.
    pub fn file_name(&self, name: &str) -> String {
        (self.to_file)(name)
    }

    /// Transform and make safe for use as a field name.
    pub fn field_name(&self, name: &str) -> String {
        let transformed = (self.to_field)(name);
        self.safe_name(&transformed)
    }

    /// Type name for a declaration, failing when the result is not a legal
    /// identifier in the target language.
    pub fn checked_type_name(&self, name: &str) -> Result<String> {
        let type_name = self.type_name(name);
        if is_identifier(&type_name) {
            Ok(type_name)
        } else {
            Err(Error::generation(
                format!("type '{name}'"),
                format!("'{type_name}' is not a valid {} identifier", self.language),
            ))
        }
    }
}

/// ASCII identifier: a letter or `_` followed by letters, digits or `_`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use ramlgen_core::{to_pascal_case, to_snake_case};

    use super::*;

    const TEST_NAMING: NamingConvention = NamingConvention {
        language: "test",
        to_type: to_pascal_case,
        to_file: to_snake_case,
        to_field: to_snake_case,
        reserved_words: &["type", "Type"],
        escape_reserved: suffix_underscore,
    };

    fn suffix_underscore(name: &str) -> String {
        format!("{name}_")
    }

    #[test]
    fn test_type_and_field_names() {
        assert_eq!(TEST_NAMING.type_name("user-profile"), "UserProfile");
        assert_eq!(TEST_NAMING.field_name("userId"), "user_id");
        assert_eq!(TEST_NAMING.field_name("type"), "type_");
        assert_eq!(TEST_NAMING.file_name("Users"), "users");
    }

    #[test]
    fn test_checked_type_name() {
        assert_eq!(TEST_NAMING.checked_type_name("pet").unwrap(), "Pet");

        let err = TEST_NAMING.checked_type_name("2fa").unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
        assert!(err.to_string().contains("type '2fa'"));

        assert!(TEST_NAMING.checked_type_name("Pet.Owner").is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("_private"));
        assert!(is_identifier("Pet2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("my type"));
    }
}
