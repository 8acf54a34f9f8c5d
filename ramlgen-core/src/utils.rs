//! Shared utility functions for code generation.

fn is_word_separator(c: char) -> bool {
    matches!(c, '_' | '-' | ' ')
}

/// Uppercase the first character, leaving the rest untouched ("userId" -> "UserId")
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character, leaving the rest untouched ("Users" -> "users")
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
pub fn to_pascal_case(s: &str) -> String {
    s.split(is_word_separator).map(upper_first).collect()
}

/// Convert a string to camelCase (e.g., "hello_world" -> "helloWorld")
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Convert a string to snake_case (e.g., "HelloWorld" -> "hello_world")
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if is_word_separator(c) {
            result.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 && !result.ends_with('_') {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}

/// Make a name usable as a module, package or directory identifier.
///
/// Hyphens are not legal in most package names and become underscores.
pub fn normalize_identifier(name: &str) -> String {
    name.replace('-', "_")
}

/// Inverse of [`normalize_identifier`], used to find the original library
/// file name from a generated identifier.
///
/// Lossy when the original name contains both `-` and `_`: every
/// underscore comes back as a hyphen.
pub fn denormalize_identifier(name: &str) -> String {
    name.replace('_', "-")
}
