//! Python-specific naming conventions.

use ramlgen_codegen::NamingConvention;
use ramlgen_core::{to_pascal_case, to_snake_case};

fn escape_py_reserved(name: &str) -> String {
    format!("{name}_")
}

/// Keep the name, replacing characters Python identifiers cannot hold.
fn identifier_chars(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Python naming conventions.
pub const PY_NAMING: NamingConvention = NamingConvention {
    language: "Python",
    // Classes use PascalCase
    to_type: to_pascal_case,
    // Modules use snake_case
    to_file: to_snake_case,
    // Fields keep the RAML property name
    to_field: identifier_chars,
    reserved_words: &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield",
    ],
    escape_reserved: escape_py_reserved,
};

/// Variable name for a URI parameter.
pub fn py_var(name: &str) -> String {
    PY_NAMING.field_name(name)
}

/// Dotted module path of an output directory (`libs/common_types` ->
/// `libs.common_types`).
pub fn module_path(dir: &str) -> String {
    dir.trim_matches('/').replace('/', ".")
}

/// Member name of an enum value (`in-stock` -> `IN_STOCK`).
pub fn enum_member(value: &str) -> String {
    let member = identifier_chars(value).to_uppercase();
    if member.is_empty() || member.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{member}")
    } else {
        member
    }
}
