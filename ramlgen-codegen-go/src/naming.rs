//! Go-specific naming conventions.

use ramlgen_codegen::NamingConvention;
use ramlgen_core::{to_camel_case, to_pascal_case, to_snake_case};

fn escape_go_reserved(name: &str) -> String {
    format!("{name}_")
}

/// Go naming conventions.
pub const GO_NAMING: NamingConvention = NamingConvention {
    language: "Go",
    // Exported types and fields use PascalCase
    to_type: to_pascal_case,
    // Files use snake_case
    to_file: to_snake_case,
    to_field: to_pascal_case,
    reserved_words: &[
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
    ],
    escape_reserved: escape_go_reserved,
};

/// Local variable name for a URI parameter (`user-id` -> `userId`).
pub fn go_var(name: &str) -> String {
    GO_NAMING.safe_name(&to_camel_case(name))
}

/// Package name of a library directory: its last segment.
pub fn package_name(dir: &str) -> &str {
    dir.rsplit('/').next().unwrap_or(dir)
}
