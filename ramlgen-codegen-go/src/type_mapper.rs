//! Go type mapper implementation.

use ramlgen_codegen::{
    CodeBuilder, EmitContext, Result, TypeMapper, generation::ImportCollector,
};
use ramlgen_core::normalize_identifier;
use ramlgen_raml::{TypeExpr, split_qualified};

use crate::naming::GO_NAMING;

/// Alias of the support package holding date and time types.
pub const SUPPORT_PACKAGE: &str = "goraml";

/// Go type mapper implementation.
pub struct GoTypeMapper;

impl TypeMapper for GoTypeMapper {
    fn language(&self) -> &'static str {
        "go"
    }

    fn builtin(&self, name: &str) -> Option<String> {
        let mapped = match name {
            "string" | "file" => "string",
            "integer" => "int",
            "number" => "float64",
            "boolean" => "bool",
            "datetime" => "goraml.DateTime",
            "date-only" => "goraml.Date",
            "time-only" => "goraml.TimeOnly",
            "datetime-only" => "goraml.DatetimeOnly",
            "object" => "map[string]interface{}",
            "array" => "[]interface{}",
            "any" | "nil" => "interface{}",
            _ => return None,
        };
        Some(mapped.to_string())
    }

    fn array(&self, inner: &str) -> String {
        format!("[]{inner}")
    }

    fn union(&self, _members: &[String]) -> String {
        "interface{}".to_string()
    }

    fn qualified(&self, alias: &str, name: &str) -> String {
        format!("{alias}.{}", GO_NAMING.type_name(name))
    }

    fn named(&self, name: &str) -> String {
        GO_NAMING.type_name(name)
    }
}

/// Support type a builtin maps to, as a qualified name.
fn support_type(name: &str) -> Option<&'static str> {
    match name {
        "datetime" => Some("goraml.DateTime"),
        "date-only" => Some("goraml.Date"),
        "time-only" => Some("goraml.TimeOnly"),
        "datetime-only" => Some("goraml.DatetimeOnly"),
        _ => None,
    }
}

/// Record the packages a type expression refers to.
///
/// Library types are imported under their normalized alias.
pub fn collect_imports(
    ctx: &EmitContext<'_>,
    expr: &TypeExpr,
    context: &str,
    imports: &mut ImportCollector,
) -> Result<()> {
    for name in expr.names() {
        let name = support_type(&name).map(str::to_string).unwrap_or(name);
        if let Some(path) = ctx.import_path_for(&name, context)?
            && let (Some(alias), _) = split_qualified(&name)
        {
            imports.add(&path, &normalize_identifier(alias));
        }
    }
    Ok(())
}

/// Render an `import (...)` block; nothing when there are no imports.
pub fn render_imports(builder: CodeBuilder, imports: &ImportCollector) -> CodeBuilder {
    if imports.is_empty() {
        return builder;
    }
    builder
        .block_with_close("import (", ")", |b| {
            imports.iter().fold(b, |b, (path, aliases)| {
                if aliases.is_empty() {
                    b.line(&format!("\"{path}\""))
                } else {
                    aliases
                        .iter()
                        .fold(b, |b, alias| b.line(&format!("{alias} \"{path}\"")))
                }
            })
        })
        .blank()
}
