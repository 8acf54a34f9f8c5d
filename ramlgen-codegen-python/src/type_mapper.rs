//! Python type mapper implementation.

use ramlgen_codegen::{EmitContext, Result, TypeMapper, generation::ImportCollector};
use ramlgen_core::normalize_identifier;
use ramlgen_raml::{TypeExpr, split_qualified};

use crate::{files::TYPES_MODULE, naming::{PY_NAMING, module_path}};

/// Python type mapper implementation.
pub struct PythonTypeMapper;

impl TypeMapper for PythonTypeMapper {
    fn language(&self) -> &'static str {
        "python"
    }

    fn builtin(&self, name: &str) -> Option<String> {
        let mapped = match name {
            "string" => "str",
            "integer" => "int",
            "number" => "float",
            "boolean" => "bool",
            "datetime" | "datetime-only" => "datetime",
            "date-only" => "date",
            "time-only" => "time",
            "file" => "bytes",
            "object" => "Dict[str, Any]",
            "array" => "List[Any]",
            "any" | "nil" => "Any",
            _ => return None,
        };
        Some(mapped.to_string())
    }

    fn array(&self, inner: &str) -> String {
        format!("List[{inner}]")
    }

    fn union(&self, members: &[String]) -> String {
        format!("Union[{}]", members.join(", "))
    }

    fn qualified(&self, alias: &str, name: &str) -> String {
        format!("{alias}.{}", PY_NAMING.type_name(name))
    }

    fn named(&self, name: &str) -> String {
        PY_NAMING.type_name(name)
    }
}

/// Dotted module of the package holding the qualified `name`, `None` when it
/// is unqualified.
pub fn package_module(ctx: &EmitContext<'_>, name: &str, context: &str) -> Result<Option<String>> {
    Ok(ctx
        .ns
        .import_path_for(name, "", context)?
        .map(|path| module_path(&path)))
}

/// Record the library type modules a type expression refers to, imported as
/// `from <package> import api_types as <alias>`.
pub fn collect_imports(
    ctx: &EmitContext<'_>,
    expr: &TypeExpr,
    context: &str,
    imports: &mut ImportCollector,
) -> Result<()> {
    for name in expr.names() {
        if let Some(module) = package_module(ctx, &name, context)?
            && let (Some(alias), _) = split_qualified(&name)
        {
            imports.add(&module, &format!("{TYPES_MODULE} as {}", normalize_identifier(alias)));
        }
    }
    Ok(())
}
