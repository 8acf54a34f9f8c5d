//! Python source files produced by the backend.

mod app_py;
mod blueprint_py;
mod client_py;
mod handler_py;
mod security_py;
mod types_py;

pub use app_py::AppPy;
pub use blueprint_py::{BlueprintPy, DecoratorPy, RoutePy};
pub use client_py::ClientPy;
pub use handler_py::{HANDLERS_DIR, HandlerPy, HandlersInit};
pub use security_py::{SecurityPy, decorator_name};
pub use types_py::{ClassPy, EnumPy, FieldPy, TypesPy};

use ramlgen_codegen::{CodeBuilder, generation::ImportCollector};

/// Header of the files regenerated on every run.
pub const GENERATED_HEADER: &str = "# DO NOT EDIT. Generated by ramlgen.";

/// Module holding the types of a package. Named so it does not shadow the
/// standard `types` module.
pub const TYPES_MODULE: &str = "api_types";

/// Render `import` / `from ... import` lines followed by a blank line;
/// nothing when there are no imports.
pub fn render_imports(builder: CodeBuilder, imports: &ImportCollector) -> CodeBuilder {
    if imports.is_empty() {
        return builder;
    }
    imports
        .iter()
        .fold(builder, |b, (module, symbols)| {
            if symbols.is_empty() {
                b.line(&format!("import {module}"))
            } else {
                let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
                b.line(&format!("from {module} import {}", symbols.join(", ")))
            }
        })
        .blank()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_imports() {
        let mut imports = ImportCollector::new();
        imports.add("flask", "Blueprint");
        imports.add("flask", "abort");
        imports.add_module("handlers");

        let code = render_imports(CodeBuilder::python(), &imports).build();
        assert_eq!(code, "from flask import Blueprint, abort\nimport handlers\n\n");
        assert_eq!(render_imports(CodeBuilder::python(), &ImportCollector::new()).build(), "");
    }
}
