//! Flask blueprint of one root resource.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{CodeBuilder, ServerMethod, generation::ImportCollector};
use ramlgen_core::{FileRules, GeneratedFile};

use super::{GENERATED_HEADER, render_imports};
use crate::naming::py_var;

/// A security decorator applied to a route.
#[derive(Debug, Clone)]
pub struct DecoratorPy {
    /// Module the decorator is imported from
    pub module: String,
    pub name: String,
    pub scopes: Vec<String>,
}

/// One route of the blueprint.
#[derive(Debug, Clone)]
pub struct RoutePy {
    pub method: ServerMethod,
    pub decorators: Vec<DecoratorPy>,
}

impl RoutePy {
    pub fn handler_name(&self) -> String {
        format!("{}Handler", self.method.name)
    }

    fn args(&self) -> String {
        self.method
            .params
            .iter()
            .map(|p| py_var(p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `<root>_if.py`: routes delegating to the handlers package, regenerated
/// every run.
#[derive(Debug, Clone)]
pub struct BlueprintPy {
    /// Module name, also the stem of the blueprint variable
    pub module: String,
    pub routes: Vec<RoutePy>,
}

impl BlueprintPy {
    /// Variable holding the blueprint.
    pub fn variable(&self) -> String {
        format!("{}_api", self.module)
    }

    fn imports(&self) -> ImportCollector {
        let mut imports = ImportCollector::new();
        imports.add("flask", "Blueprint");
        for decorator in self.routes.iter().flat_map(|r| &r.decorators) {
            imports.add(&decorator.module, &decorator.name);
        }
        imports.add_module("handlers");
        imports
    }

    fn render_route(builder: CodeBuilder, variable: &str, route: &RoutePy) -> CodeBuilder {
        let method = &route.method;
        let verb = method.verb.as_upper();
        let mut doc = method.description.clone();
        doc.push(format!("It is handler for {verb} {}", method.route));

        let builder = builder.blank().blank().line(&format!(
            "@{variable}.route(\"{}\", methods=[\"{verb}\"])",
            method.route
        ));
        let builder = route.decorators.iter().fold(builder, |b, decorator| {
            let scopes: Vec<String> = decorator.scopes.iter().map(|s| format!("\"{s}\"")).collect();
            b.line(&format!("@{}([{}])", decorator.name, scopes.join(", ")))
        });
        let args = route.args();
        builder.block(&format!("def {}({args}):", method.name), |b| {
            b.docstring(&doc)
                .line(&format!("return handlers.{}({args})", route.handler_name()))
        })
    }
}

impl GeneratedFile for BlueprintPy {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}_if.py", self.module))
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let variable = self.variable();
        let builder = render_imports(CodeBuilder::python(), &self.imports())
            .blank()
            .line(&format!("{variable} = Blueprint(\"{variable}\", __name__)"));
        self.routes
            .iter()
            .fold(builder, |b, route| Self::render_route(b, &variable, route))
            .build()
    }
}
