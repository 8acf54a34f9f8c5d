use std::path::Path;

use ramlgen_codegen::{
    Backend, ClientMethod, EmitContext, GenerateOptions, GenerateResult, LanguageCodegen,
    Middleware, PreviewFile, Result, ServerMethod, Target, generate,
    generation::{FileCategory, FileEntry, FileRegistry, register_apidocs},
    paths::{NameStyle, resource_type_name},
    preview,
};
use ramlgen_raml::{Declarations, HttpMethod, Method, ResolvedApi, ResourceId};
use tracing::debug;

use crate::{
    files::{
        AppPy, BlueprintPy, ClientPy, DecoratorPy, HandlerPy, HandlersInit, RoutePy, SecurityPy,
        TypesPy, decorator_name,
    },
    naming::{PY_NAMING, py_var},
    type_mapper::package_module,
};

/// Emission steps for Python: Flask servers and `requests` clients.
pub struct PythonBackend;

impl PythonBackend {
    fn decorator(ctx: &EmitContext<'_>, middleware: &Middleware, context: &str) -> Result<DecoratorPy> {
        let name = decorator_name(&middleware.name, &middleware.kind);
        let module = match middleware.alias {
            Some(_) => match package_module(ctx, &middleware.reference, context)? {
                Some(package) => format!("{package}.{name}"),
                None => name.clone(),
            },
            None => name.clone(),
        };
        Ok(DecoratorPy {
            module,
            name,
            scopes: middleware.scopes.clone(),
        })
    }

    fn blueprint(
        &self,
        ctx: &EmitContext<'_>,
        root: ResourceId,
        handlers: &mut Vec<HandlerPy>,
    ) -> Result<BlueprintPy> {
        let node = ctx.api.resource(root);
        let mut routes = Vec::new();
        for id in ctx.api.subtree(root) {
            for (verb, method) in &ctx.api.resource(id).methods {
                let server = self.emit_server_method(ctx, id, *verb, method)?;
                let context = format!("{} {}", verb.as_upper(), server.route);
                let decorators = server
                    .middlewares
                    .iter()
                    .map(|m| Self::decorator(ctx, m, &context))
                    .collect::<Result<Vec<_>>>()?;
                let route = RoutePy {
                    method: server,
                    decorators,
                };
                handlers.push(HandlerPy {
                    name: route.handler_name(),
                    params: route.method.params.iter().map(|p| py_var(p)).collect(),
                    has_body: verb.has_body(),
                });
                routes.push(route);
            }
        }
        Ok(BlueprintPy {
            module: PY_NAMING.file_name(&resource_type_name(&node.uri)),
            routes,
        })
    }
}

impl Backend for PythonBackend {
    fn name(&self) -> &'static str {
        "python"
    }

    /// Every directory on the way to a library package gets an `__init__.py`.
    fn emit_package(&self, _ctx: &EmitContext<'_>, dir: &str, files: &mut FileRegistry) -> Result<()> {
        let mut package = String::new();
        for segment in dir.split('/').filter(|s| !s.is_empty()) {
            if !package.is_empty() {
                package.push('/');
            }
            package.push_str(segment);
            files.register(FileEntry::generated(format!("{package}/__init__.py"), ""));
        }
        Ok(())
    }

    fn emit_types(
        &self,
        ctx: &EmitContext<'_>,
        declarations: &Declarations,
        dir: &str,
        files: &mut FileRegistry,
    ) -> Result<()> {
        if declarations.types.is_empty() {
            debug!(dir, "no types declared");
            return Ok(());
        }
        let types = TypesPy::build(ctx, declarations)?;
        files.register(FileEntry::from_generated(dir, &types, FileCategory::Generated));
        Ok(())
    }

    fn emit_security_schemes(
        &self,
        ctx: &EmitContext<'_>,
        declarations: &Declarations,
        dir: &str,
        files: &mut FileRegistry,
    ) -> Result<()> {
        if ctx.options.target != Target::Server {
            return Ok(());
        }
        for (name, scheme) in &declarations.security_schemes {
            let file = SecurityPy { name, scheme };
            files.register(FileEntry::from_generated(dir, &file, FileCategory::Scaffold));
        }
        Ok(())
    }

    fn emit_server_method(
        &self,
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
    ) -> Result<ServerMethod> {
        ServerMethod::build(ctx, resource, verb, method, NameStyle::Snake, |p| {
            format!("<{}>", py_var(p))
        })
    }

    fn emit_client_method(
        &self,
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
    ) -> Result<ClientMethod> {
        Ok(ClientMethod::build(ctx, resource, verb, method, NameStyle::Snake, py_var))
    }

    fn emit_server(&self, ctx: &EmitContext<'_>, files: &mut FileRegistry) -> Result<()> {
        let mut handlers = Vec::new();
        let mut blueprints = Vec::new();
        for &root in ctx.api.roots() {
            let blueprint = self.blueprint(ctx, root, &mut handlers)?;
            files.register(FileEntry::from_generated("", &blueprint, FileCategory::Generated));
            blueprints.push((format!("{}_if", blueprint.module), blueprint.variable()));
        }

        for handler in &handlers {
            files.register(FileEntry::from_generated("", handler, FileCategory::Scaffold));
        }
        let init = HandlersInit {
            handlers: handlers.into_iter().map(|h| h.name).collect(),
        };
        files.register(FileEntry::from_generated("", &init, FileCategory::Generated));

        if ctx.options.with_main {
            let app = AppPy {
                blueprints,
                with_apidocs: ctx.options.with_apidocs,
            };
            files.register(FileEntry::from_generated("", &app, FileCategory::Scaffold));
        } else {
            debug!("entry point disabled, skipping app.py");
        }
        if ctx.options.with_apidocs {
            register_apidocs(ctx.api, files);
        }
        Ok(())
    }

    fn emit_client(&self, ctx: &EmitContext<'_>, files: &mut FileRegistry) -> Result<()> {
        let mut calls = Vec::new();
        for node in ctx.api.resources() {
            for (verb, method) in &node.methods {
                calls.push(self.emit_client_method(ctx, node.id, *verb, method)?);
            }
        }
        let client = ClientPy {
            base_uri: ctx.api.base_uri.clone().unwrap_or_default(),
            calls,
        };
        files.register(FileEntry::from_generated("", &client, FileCategory::Generated));
        Ok(())
    }
}

/// Python code generator for a resolved API.
pub struct Generator<'a> {
    api: &'a ResolvedApi,
    options: &'a GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(api: &'a ResolvedApi, options: &'a GenerateOptions) -> Self {
        Self { api, options }
    }

    fn context(&self) -> EmitContext<'a> {
        EmitContext::for_backend(self.api, self.options, &PythonBackend)
    }
}

impl LanguageCodegen for Generator<'_> {
    fn language(&self) -> &'static str {
        "python"
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn preview(&self) -> Result<Vec<PreviewFile>> {
        preview(&PythonBackend, &self.context())
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        generate(&PythonBackend, &self.context(), output_dir)
    }
}
