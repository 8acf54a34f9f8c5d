use std::path::Path;

use ramlgen_codegen::{
    Backend, ClientMethod, EmitContext, GenerateOptions, GenerateResult, LanguageCodegen,
    PreviewFile, Result, ServerMethod, Target, TypeMapper, generate,
    generation::{FileCategory, FileEntry, FileRegistry, ImportCollector, register_apidocs},
    paths::{NameStyle, resource_type_name},
    preview,
};
use ramlgen_core::normalize_identifier;
use ramlgen_raml::{Declarations, HttpMethod, Method, ResolvedApi, ResourceId, TypeExpr};
use tracing::debug;

use crate::{
    files::{
        ApiGo, CallGo, ClientGo, DateTimeGo, HandlerGo, InterfaceGo, MainGo, MiddlewareGo,
        RootResource, TypeGo,
    },
    naming::{go_var, package_name},
    type_mapper::{GoTypeMapper, SUPPORT_PACKAGE, collect_imports},
};

/// Emission steps for Go: gorilla/mux servers and net/http clients.
pub struct GoBackend;

impl GoBackend {
    /// Package of the code emitted into `dir`.
    fn package<'a>(ctx: &'a EmitContext<'_>, dir: &'a str) -> &'a str {
        if dir.is_empty() {
            &ctx.options.package
        } else {
            package_name(dir)
        }
    }

    /// Map a declared type name, recording the packages it needs.
    fn map_type(
        ctx: &EmitContext<'_>,
        type_name: &str,
        context: &str,
        imports: &mut ImportCollector,
    ) -> Result<String> {
        let expr = TypeExpr::parse(type_name);
        collect_imports(ctx, &expr, context, imports)?;
        Ok(GoTypeMapper.map(&expr))
    }

    fn root_resource(&self, ctx: &EmitContext<'_>, root: ResourceId) -> Result<RootResource> {
        let node = ctx.api.resource(root);
        let mut handlers = Vec::new();
        let mut middleware_imports = ImportCollector::new();
        let mut body_imports = ImportCollector::new();

        for id in ctx.api.subtree(root) {
            for (verb, method) in &ctx.api.resource(id).methods {
                let server = self.emit_server_method(ctx, id, *verb, method)?;
                for middleware in &server.middlewares {
                    if let (Some(path), Some(alias)) = (&middleware.import_path, &middleware.alias) {
                        middleware_imports.add(path, &normalize_identifier(alias));
                    }
                }
                let context = format!("body of {} {}", server.verb.as_upper(), server.route);
                let body = match &server.body_type {
                    Some(ty) => Some(Self::map_type(ctx, ty, &context, &mut body_imports)?),
                    None => None,
                };
                handlers.push(HandlerGo {
                    method: server,
                    body,
                });
            }
        }

        Ok(RootResource {
            package: ctx.options.package.clone(),
            name: resource_type_name(&node.uri),
            uri: node.full_uri.clone(),
            handlers,
            middleware_imports,
            body_imports,
        })
    }
}

impl Backend for GoBackend {
    fn name(&self) -> &'static str {
        "go"
    }

    fn support_alias(&self) -> Option<&'static str> {
        Some(SUPPORT_PACKAGE)
    }

    fn emit_types(
        &self,
        ctx: &EmitContext<'_>,
        declarations: &Declarations,
        dir: &str,
        files: &mut FileRegistry,
    ) -> Result<()> {
        let package = Self::package(ctx, dir);
        for (name, ty) in &declarations.types {
            let file = TypeGo::build(ctx, package, name, ty)?;
            files.register(FileEntry::from_generated(dir, &file, FileCategory::Generated));
        }
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
        let package = Self::package(ctx, dir);
        for (name, scheme) in &declarations.security_schemes {
            let file = MiddlewareGo::new(package, name, scheme);
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
        ServerMethod::build(ctx, resource, verb, method, NameStyle::Pascal, |p| format!("{{{p}}}"))
    }

    fn emit_client_method(
        &self,
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
    ) -> Result<ClientMethod> {
        Ok(ClientMethod::build(ctx, resource, verb, method, NameStyle::Pascal, go_var))
    }

    fn emit_server(&self, ctx: &EmitContext<'_>, files: &mut FileRegistry) -> Result<()> {
        files.register(FileEntry::from_generated("", &DateTimeGo, FileCategory::Support));

        let mut roots = Vec::new();
        for &root in ctx.api.roots() {
            let resource = self.root_resource(ctx, root)?;
            files.register(FileEntry::from_generated(
                "",
                &InterfaceGo(&resource),
                FileCategory::Generated,
            ));
            files.register(FileEntry::from_generated("", &ApiGo(&resource), FileCategory::Scaffold));
            roots.push(resource.name);
        }

        if ctx.options.with_main {
            let main = MainGo {
                package: ctx.options.package.clone(),
                roots,
                with_apidocs: ctx.options.with_apidocs,
            };
            files.register(FileEntry::from_generated("", &main, FileCategory::Scaffold));
        } else {
            debug!("entry point disabled, skipping main.go");
        }
        if ctx.options.with_apidocs {
            register_apidocs(ctx.api, files);
        }
        Ok(())
    }

    fn emit_client(&self, ctx: &EmitContext<'_>, files: &mut FileRegistry) -> Result<()> {
        files.register(FileEntry::from_generated("", &DateTimeGo, FileCategory::Support));

        let mut calls = Vec::new();
        let mut imports = ImportCollector::new();
        for node in ctx.api.resources() {
            for (verb, method) in &node.methods {
                let call = self.emit_client_method(ctx, node.id, *verb, method)?;
                let context = format!("body of {} {}", verb.as_upper(), node.full_uri);
                let body = match &call.body_type {
                    Some(ty) => Self::map_type(ctx, ty, &context, &mut imports)?,
                    None => "interface{}".to_string(),
                };
                let response = call.response_type.as_deref().map(|ty| GoTypeMapper.map_name(ty));
                calls.push(CallGo {
                    method: call,
                    body,
                    response,
                });
            }
        }

        let client = ClientGo {
            package: ctx.options.package.clone(),
            title: ctx.api.title.clone(),
            base_uri: ctx.api.base_uri.clone().unwrap_or_default(),
            calls,
            imports,
        };
        files.register(FileEntry::from_generated("", &client, FileCategory::Generated));
        Ok(())
    }
}

/// Go code generator for a resolved API.
pub struct Generator<'a> {
    api: &'a ResolvedApi,
    options: &'a GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(api: &'a ResolvedApi, options: &'a GenerateOptions) -> Self {
        Self { api, options }
    }

    fn context(&self) -> EmitContext<'a> {
        EmitContext::for_backend(self.api, self.options, &GoBackend)
    }
}

impl LanguageCodegen for Generator<'_> {
    fn language(&self) -> &'static str {
        "go"
    }

    fn file_extension(&self) -> &'static str {
        "go"
    }

    fn preview(&self) -> Result<Vec<PreviewFile>> {
        preview(&GoBackend, &self.context())
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        generate(&GoBackend, &self.context(), output_dir)
    }
}
