//! The per-language emission contract and the driver that runs it.

use std::path::Path;

use ramlgen_raml::{
    Declarations, HttpMethod, Library, Method, Namespace, ResolvedApi, ResourceId, library_rel_dir,
};
use tracing::debug;

use crate::{
    ClientMethod, GenerateResult, PreviewFile, Result, ServerMethod, generation::FileRegistry,
};

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Server,
    Client,
}

/// Options shared by every backend.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub target: Target,
    /// Package name of the root-level code
    pub package: String,
    /// Import path of the output root; library packages live below it
    pub import_path: String,
    /// Generate the server entry point
    pub with_main: bool,
    /// Generate the `apidocs` directory serving the RAML source
    pub with_apidocs: bool,
    /// Overwrite user-owned files that already exist
    pub overwrite: bool,
}

impl GenerateOptions {
    pub const DEFAULT_SERVER_PACKAGE: &'static str = "main";
    pub const DEFAULT_SERVER_IMPORT_PATH: &'static str = "examples.com/ramlcode";
    pub const DEFAULT_CLIENT_PACKAGE: &'static str = "client";
    pub const DEFAULT_CLIENT_IMPORT_PATH: &'static str = "examples.com/client";

    pub fn server() -> Self {
        Self {
            target: Target::Server,
            package: Self::DEFAULT_SERVER_PACKAGE.to_string(),
            import_path: Self::DEFAULT_SERVER_IMPORT_PATH.to_string(),
            with_main: true,
            with_apidocs: true,
            overwrite: false,
        }
    }

    pub fn client() -> Self {
        Self {
            target: Target::Client,
            package: Self::DEFAULT_CLIENT_PACKAGE.to_string(),
            import_path: Self::DEFAULT_CLIENT_IMPORT_PATH.to_string(),
            with_main: false,
            with_apidocs: false,
            overwrite: false,
        }
    }
}

/// Everything an emission step may look at.
///
/// The namespace is built once from the root declarations and handed to
/// every step explicitly.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub api: &'a ResolvedApi,
    pub ns: Namespace<'a>,
    pub options: &'a GenerateOptions,
}

impl<'a> EmitContext<'a> {
    pub fn new(api: &'a ResolvedApi, options: &'a GenerateOptions) -> Self {
        Self {
            api,
            ns: api.namespace(),
            options,
        }
    }

    /// Context for `backend`, with its support alias reserved.
    pub fn for_backend(
        api: &'a ResolvedApi,
        options: &'a GenerateOptions,
        backend: &dyn Backend,
    ) -> Self {
        let ctx = Self::new(api, options);
        match backend.support_alias() {
            Some(alias) => Self {
                ns: ctx.ns.with_support_alias(alias),
                ..ctx
            },
            None => ctx,
        }
    }

    /// Import path of the package holding the qualified `name`, `None` when
    /// it is unqualified.
    pub fn import_path_for(&self, name: &str, context: &str) -> Result<Option<String>> {
        Ok(self
            .ns
            .import_path_for(name, &self.options.import_path, context)?)
    }
}

/// A target language.
///
/// Each language implements the emission steps; [`plan`] runs them in order
/// and collects the files they register.
pub trait Backend {
    /// Language identifier
    fn name(&self) -> &'static str;

    /// Alias reserved for the language's support package, if any.
    fn support_alias(&self) -> Option<&'static str> {
        None
    }

    /// Emit the types declared in `declarations` into `dir`.
    fn emit_types(
        &self,
        ctx: &EmitContext<'_>,
        declarations: &Declarations,
        dir: &str,
        files: &mut FileRegistry,
    ) -> Result<()>;

    /// Emit the security artifacts (middleware, decorators) for the schemes
    /// declared in `declarations` into `dir`.
    fn emit_security_schemes(
        &self,
        ctx: &EmitContext<'_>,
        declarations: &Declarations,
        dir: &str,
        files: &mut FileRegistry,
    ) -> Result<()>;

    /// Describe the server handler of `verb` on a resource.
    fn emit_server_method(
        &self,
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
    ) -> Result<ServerMethod>;

    /// Describe the client call of `verb` on a resource.
    fn emit_client_method(
        &self,
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
    ) -> Result<ClientMethod>;

    /// Extra files for a library package directory, e.g. a package marker.
    fn emit_package(&self, _ctx: &EmitContext<'_>, _dir: &str, _files: &mut FileRegistry) -> Result<()> {
        Ok(())
    }

    /// Emit a library and, recursively, the libraries it imports.
    ///
    /// The output directory is the library's declared path without its
    /// extension, normalized, below the output root.
    fn emit_library(
        &self,
        ctx: &EmitContext<'_>,
        library: &Library,
        files: &mut FileRegistry,
    ) -> Result<()> {
        let dir = library_rel_dir(&library.path);
        debug!(library = %library.path, dir = %dir, "emitting library");
        files.register_dir(dir.as_str());
        self.emit_package(ctx, &dir, files)?;
        self.emit_types(ctx, &library.declarations, &dir, files)?;
        self.emit_security_schemes(ctx, &library.declarations, &dir, files)?;
        for nested in library.declarations.libraries.values() {
            self.emit_library(ctx, nested, files)?;
        }
        Ok(())
    }

    /// Emit the root-level server code (routes, handlers, entry point).
    fn emit_server(&self, ctx: &EmitContext<'_>, files: &mut FileRegistry) -> Result<()>;

    /// Emit the root-level client code.
    fn emit_client(&self, ctx: &EmitContext<'_>, files: &mut FileRegistry) -> Result<()>;
}

/// Run every emission step and return the planned files.
///
/// Libraries come first, then root types and security artifacts, then the
/// server or client code.
pub fn plan(backend: &dyn Backend, ctx: &EmitContext<'_>) -> Result<FileRegistry> {
    let mut files = FileRegistry::new();
    for library in ctx.api.declarations.libraries.values() {
        backend.emit_library(ctx, library, &mut files)?;
    }
    backend.emit_types(ctx, &ctx.api.declarations, "", &mut files)?;
    backend.emit_security_schemes(ctx, &ctx.api.declarations, "", &mut files)?;
    match ctx.options.target {
        Target::Server => backend.emit_server(ctx, &mut files)?,
        Target::Client => backend.emit_client(ctx, &mut files)?,
    }
    debug!(backend = backend.name(), files = files.len(), "planned output");
    Ok(files)
}

/// Plan and return the files without writing them.
pub fn preview(backend: &dyn Backend, ctx: &EmitContext<'_>) -> Result<Vec<PreviewFile>> {
    Ok(plan(backend, ctx)?.preview())
}

/// Plan and write the files below `output_dir`.
pub fn generate(
    backend: &dyn Backend,
    ctx: &EmitContext<'_>,
    output_dir: &Path,
) -> Result<GenerateResult> {
    plan(backend, ctx)?.write_all(output_dir, ctx.options.overwrite)
}
