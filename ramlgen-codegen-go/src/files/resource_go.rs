//! Server code of one root resource: the generated interface with its routes,
//! and the implementation stub the user fills in.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{CodeBuilder, ServerMethod, generation::ImportCollector};
use ramlgen_core::{FileRules, GeneratedFile};

use super::{GENERATED_HEADER, middleware_type};
use crate::{naming::GO_NAMING, type_mapper::render_imports};

/// A handler of a root resource, with its request body type in Go.
#[derive(Debug, Clone)]
pub struct HandlerGo {
    pub method: ServerMethod,
    pub body: Option<String>,
}

/// Shared description of a root resource and its handlers.
#[derive(Debug, Clone)]
pub struct RootResource {
    pub package: String,
    /// Pascal name of the root resource (`Users`)
    pub name: String,
    pub uri: String,
    pub handlers: Vec<HandlerGo>,
    /// Imports of the library middlewares
    pub middleware_imports: ImportCollector,
    /// Imports of the request body types
    pub body_imports: ImportCollector,
}

impl RootResource {
    pub fn interface_name(&self) -> String {
        format!("{}Interface", self.name)
    }

    pub fn api_name(&self) -> String {
        format!("{}API", self.name)
    }

    fn file_stem(&self) -> String {
        GO_NAMING.file_name(&self.name)
    }
}

fn handler_doc(builder: CodeBuilder, handler: &ServerMethod) -> CodeBuilder {
    builder
        .line(&format!(
            "// {} is the handler for {} {}",
            handler.name,
            handler.verb.as_upper(),
            handler.route
        ))
        .comment("//", &handler.description)
}

/// Wrap the handler expression with each middleware, first listed outermost.
fn route_handler(handler: &ServerMethod) -> String {
    let base = format!("http.HandlerFunc(i.{})", handler.name);
    handler.middlewares.iter().rev().fold(base, |inner, middleware| {
        let constructor = match &middleware.alias {
            Some(alias) => format!(
                "{}.New{}",
                ramlgen_core::normalize_identifier(alias),
                middleware_type(&middleware.name)
            ),
            None => format!("New{}", middleware_type(&middleware.name)),
        };
        let scopes: Vec<String> = middleware.scopes.iter().map(|s| format!("\"{s}\"")).collect();
        format!(
            "{constructor}([]string{{{}}}).Handler({inner})",
            scopes.join(", ")
        )
    })
}

/// `<root>_if.go`: interface and route registration, regenerated every run.
pub struct InterfaceGo<'a>(pub &'a RootResource);

impl GeneratedFile for InterfaceGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}_if.go", self.0.file_stem()))
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let root = self.0;
        let interface = root.interface_name();

        let mut imports = ImportCollector::new();
        imports.add_module("net/http");
        imports.add_module("github.com/gorilla/mux");
        imports.merge(&root.middleware_imports);

        let builder = CodeBuilder::go()
            .line(&format!("package {}", root.package))
            .blank();
        render_imports(builder, &imports)
            .line(&format!(
                "// {interface} is the interface of the {} root resource",
                root.uri
            ))
            .block_with_close(&format!("type {interface} interface {{"), "}", |b| {
                root.handlers.iter().fold(b, |b, handler| {
                    handler_doc(b, &handler.method).line(&format!(
                        "{}(http.ResponseWriter, *http.Request)",
                        handler.method.name
                    ))
                })
            })
            .blank()
            .line(&format!(
                "// {interface}Routes registers the routes of the {} root resource",
                root.uri
            ))
            .block_with_close(
                &format!("func {interface}Routes(r *mux.Router, i {interface}) {{"),
                "}",
                |b| {
                    root.handlers.iter().fold(b, |b, handler| {
                        let method = &handler.method;
                        let verb = method.verb.as_upper();
                        if method.middlewares.is_empty() {
                            b.line(&format!(
                                "r.HandleFunc(\"{}\", i.{}).Methods(\"{verb}\")",
                                method.route, method.name
                            ))
                        } else {
                            b.line(&format!(
                                "r.Handle(\"{}\", {}).Methods(\"{verb}\")",
                                method.route,
                                route_handler(method)
                            ))
                        }
                    })
                },
            )
            .build()
    }
}

/// `<root>_api.go`: implementation stub, written once.
pub struct ApiGo<'a>(pub &'a RootResource);

impl GeneratedFile for ApiGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}_api.go", self.0.file_stem()))
    }

    fn rules(&self) -> FileRules {
        FileRules::user_owned()
    }

    fn render(&self) -> String {
        let root = self.0;
        let api = root.api_name();
        let decodes = root.handlers.iter().any(|h| h.body.is_some());

        let mut imports = ImportCollector::new();
        if decodes {
            imports.add_module("encoding/json");
        }
        imports.add_module("net/http");
        imports.merge(&root.body_imports);

        let builder = CodeBuilder::go()
            .line(&format!("package {}", root.package))
            .blank();
        render_imports(builder, &imports)
            .line(&format!("// {api} implements {}", root.interface_name()))
            .block_with_close(&format!("type {api} struct {{"), "}", |b| b)
            .each(&root.handlers, |b, handler| {
                let b = handler_doc(b.blank(), &handler.method);
                b.block_with_close(
                    &format!(
                        "func (api {api}) {}(w http.ResponseWriter, r *http.Request) {{",
                        handler.method.name
                    ),
                    "}",
                    |b| {
                        let b = match &handler.body {
                            Some(body) => b
                                .line(&format!("var reqBody {body}"))
                                .blank()
                                .line("// decode request")
                                .block_with_close(
                                    "if err := json.NewDecoder(r.Body).Decode(&reqBody); err != nil {",
                                    "}",
                                    |b| b.line("w.WriteHeader(http.StatusBadRequest)").line("return"),
                                )
                                .blank(),
                            None => b,
                        };
                        b.line("// uncomment below line to add header")
                            .line("// w.Header().Set(\"key\",\"value\")")
                            .line("w.WriteHeader(http.StatusNotImplemented)")
                    },
                )
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use ramlgen_codegen::Middleware;
    use ramlgen_raml::{HttpMethod, SchemeKind};

    use super::*;

    fn middleware(name: &str, alias: Option<&str>, scopes: &[&str]) -> Middleware {
        Middleware {
            reference: name.to_string(),
            name: name.to_string(),
            alias: alias.map(str::to_string),
            kind: SchemeKind::OAuth2,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            import_path: None,
        }
    }

    #[test]
    fn test_route_handler_nests_middlewares() {
        let api = ramlgen_raml::MemorySources::new().with_file("a.raml", "title: A\n/x:\n  get:\n");
        let api = ramlgen_raml::Resolver::new(&api).resolve_file("a.raml").unwrap();
        let method = ServerMethod {
            resource: api.roots()[0],
            verb: HttpMethod::Get,
            name: "XGet".into(),
            route: "/x".into(),
            params: Vec::new(),
            description: Vec::new(),
            body_type: None,
            middlewares: vec![
                middleware("oauth2", None, &["admin"]),
                middleware("token", Some("sec-lib"), &[]),
            ],
        };

        assert_eq!(
            route_handler(&method),
            "NewOauth2Middleware([]string{\"admin\"}).Handler(\
             sec_lib.NewTokenMiddleware([]string{}).Handler(http.HandlerFunc(i.XGet)))"
        );
    }
}
