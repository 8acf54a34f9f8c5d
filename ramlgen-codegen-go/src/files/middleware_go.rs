//! Security middleware, one per declared scheme.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{CodeBuilder, paths::comment_lines};
use ramlgen_core::{FileRules, GeneratedFile};
use ramlgen_raml::{SchemeKind, SecurityScheme};

use crate::naming::GO_NAMING;

/// Go type of the middleware for a scheme (`oauth2` -> `Oauth2Middleware`).
pub fn middleware_type(scheme: &str) -> String {
    format!("{}Middleware", GO_NAMING.type_name(scheme))
}

/// The middleware file of a security scheme, written once for the user to
/// complete.
pub struct MiddlewareGo<'a> {
    pub package: String,
    pub name: &'a str,
    pub scheme: &'a SecurityScheme,
}

impl<'a> MiddlewareGo<'a> {
    pub fn new(package: impl Into<String>, name: &'a str, scheme: &'a SecurityScheme) -> Self {
        Self {
            package: package.into(),
            name,
            scheme,
        }
    }

    fn check(&self, builder: CodeBuilder) -> CodeBuilder {
        match self.scheme.scheme_kind() {
            SchemeKind::OAuth2 => builder
                .line("token := strings.TrimPrefix(r.Header.Get(\"Authorization\"), \"Bearer \")")
                .block_with_close("if token == \"\" {", "}", |b| {
                    b.line("w.WriteHeader(http.StatusUnauthorized)").line("return")
                })
                .line("// validate the token and check that it grants m.scopes here"),
            _ => {
                let headers = self.scheme.header_names();
                let builder = headers.iter().fold(builder, |b, header| {
                    b.block_with_close(
                        &format!("if r.Header.Get(\"{header}\") == \"\" {{"),
                        "}",
                        |b| b.line("w.WriteHeader(http.StatusUnauthorized)").line("return"),
                    )
                });
                builder.line(&format!(
                    "// validate the credentials of the {} scheme here",
                    self.scheme.kind
                ))
            }
        }
    }
}

impl GeneratedFile for MiddlewareGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}_middleware.go", GO_NAMING.file_name(self.name)))
    }

    fn rules(&self) -> FileRules {
        FileRules::user_owned()
    }

    fn render(&self) -> String {
        let ty = middleware_type(self.name);
        let uses_strings = self.scheme.scheme_kind() == SchemeKind::OAuth2;
        CodeBuilder::go()
            .line(&format!("package {}", self.package))
            .blank()
            .block_with_close("import (", ")", |b| {
                b.line("\"net/http\"").when(uses_strings, |b| b.line("\"strings\""))
            })
            .blank()
            .line(&format!("// {ty} checks requests against the {} security scheme", self.name))
            .comment("//", &comment_lines(self.scheme.description.as_deref()))
            .block_with_close(&format!("type {ty} struct {{"), "}", |b| b.line("scopes []string"))
            .blank()
            .line(&format!("// New{ty} creates a {ty} requiring the given scopes"))
            .block_with_close(&format!("func New{ty}(scopes []string) *{ty} {{"), "}", |b| {
                b.line(&format!("return &{ty}{{scopes: scopes}}"))
            })
            .blank()
            .line("// Handler wraps next with the security check")
            .block_with_close(
                &format!("func (m *{ty}) Handler(next http.Handler) http.Handler {{"),
                "}",
                |b| {
                    b.block_with_close(
                        "return http.HandlerFunc(func(w http.ResponseWriter, r *http.Request) {",
                        "})",
                        |b| self.check(b).line("next.ServeHTTP(w, r)"),
                    )
                },
            )
            .build()
    }
}
