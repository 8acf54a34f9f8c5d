//! Flask decorators enforcing security schemes.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{CodeBuilder, paths::comment_lines};
use ramlgen_core::{FileRules, GeneratedFile};
use ramlgen_raml::{SchemeKind, SecurityScheme};

use crate::naming::PY_NAMING;

/// Decorator and module name of a scheme (`oauth2_<name>` for OAuth 2.0,
/// `security_<name>` otherwise).
pub fn decorator_name(scheme: &str, kind: &SchemeKind) -> String {
    let prefix = match kind {
        SchemeKind::OAuth2 => "oauth2",
        _ => "security",
    };
    format!("{prefix}_{}", PY_NAMING.file_name(scheme))
}

/// The decorator module of one scheme, written once for the user to complete.
pub struct SecurityPy<'a> {
    pub name: &'a str,
    pub scheme: &'a SecurityScheme,
}

impl SecurityPy<'_> {
    fn check(&self, builder: CodeBuilder) -> CodeBuilder {
        match self.scheme.scheme_kind() {
            SchemeKind::OAuth2 => builder
                .line("token = request.headers.get(\"Authorization\", \"\")")
                .block("if not token.startswith(\"Bearer \"):", |b| b.line("abort(401)"))
                .line("# validate the token and check that it grants the scopes here"),
            _ => self
                .scheme
                .header_names()
                .iter()
                .fold(builder, |b, header| {
                    b.block(&format!("if not request.headers.get(\"{header}\"):"), |b| {
                        b.line("abort(401)")
                    })
                })
                .line(&format!(
                    "# validate the credentials of the {} scheme here",
                    self.scheme.kind
                )),
        }
    }
}

impl GeneratedFile for SecurityPy<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!(
            "{}.py",
            decorator_name(self.name, &self.scheme.scheme_kind())
        ))
    }

    fn rules(&self) -> FileRules {
        FileRules::user_owned()
    }

    fn render(&self) -> String {
        let decorator = decorator_name(self.name, &self.scheme.scheme_kind());
        let mut doc = vec![format!("Check requests against the {} security scheme", self.name)];
        doc.extend(comment_lines(self.scheme.description.as_deref()));

        CodeBuilder::python()
            .line("from functools import wraps")
            .blank()
            .line("from flask import abort, request")
            .blank()
            .blank()
            .block(&format!("def {decorator}(scopes=None):"), |b| {
                b.docstring(&doc)
                    .blank()
                    .block("def decorator(f):", |b| {
                        b.line("@wraps(f)")
                            .block("def decorated(*args, **kwargs):", |b| {
                                self.check(b).line("return f(*args, **kwargs)")
                            })
                            .blank()
                            .line("return decorated")
                    })
                    .blank()
                    .line("return decorator")
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorator_name() {
        assert_eq!(decorator_name("oauth2", &SchemeKind::OAuth2), "oauth2_oauth2");
        assert_eq!(decorator_name("apiKey", &SchemeKind::PassThrough), "security_api_key");
    }

    #[test]
    fn test_oauth2_decorator() {
        let scheme = SecurityScheme {
            kind: "OAuth 2.0".into(),
            ..SecurityScheme::default()
        };
        let file = SecurityPy {
            name: "oauth2",
            scheme: &scheme,
        };

        assert_eq!(file.path(Path::new("")), PathBuf::from("oauth2_oauth2.py"));
        insta::assert_snapshot!(file.render(), @r#"
        from functools import wraps

        from flask import abort, request


        def oauth2_oauth2(scopes=None):
            """
            Check requests against the oauth2 security scheme
            """

            def decorator(f):
                @wraps(f)
                def decorated(*args, **kwargs):
                    token = request.headers.get("Authorization", "")
                    if not token.startswith("Bearer "):
                        abort(401)
                    # validate the token and check that it grants the scopes here
                    return f(*args, **kwargs)

                return decorated

            return decorator
        "#);
    }
}
