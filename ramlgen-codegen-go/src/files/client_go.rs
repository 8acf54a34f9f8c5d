//! The HTTP client of the whole API.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{ClientArg, ClientMethod, CodeBuilder, generation::ImportCollector};
use ramlgen_core::{FileRules, GeneratedFile};

use super::GENERATED_HEADER;
use crate::{naming::go_var, type_mapper::render_imports};

/// A client method with its argument types mapped to Go.
#[derive(Debug, Clone)]
pub struct CallGo {
    pub method: ClientMethod,
    /// Go type of the request body, `interface{}` when undeclared
    pub body: String,
    /// Go type of the success response, for the doc comment
    pub response: Option<String>,
}

/// `client_<package>.go`: one method per resource and verb.
#[derive(Debug, Clone)]
pub struct ClientGo {
    pub package: String,
    pub title: String,
    pub base_uri: String,
    pub calls: Vec<CallGo>,
    /// Imports of library body types
    pub imports: ImportCollector,
}

impl ClientGo {
    fn params(call: &CallGo) -> String {
        call.method
            .args
            .iter()
            .filter_map(|arg| match arg {
                ClientArg::Receiver => None,
                ClientArg::Body => Some(format!("body {}", call.body)),
                ClientArg::Path(name) => Some(format!("{} string", go_var(name))),
                ClientArg::Headers => Some("headers".to_string()),
                ClientArg::QueryParams => Some("queryParams map[string]interface{}".to_string()),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_call(builder: CodeBuilder, call: &CallGo) -> CodeBuilder {
        let method = &call.method;
        let body = if method.args.contains(&ClientArg::Body) {
            "body"
        } else {
            "nil"
        };
        builder
            .blank()
            .line(&format!("// {} sends {} {}", method.name, method.verb.as_upper(), method.uri))
            .comment("//", &method.description)
            .when(call.response.is_some(), |b| {
                b.line(&format!(
                    "// A successful response carries a {}",
                    call.response.as_deref().unwrap_or_default()
                ))
            })
            .block_with_close(
                &format!(
                    "func (c *Client) {}({}) (*http.Response, error) {{",
                    method.name,
                    Self::params(call)
                ),
                "}",
                |b| {
                    b.line(&format!(
                        "return c.do(\"{}\", {}, {body}, headers, queryParams)",
                        method.verb.as_upper(),
                        method.url
                    ))
                },
            )
    }

    fn render_do(builder: CodeBuilder) -> CodeBuilder {
        builder
            .blank()
            .block_with_close(
                "func (c *Client) do(method, path string, body interface{}, headers, queryParams map[string]interface{}) (*http.Response, error) {",
                "}",
                |b| {
                    b.line("var reader io.Reader")
                        .block_with_close("if body != nil {", "}", |b| {
                            b.line("data, err := json.Marshal(body)")
                                .block_with_close("if err != nil {", "}", |b| b.line("return nil, err"))
                                .line("reader = bytes.NewReader(data)")
                        })
                        .blank()
                        .line("req, err := http.NewRequest(method, c.BaseURI+path, reader)")
                        .block_with_close("if err != nil {", "}", |b| b.line("return nil, err"))
                        .line("req.Header.Set(\"Content-Type\", \"application/json\")")
                        .block_with_close("for k, v := range headers {", "}", |b| {
                            b.line("req.Header.Set(k, fmt.Sprint(v))")
                        })
                        .blank()
                        .line("q := req.URL.Query()")
                        .block_with_close("for k, v := range queryParams {", "}", |b| {
                            b.line("q.Set(k, fmt.Sprint(v))")
                        })
                        .line("req.URL.RawQuery = q.Encode()")
                        .blank()
                        .line("return c.client.Do(req)")
                },
            )
    }
}

impl GeneratedFile for ClientGo {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("client_{}.go", self.package))
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let mut imports = ImportCollector::new();
        for module in ["bytes", "encoding/json", "fmt", "io", "net/http"] {
            imports.add_module(module);
        }
        imports.merge(&self.imports);

        let builder = CodeBuilder::go()
            .line(&format!("package {}", self.package))
            .blank();
        let builder = render_imports(builder, &imports)
            .block_with_close("const (", ")", |b| {
                b.line(&format!("defaultBaseURI = \"{}\"", self.base_uri))
            })
            .blank()
            .line(&format!("// Client is the client of the {} API", self.title))
            .block_with_close("type Client struct {", "}", |b| {
                b.line("client  http.Client").line("BaseURI string")
            })
            .blank()
            .line("// NewClient creates a client using the default base URI")
            .block_with_close("func NewClient() *Client {", "}", |b| {
                b.block_with_close("return &Client{", "}", |b| {
                    b.line("client:  http.Client{},").line("BaseURI: defaultBaseURI,")
                })
            });
        let builder = self.calls.iter().fold(builder, Self::render_call);
        Self::render_do(builder).build()
    }
}
