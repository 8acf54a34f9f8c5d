//! The `requests` based client of the whole API.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{ClientArg, ClientMethod, CodeBuilder};
use ramlgen_core::{FileRules, GeneratedFile};

use super::GENERATED_HEADER;
use crate::naming::py_var;

/// `client.py`
#[derive(Debug, Clone)]
pub struct ClientPy {
    pub base_uri: String,
    pub calls: Vec<ClientMethod>,
}

impl ClientPy {
    fn params(call: &ClientMethod) -> String {
        call.args
            .iter()
            .map(|arg| match arg {
                ClientArg::Receiver => "self".to_string(),
                ClientArg::Body => "data".to_string(),
                ClientArg::Path(name) => py_var(name),
                ClientArg::Headers => "headers=None".to_string(),
                ClientArg::QueryParams => "query_params=None".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_call(builder: CodeBuilder, call: &ClientMethod) -> CodeBuilder {
        let verb = call.verb.as_upper();
        let mut doc = call.description.clone();
        doc.push(format!("It is method for {verb} {}", call.uri));
        let body = if call.args.contains(&ClientArg::Body) {
            "json=data, "
        } else {
            ""
        };

        builder
            .blank()
            .block(&format!("def {}({}):", call.name, Self::params(call)), |b| {
                b.docstring(&doc)
                    .line(&format!("uri = self.url + {}", call.url))
                    .line(&format!(
                        "return self.session.{}(uri, {body}headers=headers, params=query_params)",
                        call.verb.as_str()
                    ))
            })
    }
}

impl GeneratedFile for ClientPy {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("client.py")
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let builder = CodeBuilder::python()
            .line("import requests")
            .blank()
            .line(&format!("BASE_URI = \"{}\"", self.base_uri))
            .blank()
            .blank()
            .block("class Client:", |b| {
                b.block("def __init__(self):", |b| {
                    b.line("self.url = BASE_URI")
                        .line("self.session = requests.Session()")
                })
            });
        // methods live inside the class body
        let builder = self
            .calls
            .iter()
            .fold(builder.indent(), Self::render_call);
        builder.dedent().build()
    }
}
