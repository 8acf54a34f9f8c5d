//! Handler stubs the user implements, and the package that exports them.

use std::path::{Path, PathBuf};

use ramlgen_codegen::CodeBuilder;
use ramlgen_core::{FileRules, GeneratedFile};

use super::GENERATED_HEADER;

/// Package holding the handler modules.
pub const HANDLERS_DIR: &str = "handlers";

/// `handlers/<name>.py`, written once.
#[derive(Debug, Clone)]
pub struct HandlerPy {
    pub name: String,
    pub params: Vec<String>,
    pub has_body: bool,
}

impl GeneratedFile for HandlerPy {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(HANDLERS_DIR).join(format!("{}.py", self.name))
    }

    fn rules(&self) -> FileRules {
        FileRules::user_owned()
    }

    fn render(&self) -> String {
        let imports = if self.has_body {
            "from flask import jsonify, request"
        } else {
            "from flask import jsonify"
        };
        CodeBuilder::python()
            .line(imports)
            .blank()
            .blank()
            .block(&format!("def {}({}):", self.name, self.params.join(", ")), |b| {
                b.when(self.has_body, |b| b.line("body = request.get_json()"))
                    .line("return jsonify({}), 501")
            })
            .build()
    }
}

/// `handlers/__init__.py`, re-exporting every handler.
#[derive(Debug, Clone)]
pub struct HandlersInit {
    pub handlers: Vec<String>,
}

impl GeneratedFile for HandlersInit {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(HANDLERS_DIR).join("__init__.py")
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        self.handlers
            .iter()
            .fold(CodeBuilder::python(), |b, name| {
                b.line(&format!("from .{name} import {name}"))
            })
            .build()
    }
}
