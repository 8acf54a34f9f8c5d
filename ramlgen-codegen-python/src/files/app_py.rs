//! The Flask application entry point.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{CodeBuilder, generation::APIDOCS_DIR};
use ramlgen_core::{FileRules, GeneratedFile};

/// `app.py`: registers every blueprint. Written once.
#[derive(Debug, Clone)]
pub struct AppPy {
    /// `(module, variable)` of each blueprint
    pub blueprints: Vec<(String, String)>,
    pub with_apidocs: bool,
}

impl GeneratedFile for AppPy {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("app.py")
    }

    fn rules(&self) -> FileRules {
        FileRules::user_owned()
    }

    fn render(&self) -> String {
        let flask = if self.with_apidocs {
            "from flask import Flask, send_from_directory"
        } else {
            "from flask import Flask"
        };
        let builder = CodeBuilder::python().line(flask).blank();
        let builder = self
            .blueprints
            .iter()
            .fold(builder, |b, (module, variable)| {
                b.line(&format!("from {module} import {variable}"))
            })
            .blank()
            .blank()
            .line("app = Flask(__name__)")
            .blank();
        self.blueprints
            .iter()
            .fold(builder, |b, (_, variable)| {
                b.line(&format!("app.register_blueprint({variable})"))
            })
            .when(self.with_apidocs, |b| {
                b.blank()
                    .blank()
                    .line(&format!("@app.route(\"/{APIDOCS_DIR}/<path:path>\")"))
                    .block("def apidocs(path):", |b| {
                        b.line(&format!("return send_from_directory(\"{APIDOCS_DIR}\", path)"))
                    })
            })
            .blank()
            .blank()
            .block("if __name__ == \"__main__\":", |b| b.line("app.run(debug=True)"))
            .build()
    }
}
