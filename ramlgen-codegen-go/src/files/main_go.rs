//! The server entry point.

use std::path::{Path, PathBuf};

use ramlgen_codegen::CodeBuilder;
use ramlgen_core::{FileRules, GeneratedFile};

/// `main.go`: registers every root resource on a mux router. Written once.
pub struct MainGo {
    pub package: String,
    /// Pascal names of the root resources
    pub roots: Vec<String>,
    pub with_apidocs: bool,
}

impl GeneratedFile for MainGo {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("main.go")
    }

    fn rules(&self) -> FileRules {
        FileRules::user_owned()
    }

    fn render(&self) -> String {
        CodeBuilder::go()
            .line(&format!("package {}", self.package))
            .blank()
            .block_with_close("import (", ")", |b| {
                b.line("\"log\"")
                    .line("\"net/http\"")
                    .blank()
                    .line("\"github.com/gorilla/mux\"")
            })
            .blank()
            .block_with_close("func main() {", "}", |b| {
                let b = b
                    .line("r := mux.NewRouter()")
                    .blank()
                    .when(self.with_apidocs, |b| {
                        b.line("// home page")
                            .line("r.PathPrefix(\"/apidocs/\").Handler(http.StripPrefix(\"/apidocs/\", http.FileServer(http.Dir(\"./apidocs/\"))))")
                            .blank()
                    })
                    .line("// routes");
                self.roots
                    .iter()
                    .fold(b, |b, root| {
                        b.line(&format!("{root}InterfaceRoutes(r, {root}API{{}})"))
                    })
                    .blank()
                    .line("log.Println(\"starting server\")")
                    .line("log.Fatal(http.ListenAndServe(\":5000\", r))")
            })
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_without_apidocs() {
        let main = MainGo {
            package: "main".into(),
            roots: vec!["Users".into(), "Orders".into()],
            with_apidocs: false,
        };
        let code = main.render();

        assert!(code.contains("\tUsersInterfaceRoutes(r, UsersAPI{})\n\tOrdersInterfaceRoutes(r, OrdersAPI{})\n"));
        assert!(!code.contains("apidocs"));
        assert!(main.rules().header.is_none());
    }
}
