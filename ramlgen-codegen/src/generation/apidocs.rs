//! The `apidocs` directory serving the RAML source of the API.

use std::path::{Path, PathBuf};

use ramlgen_core::{FileRules, GeneratedFile};
use ramlgen_raml::{ResolvedApi, RootSource};
use tracing::debug;

use super::{FileCategory, FileEntry, FileRegistry};

/// Directory the server mounts at `/apidocs/`.
pub const APIDOCS_DIR: &str = "apidocs";

/// Copy of the root RAML document.
pub struct RamlSource<'a>(pub &'a RootSource);

impl GeneratedFile for RamlSource<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(APIDOCS_DIR).join(&self.0.file_name)
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        self.0.content.clone()
    }
}

/// Landing page linking to the RAML document.
pub struct IndexHtml<'a> {
    pub title: &'a str,
    pub file_name: &'a str,
}

impl GeneratedFile for IndexHtml<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(APIDOCS_DIR).join("index.html")
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n</head>\n<body>\n  <h1>{title}</h1>\n  <p><a href=\"{file}\">{file}</a></p>\n</body>\n</html>\n",
            title = self.title,
            file = self.file_name
        )
    }
}

/// Register the `apidocs` files of `api` into `files`.
///
/// Nothing is registered when the API was not read from a file.
pub fn register_apidocs(api: &ResolvedApi, files: &mut FileRegistry) {
    let Some(source) = &api.source else {
        debug!("no RAML source to serve, skipping apidocs");
        return;
    };
    files.register(FileEntry::from_generated("", &RamlSource(source), FileCategory::Support));
    files.register(FileEntry::from_generated(
        "",
        &IndexHtml {
            title: &api.title,
            file_name: &source.file_name,
        },
        FileCategory::Support,
    ));
}

#[cfg(test)]
mod tests {
    use ramlgen_raml::{MemorySources, Resolver};

    use super::*;

    #[test]
    fn test_apidocs_copy_the_root_document() {
        let raml = "#%RAML 1.0\ntitle: Pets\n/pets:\n  get:\n";
        let sources = MemorySources::new().with_file("specs/pets.raml", raml);
        let api = Resolver::new(&sources).resolve_file("specs/pets.raml").unwrap();

        let mut files = FileRegistry::new();
        register_apidocs(&api, &mut files);

        assert_eq!(files.get("apidocs/pets.raml").unwrap().content, raml);
        let index = &files.get("apidocs/index.html").unwrap().content;
        assert!(index.contains("<a href=\"pets.raml\">pets.raml</a>"));
    }
}
