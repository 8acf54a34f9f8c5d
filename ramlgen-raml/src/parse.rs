//! Document parsing from source text.

use std::str::FromStr;

use tracing::debug;

use crate::{
    Error, Result,
    error::SourceContext,
    model::{ApiDefinition, Library},
};

const RAML_HEADER: &str = "#%RAML";

impl FromStr for ApiDefinition {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_api(s, "api.raml")
    }
}

/// Parse a root document with the given filename for error reporting.
pub fn parse_api(content: &str, filename: &str) -> Result<ApiDefinition> {
    check_header(content, filename);
    let source_ctx = SourceContext::new(content, filename);
    serde_yaml::from_str(content).map_err(|e| source_ctx.parse_error(e))
}

/// Parse a library document with the given filename for error reporting.
pub fn parse_library(content: &str, filename: &str) -> Result<Library> {
    check_header(content, filename);
    if is_blank(content) {
        return Ok(Library::default());
    }
    let source_ctx = SourceContext::new(content, filename);
    serde_yaml::from_str(content).map_err(|e| source_ctx.parse_error(e))
}

/// Only comments and whitespace, which YAML treats as no document at all.
fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn check_header(content: &str, filename: &str) {
    if !content.trim_start().starts_with(RAML_HEADER) {
        debug!(file = filename, "document has no RAML version header");
    }
}
