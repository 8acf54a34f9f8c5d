use std::collections::BTreeSet;

use indexmap::IndexMap;

/// Deduplicated imports of one generated file.
///
/// Modules keep the order they were first added in; the symbols of a
/// module are sorted. A module with no symbols is a plain import
/// (`import "net/http"`, `import requests`).
///
/// ```
/// use ramlgen_codegen::generation::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("typing", "Optional");
/// imports.add("typing", "List");
/// imports.add_module("requests");
///
/// let lines: Vec<String> = imports
///     .iter()
///     .map(|(module, symbols)| match symbols.is_empty() {
///         true => format!("import {module}"),
///         false => format!(
///             "from {module} import {}",
///             symbols.iter().cloned().collect::<Vec<_>>().join(", ")
///         ),
///     })
///     .collect();
/// assert_eq!(lines, ["from typing import List, Optional", "import requests"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    modules: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import `symbol` from `module`. For Go the symbol is the alias.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    pub fn add_module(&mut self, module: &str) {
        self.modules.entry(module.to_string()).or_default();
    }

    /// Add everything `other` imports.
    pub fn merge(&mut self, other: &ImportCollector) {
        for (module, symbols) in &other.modules {
            self.modules
                .entry(module.clone())
                .or_default()
                .extend(symbols.iter().cloned());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.modules.iter().map(|(m, s)| (m.as_str(), s))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modules(imports: &ImportCollector) -> Vec<&str> {
        imports.iter().map(|(module, _)| module).collect()
    }

    #[test]
    fn test_symbols_are_deduplicated_and_sorted() {
        let mut imports = ImportCollector::new();
        imports.add("typing", "Optional");
        imports.add("typing", "List");
        imports.add("typing", "Optional");
        imports.add_module("requests");

        assert_eq!(modules(&imports), ["typing", "requests"]);
        let (_, typing) = imports.iter().next().unwrap();
        assert_eq!(typing.iter().collect::<Vec<_>>(), ["List", "Optional"]);
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let mut server = ImportCollector::new();
        server.add_module("net/http");

        let mut body = ImportCollector::new();
        body.add("example.com/app/libs/common", "common");
        body.add_module("net/http");
        server.merge(&body);

        assert_eq!(modules(&server), ["net/http", "example.com/app/libs/common"]);
        assert!(!server.is_empty());
    }
}
