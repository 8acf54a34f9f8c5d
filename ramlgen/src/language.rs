//! Unified language dispatch.
//!
//! Centralizes language-specific generator creation.

use clap::ValueEnum;
use ramlgen_codegen::{GenerateOptions, LanguageCodegen};
use ramlgen_codegen_go::Generator as GoGenerator;
use ramlgen_codegen_python::Generator as PythonGenerator;
use ramlgen_raml::ResolvedApi;
use serde::Deserialize;

/// Target language of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Go,
    Python,
}

/// Generator creation for a target language.
pub struct LanguageSupport {
    language: Language,
}

impl LanguageSupport {
    pub fn get(language: Language) -> Self {
        Self { language }
    }

    /// Create a generator for this language.
    pub fn generator<'a>(
        &self,
        api: &'a ResolvedApi,
        options: &'a GenerateOptions,
    ) -> Box<dyn LanguageCodegen + 'a> {
        match self.language {
            Language::Go => Box::new(GoGenerator::new(api, options)),
            Language::Python => Box::new(PythonGenerator::new(api, options)),
        }
    }
}
