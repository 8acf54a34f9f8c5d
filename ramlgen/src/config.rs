//! `ramlgen.toml` and how it combines with command line flags.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use ramlgen_codegen::{GenerateOptions, Target};
use serde::Deserialize;
use tracing::debug;

use crate::language::Language;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG: &str = "ramlgen.toml";

/// Optional project settings. Every field can be overridden by a flag.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub language: Option<Language>,
    pub import_path: Option<String>,
    pub package: Option<String>,
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load the file at `path`. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub language: Option<Language>,
    pub import_path: Option<String>,
    pub package: Option<String>,
    pub dir: Option<PathBuf>,
}

/// Settings of one run: flag, then config, then built-in default.
#[derive(Debug)]
pub struct Settings {
    pub language: Language,
    pub dir: PathBuf,
    pub options: GenerateOptions,
}

impl Settings {
    pub fn resolve(target: Target, config: Config, flags: Overrides) -> Self {
        let mut options = match target {
            Target::Server => GenerateOptions::server(),
            Target::Client => GenerateOptions::client(),
        };
        if let Some(package) = flags.package.or(config.package) {
            options.package = package;
        }
        if let Some(import_path) = flags.import_path.or(config.import_path) {
            options.import_path = import_path;
        }

        Self {
            language: flags.language.or(config.language).unwrap_or_default(),
            dir: flags
                .dir
                .or(config.dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            options,
        }
    }
}
