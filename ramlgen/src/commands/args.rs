use std::path::{Path, PathBuf};

use clap::Args;
use eyre::Result;
use ramlgen_codegen::Target;
use ramlgen_raml::{ResolvedApi, resolve_file};

use super::UnwrapOrExit;
use crate::{
    config::{Config, Overrides, Settings},
    language::Language,
    ops,
    reports::{Report, TerminalOutput},
};

/// Flags shared by `server` and `client`.
#[derive(Args)]
pub struct TargetArgs {
    /// Target language
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Target directory (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Source RAML file
    #[arg(long)]
    pub ramlfile: PathBuf,

    /// Package name of the root-level code
    #[arg(long)]
    pub package: Option<String>,

    /// Import path of the generated code
    #[arg(long)]
    pub import_path: Option<String>,

    /// Overwrite files that are only written once
    #[arg(long)]
    pub overwrite: bool,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl TargetArgs {
    /// Combine the flags with the config file at `config`.
    pub fn settings(&self, target: Target, config: &Path) -> Result<Settings> {
        let flags = Overrides {
            language: self.language,
            import_path: self.import_path.clone(),
            package: self.package.clone(),
            dir: self.dir.clone(),
        };
        let mut settings = Settings::resolve(target, Config::load(config)?, flags);
        settings.options.overwrite = self.overwrite;
        Ok(settings)
    }

    pub fn resolve(&self) -> ResolvedApi {
        resolve_file(&self.ramlfile).unwrap_or_exit()
    }

    /// Generate and print the report.
    pub fn execute(&self, api: &ResolvedApi, settings: &Settings) -> Result<()> {
        let report = ops::generate(api, settings, self.dry_run)?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
