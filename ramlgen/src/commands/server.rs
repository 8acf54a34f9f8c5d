use std::path::Path;

use clap::Args;
use eyre::Result;
use ramlgen_codegen::Target;

use super::args::TargetArgs;

#[derive(Args)]
pub struct ServerCommand {
    #[command(flatten)]
    pub args: TargetArgs,

    /// Do not generate the server entry point
    #[arg(long)]
    pub no_main: bool,

    /// Do not serve the RAML source under /apidocs/
    #[arg(long)]
    pub no_apidocs: bool,
}

impl ServerCommand {
    pub fn run(&self, config: &Path) -> Result<()> {
        let mut settings = self.args.settings(Target::Server, config)?;
        settings.options.with_main = !self.no_main;
        settings.options.with_apidocs = !self.no_apidocs;

        let api = self.args.resolve();
        self.args.execute(&api, &settings)
    }
}
