use std::path::Path;

use clap::Args;
use eyre::Result;
use ramlgen_codegen::Target;

use super::args::TargetArgs;

#[derive(Args)]
pub struct ClientCommand {
    #[command(flatten)]
    pub args: TargetArgs,
}

impl ClientCommand {
    pub fn run(&self, config: &Path) -> Result<()> {
        let settings = self.args.settings(Target::Client, config)?;
        let api = self.args.resolve();
        self.args.execute(&api, &settings)
    }
}
