mod args;
mod client;
mod server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use client::ClientCommand;
use eyre::Result;
use server::ServerCommand;

use crate::config::DEFAULT_CONFIG;

/// Extension trait for exiting on RAML errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for ramlgen_raml::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "ramlgen")]
#[command(version)]
#[command(about = "Generate server and client code from a RAML specification")]
pub(crate) struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to the configuration file, ignored when absent
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Server(cmd) => cmd.run(&self.config),
            Commands::Client(cmd) => cmd.run(&self.config),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a server according to a RAML specification
    Server(ServerCommand),

    /// Generate a client for a RAML specification
    Client(ClientCommand),
}
