// gsim/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use gsim_common::config::Config;
use gsim_common::error::Result;
use tokio_util::sync::CancellationToken;

pub mod clear;
pub mod launch;

use crate::cli::clear::ClearArgs;
use crate::cli::launch::LaunchArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Garden simulator session launcher", name = "gsim", bin_name = "gsim")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve artifacts and run a full simulation session
    Launch(LaunchArgs),
    /// Remove cached artifacts and sandboxes
    Clear(ClearArgs),
}

impl Command {
    pub async fn run(&self, config: &Config, cancel: CancellationToken) -> Result<()> {
        match self {
            Self::Launch(command) => command.run(config, cancel).await,
            Self::Clear(command) => command.run(config).await,
        }
    }
}
